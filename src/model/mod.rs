//! Plain data structures: the menu, carts, orders and the status machine.
//!
//! [`Order`] is the one type managed by an actor; see
//! [`order_actor`](crate::order_actor) for its [`ActorEntity`](crate::framework::ActorEntity)
//! implementation.

pub mod cart;
pub mod order;
pub mod product;
pub mod status;

pub use cart::*;
pub use order::*;
pub use product::*;
pub use status::*;
