//! # Order Actor
//!
//! The order store: a [`ResourceActor`] over [`Order`] that persists the whole
//! collection through an [`EntityStorage`] after every change.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`] type for type-safe error handling
//! - [`actions`] - [`OrderAction`] status changes
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (actor, orders) = order_actor::new(32, MemoryStorage::new());
//! tokio::spawn(actor.run(OrderContext::default()));
//!
//! let order = orders.create_order(new_order).await?;
//! orders.advance(order.id.clone()).await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use std::sync::Arc;

use crate::clients::OrderClient;
use crate::clock::{Clock, SystemClock};
use crate::framework::ResourceActor;
use crate::model::{Order, OrderId};
use crate::pricing::PricingEngine;
use crate::storage::EntityStorage;

/// Dependencies injected into the order actor at `run()`.
#[derive(Debug, Clone)]
pub struct OrderContext {
    pub clock: Arc<dyn Clock>,
    pub pricing: PricingEngine,
}

impl OrderContext {
    pub fn new(clock: Arc<dyn Clock>, pricing: PricingEngine) -> Self {
        Self { clock, pricing }
    }
}

impl Default for OrderContext {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), PricingEngine::default())
    }
}

/// Creates a new Order actor and its client.
///
/// Orders get random (v4) identifiers unless the caller supplies one.
pub fn new(buffer_size: usize, storage: impl EntityStorage<Order>) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, OrderId::generate, storage);
    let client = OrderClient::new(generic_client);

    (actor, client)
}
