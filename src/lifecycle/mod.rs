//! Starting and stopping the order store.

pub mod pizzeria_system;
pub mod tracing;

pub use self::pizzeria_system::PizzeriaSystem;
pub use self::tracing::setup_tracing;
