//! Status actions for the Order actor.
//!
//! Each action is handled by [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action)
//! and replies with the order as it stands afterwards.

use crate::model::OrderStatus;

/// Status changes the kitchen can make to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Jump straight to the given status.
    ///
    /// Not checked against the forward sequence: staff may move an order
    /// backwards to correct a mistake.
    SetStatus(OrderStatus),
    /// Move one step along the sequence. A delivered order stays delivered.
    Advance,
    /// Hand-off to the customer.
    MarkDelivered,
}
