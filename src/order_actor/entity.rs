//! ActorEntity trait implementation for the Order domain type.
//!
//! This module contains the [`ActorEntity`] implementation that lets
//! [`Order`] be managed by the generic [`ResourceActor`](crate::framework::ResourceActor).
//!
//! - The store fills in the total, status and creation time; callers cannot.
//! - Status actions never fail on their own. Only storage can refuse them.

use async_trait::async_trait;
use tracing::debug;

use super::actions::OrderAction;
use super::error::OrderError;
use super::OrderContext;
use crate::framework::ActorEntity;
use crate::model::{sum_totals, NewOrder, Order, OrderId, OrderStatus};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = NewOrder;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = OrderContext;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn requested_id(params: &NewOrder) -> Option<OrderId> {
        params.id.clone()
    }

    /// Creates a `pending` order stamped with the context clock.
    ///
    /// The total is the sum of the line totals. A total too large to
    /// represent rejects the order.
    fn from_create_params(id: OrderId, params: NewOrder, ctx: &OrderContext) -> Result<Self, OrderError> {
        let total = sum_totals(&params.items, &ctx.pricing)
            .map_err(|error| OrderError::ValidationError(error.to_string()))?;

        Ok(Order {
            id,
            customer: params.customer,
            items: params.items,
            total,
            status: OrderStatus::Pending,
            created_at: ctx.clock.now(),
            priority: params.priority,
        })
    }

    /// Rejects orders without contact details or without items.
    async fn on_create(&mut self, _ctx: &OrderContext) -> Result<(), OrderError> {
        if let Some(field) = self.customer.first_missing_field() {
            return Err(OrderError::ValidationError(format!("{} is required", field)));
        }
        if self.items.is_empty() {
            return Err(OrderError::ValidationError("order has no items".to_string()));
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: OrderAction, _ctx: &OrderContext) -> Result<Order, OrderError> {
        let from = self.status;
        match action {
            OrderAction::SetStatus(status) => self.status = status,
            OrderAction::Advance => {
                if let Some(next) = self.status.next() {
                    self.status = next;
                }
            }
            OrderAction::MarkDelivered => self.status = OrderStatus::Delivered,
        }
        debug!(order_id = %self.id, %from, to = %self.status, "Status");
        Ok(self.clone())
    }
}
