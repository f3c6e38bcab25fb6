//! # Order Client
//!
//! High-level API for the order store. Wraps a `ResourceClient<Order>` and turns
//! framework replies into [`OrderError`]s, with "not found" as `Ok(None)`.
//!
//! Reads come from [`ActorClient`]: `get` by id and `list` in creation order.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{NewOrder, Order, OrderId, OrderStatus};
use crate::order_actor::{OrderAction, OrderError};

/// Client for interacting with the Order actor.
#[derive(Clone, Debug)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// `true` once the order actor has shut down.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Stores a new `pending` order and returns it as stored.
    #[instrument(skip(self, order))]
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, OrderError> {
        debug!(?order, "create_order called");
        let created = self.inner.create(order).await?;
        info!(order_id = %created.id, total = %created.total, "Order placed");
        Ok(created)
    }

    /// Sets the status outright, without checking the forward sequence.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Option<Order>, OrderError> {
        self.act(id, OrderAction::SetStatus(status)).await
    }

    /// Moves the order one step forward. Delivered orders are returned unchanged.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.act(id, OrderAction::Advance).await
    }

    #[instrument(skip(self))]
    pub async fn mark_delivered(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.act(id, OrderAction::MarkDelivered).await
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<Option<Order>, OrderError> {
        match self.inner.perform_action(id, action).await {
            Ok(order) => Ok(Some(order)),
            Err(FrameworkError::NotFound(id)) => {
                debug!(order_id = %id, "Order not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action, MockClient};
    use crate::model::{CartLine, Category, CustomerDetails, Priority, Product};
    use crate::storage::StorageError;
    use rust_decimal::Decimal;

    fn order(id: &str, status: OrderStatus) -> Order {
        let product = Product::new("9", "Coca Cola", Decimal::from(25), Category::Drinks);
        Order {
            id: OrderId::from(id),
            customer: CustomerDetails::new("Ana", "3781234567", "Biblioteca"),
            items: vec![CartLine::plain(product)],
            total: Decimal::from(25),
            status,
            created_at: "2026-10-19T12:00:00Z".parse().unwrap(),
            priority: Priority::Normal,
        }
    }

    #[tokio::test]
    async fn test_update_status_sends_set_status() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let orders = OrderClient::new(client);

        let task = tokio::spawn(async move {
            orders.update_status(OrderId::from("o1"), OrderStatus::Baking).await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, OrderId::from("o1"));
        assert_eq!(action, OrderAction::SetStatus(OrderStatus::Baking));
        responder.send(Ok(order("o1", OrderStatus::Baking))).unwrap();

        let updated = task.await.unwrap().unwrap().unwrap();
        assert_eq!(updated.status, OrderStatus::Baking);
    }

    #[tokio::test]
    async fn test_not_found_is_none() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action().return_err(FrameworkError::NotFound("missing-id".into()));
        mock.expect_get().return_ok(None);

        let orders = OrderClient::new(mock.client());
        assert_eq!(orders.advance(OrderId::from("missing-id")).await, Ok(None));
        assert_eq!(orders.get(OrderId::from("missing-id")).await, Ok(None));

        mock.verify();
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action().return_err(FrameworkError::Storage(StorageError::Unavailable));
        mock.expect_list().return_err(FrameworkError::ActorClosed);

        let orders = OrderClient::new(mock.client());
        let result = orders.mark_delivered(OrderId::from("o1")).await;
        assert!(matches!(result, Err(OrderError::StorageUnavailable(_))));

        let listed = orders.list().await;
        assert!(matches!(listed, Err(OrderError::ActorCommunicationError(_))));

        mock.verify();
    }
}
