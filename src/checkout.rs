//! Turning a cart into a placed order.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the cart has at least one line,
//! 2. name, phone and address are filled in,
//! 3. the address is inside the service area.
//!
//! Only then is the order store touched. The cart is emptied only after the
//! store accepted the order.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::clients::OrderClient;
use crate::model::{Cart, CustomerDetails, NewOrder, Order, Priority};
use crate::order_actor::OrderError;
use crate::service_area::ServiceArea;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,

    /// A required customer field is blank.
    #[error("{0} is required")]
    Validation(&'static str),

    #[error("the address is outside the delivery area")]
    OutOfServiceArea,

    /// The store refused or failed; shown to customers as a generic failure.
    #[error("the order could not be placed: {0}")]
    Store(#[from] OrderError),
}

/// What the customer fills in at checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    pub customer: CustomerDetails,
    pub priority: Priority,
}

impl CheckoutForm {
    pub fn new(customer: CustomerDetails) -> Self {
        Self {
            customer,
            priority: Priority::Normal,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl From<CustomerDetails> for CheckoutForm {
    fn from(customer: CustomerDetails) -> Self {
        Self::new(customer)
    }
}

#[derive(Debug, Clone)]
pub struct Checkout {
    orders: OrderClient,
    service_area: Arc<dyn ServiceArea>,
}

impl Checkout {
    pub fn new(orders: OrderClient, service_area: Arc<dyn ServiceArea>) -> Self {
        Self { orders, service_area }
    }

    /// Validates the form, places the order and empties the cart.
    ///
    /// On any error the cart is left as it was.
    #[instrument(skip_all)]
    pub async fn place_order(&self, cart: &mut Cart, form: CheckoutForm) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if let Some(field) = form.customer.first_missing_field() {
            return Err(CheckoutError::Validation(field));
        }
        if !self.service_area.is_deliverable(&form.customer.address) {
            warn!(address = %form.customer.address, "Address outside delivery area");
            return Err(CheckoutError::OutOfServiceArea);
        }

        let new_order = NewOrder::new(form.customer, cart.lines().to_vec()).with_priority(form.priority);
        let order = self.orders.create_order(new_order).await?;

        cart.clear();
        info!(order_id = %order.id, items = order.item_count(), "Checkout complete");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ActorClient;
    use crate::framework::mock::MockClient;
    use crate::framework::FrameworkError;
    use crate::model::{CartLine, Category, OrderStatus, Product};
    use crate::order_actor::{self, OrderContext};
    use crate::service_area::CampusServiceArea;
    use crate::storage::{MemoryStorage, StorageError};
    use rust_decimal::Decimal;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(CartLine::plain(Product::new("9", "Coca Cola", Decimal::from(25), Category::Drinks)));
        cart
    }

    fn form(address: &str) -> CheckoutForm {
        CheckoutForm::new(CustomerDetails::new("Ana", "3781234567", address))
    }

    fn start() -> (Checkout, OrderClient) {
        let (actor, orders) = order_actor::new(8, MemoryStorage::new());
        tokio::spawn(actor.run(OrderContext::default()));
        (Checkout::new(orders.clone(), Arc::new(CampusServiceArea)), orders)
    }

    #[tokio::test]
    async fn test_campus_address_places_pending_order() {
        let (checkout, orders) = start();
        let mut cart = cart();

        let order = checkout.place_order(&mut cart, form("Edificio C, salón 4")).await.unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Decimal::from(25));
        assert!(cart.is_empty());
        assert_eq!(orders.get(order.id.clone()).await.unwrap(), Some(order));
    }

    #[tokio::test]
    async fn test_rejections_create_nothing() {
        let (checkout, orders) = start();

        let mut empty = Cart::new();
        assert_eq!(
            checkout.place_order(&mut empty, form("Edificio C")).await,
            Err(CheckoutError::EmptyCart)
        );

        let mut cart = cart();
        assert_eq!(
            checkout.place_order(&mut cart, form("")).await,
            Err(CheckoutError::Validation("address"))
        );
        assert_eq!(
            checkout.place_order(&mut cart, form("Av. Insurgentes 123, CDMX")).await,
            Err(CheckoutError::OutOfServiceArea)
        );

        assert_eq!(cart.item_count(), 1);
        assert!(orders.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields_are_checked_before_the_address() {
        let (checkout, _orders) = start();
        let mut cart = cart();
        let mut form = form("Av. Insurgentes 123, CDMX");
        form.customer.phone.clear();

        assert_eq!(
            checkout.place_order(&mut cart, form).await,
            Err(CheckoutError::Validation("phone"))
        );
    }

    #[tokio::test]
    async fn test_store_failure_keeps_the_cart() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create().return_err(FrameworkError::Storage(StorageError::Unavailable));
        let checkout = Checkout::new(OrderClient::new(mock.client()), Arc::new(CampusServiceArea));

        let mut cart = cart();
        let result = checkout.place_order(&mut cart, form("Biblioteca")).await;

        assert!(matches!(result, Err(CheckoutError::Store(OrderError::StorageUnavailable(_)))));
        assert_eq!(cart.item_count(), 1);
        mock.verify();
    }
}
