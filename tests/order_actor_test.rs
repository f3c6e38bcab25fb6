use std::sync::Arc;
use std::time::Duration;

use jiff::SignedDuration;
use pizzeria::clients::{actor_client::ActorClient, OrderClient};
use pizzeria::clock::FixedClock;
use pizzeria::framework::mock::MockClient;
use pizzeria::kitchen::{BoardFilter, KitchenBoard};
use pizzeria::model::{CartLine, Category, CustomerDetails, NewOrder, Order, OrderStatus, Product};
use pizzeria::order_actor::{self, OrderContext, OrderError};
use pizzeria::pricing::PricingEngine;
use pizzeria::storage::MemoryStorage;
use rust_decimal::Decimal;

fn soda_order(name: &str) -> NewOrder {
    let soda = Product::new("9", "Coca Cola", Decimal::from(25), Category::Drinks);
    NewOrder::new(
        CustomerDetails::new(name, "3781234567", "Biblioteca"),
        vec![CartLine::plain(soda)],
    )
}

/// Real order actor on storage that can be switched off.
///
/// Every failed write must leave both the actor's view and the stored copy
/// exactly as they were.
#[tokio::test]
async fn test_storage_outage_leaves_store_untouched() {
    let storage = MemoryStorage::<Order>::new();
    let (order_actor, orders) = order_actor::new(8, storage.clone());
    let actor_handle = tokio::spawn(order_actor.run(OrderContext::default()));

    let order = orders.create_order(soda_order("Ana")).await.unwrap();
    assert_eq!(storage.snapshot(), vec![order.clone()]);

    storage.set_available(false);

    let result = orders.create_order(soda_order("Luis")).await;
    assert!(matches!(result, Err(OrderError::StorageUnavailable(_))));

    let result = orders.advance(order.id.clone()).await;
    assert!(matches!(result, Err(OrderError::StorageUnavailable(_))));

    let listed = orders.list().await.unwrap();
    assert_eq!(listed, vec![order.clone()]);
    assert_eq!(storage.snapshot(), vec![order.clone()]);

    storage.set_available(true);
    let advanced = orders.advance(order.id.clone()).await.unwrap().unwrap();
    assert_eq!(advanced.status, OrderStatus::Confirmed);
    assert_eq!(storage.snapshot(), vec![advanced]);

    drop(orders);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_invalid_order_is_rejected_by_the_store() {
    let (order_actor, orders) = order_actor::new(8, MemoryStorage::new());
    tokio::spawn(order_actor.run(OrderContext::default()));

    let mut missing_phone = soda_order("Ana");
    missing_phone.customer.phone = "  ".to_string();
    let result = orders.create_order(missing_phone).await;
    assert_eq!(result, Err(OrderError::ValidationError("phone is required".to_string())));

    let mut no_items = soda_order("Ana");
    no_items.items.clear();
    assert!(matches!(
        orders.create_order(no_items).await,
        Err(OrderError::ValidationError(_))
    ));

    assert!(orders.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_delivered_from_any_status() {
    let (order_actor, orders) = order_actor::new(8, MemoryStorage::new());
    tokio::spawn(order_actor.run(OrderContext::default()));

    let order = orders.create_order(soda_order("Ana")).await.unwrap();
    let delivered = orders.mark_delivered(order.id.clone()).await.unwrap().unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);

    let again = orders.advance(order.id.clone()).await.unwrap().unwrap();
    assert_eq!(again, delivered);
}

/// Kitchen board over a mocked order client: no actor at all.
#[tokio::test]
async fn test_kitchen_board_with_mocked_store() {
    let clock = Arc::new(FixedClock::new("2026-10-19T13:00:00Z".parse().unwrap()));

    let (order_actor, seed) = order_actor::new(8, MemoryStorage::new());
    tokio::spawn(order_actor.run(OrderContext::new(clock.clone(), PricingEngine::default())));
    let waiting = seed.create_order(soda_order("Ana")).await.unwrap();
    let mut done = seed.create_order(soda_order("Luis")).await.unwrap();
    done.status = OrderStatus::Delivered;

    let mut mock = MockClient::<Order>::new();
    mock.expect_list().return_ok(vec![waiting.clone(), done.clone()]);

    clock.advance(SignedDuration::from_mins(12));
    let board = KitchenBoard::new(OrderClient::new(mock.client()), clock.clone());
    let snapshot = board.snapshot().await.unwrap();

    let summary = snapshot.summary();
    assert_eq!((summary.total, summary.active, summary.delivered), (2, 1, 1));

    let active = snapshot.tickets(BoardFilter::Active);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].order.id, waiting.id);
    assert_eq!(active[0].elapsed_label(), "12 min");

    mock.verify();
}

#[tokio::test]
async fn test_store_shuts_down_after_refresh_stops() {
    let (order_actor, orders) = order_actor::new(8, MemoryStorage::new());
    let actor_handle = tokio::spawn(order_actor.run(OrderContext::default()));
    orders.create_order(soda_order("Ana")).await.unwrap();

    let board = KitchenBoard::new(orders.clone(), Arc::new(FixedClock::new(jiff::Timestamp::UNIX_EPOCH)));
    let (mut receiver, handle) = board.spawn_refresh(Duration::from_millis(10));
    receiver.changed().await.unwrap();
    assert_eq!(receiver.borrow().orders.len(), 1);

    // The refresh task holds its own client; it has to end first.
    drop(receiver);
    handle.await.unwrap();

    drop(board);
    drop(orders);
    actor_handle.await.unwrap();
}
