//! The kitchen's view of the order store.
//!
//! [`KitchenBoard`] reads the whole store, filters it, counts it, and moves
//! orders along. [`KitchenBoard::spawn_refresh`] re-reads it on a timer and
//! publishes each snapshot on a `watch` channel; every snapshot replaces the
//! previous one outright.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::clients::{ActorClient, OrderClient};
use crate::clock::{self, Clock};
use crate::model::{Order, OrderId, OrderStatus};
use crate::order_actor::OrderError;

/// Which orders the board shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoardFilter {
    #[default]
    All,
    /// Everything not yet delivered.
    Active,
    Status(OrderStatus),
}

impl BoardFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            BoardFilter::All => true,
            BoardFilter::Active => order.status.is_active(),
            BoardFilter::Status(status) => order.status == *status,
        }
    }
}

impl FromStr for BoardFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(BoardFilter::All),
            "active" => Ok(BoardFilter::Active),
            other => other
                .parse()
                .map(BoardFilter::Status)
                .map_err(|_| format!("unknown filter: {}", s.trim())),
        }
    }
}

/// Headline counts across the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardSummary {
    pub total: usize,
    pub active: usize,
    pub delivered: usize,
}

/// An order as the kitchen sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub order: Order,
    pub elapsed: SignedDuration,
}

impl Ticket {
    /// `"12 min"`, `"1h 5m"`.
    pub fn elapsed_label(&self) -> String {
        clock::format_elapsed(self.elapsed)
    }
}

/// Every order in the store at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub orders: Vec<Order>,
    pub taken_at: Timestamp,
}

impl BoardSnapshot {
    pub fn empty(taken_at: Timestamp) -> Self {
        Self {
            orders: Vec::new(),
            taken_at,
        }
    }

    pub fn summary(&self) -> BoardSummary {
        let delivered = self
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::Delivered)
            .count();
        BoardSummary {
            total: self.orders.len(),
            active: self.orders.len() - delivered,
            delivered,
        }
    }

    /// Matching orders in store order, with the time each has been waiting.
    pub fn tickets(&self, filter: BoardFilter) -> Vec<Ticket> {
        self.orders
            .iter()
            .filter(|order| filter.matches(order))
            .map(|order| Ticket {
                order: order.clone(),
                elapsed: clock::elapsed(order.created_at, self.taken_at),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct KitchenBoard {
    orders: OrderClient,
    clock: Arc<dyn Clock>,
}

impl KitchenBoard {
    pub fn new(orders: OrderClient, clock: Arc<dyn Clock>) -> Self {
        Self { orders, clock }
    }

    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<BoardSnapshot, OrderError> {
        let orders = self.orders.list().await?;
        debug!(count = orders.len(), "Board refreshed");
        Ok(BoardSnapshot {
            orders,
            taken_at: self.clock.now(),
        })
    }

    /// One step along the sequence. `None` if there is no such order.
    pub async fn advance(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        let order = self.orders.advance(id).await?;
        if let Some(order) = &order {
            info!(order_id = %order.id, status = %order.status, "Order advanced");
        }
        Ok(order)
    }

    pub async fn mark_delivered(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        let order = self.orders.mark_delivered(id).await?;
        if let Some(order) = &order {
            info!(order_id = %order.id, "Order delivered");
        }
        Ok(order)
    }

    /// Manual override; any status, in any direction.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Option<Order>, OrderError> {
        let order = self.orders.update_status(id, status).await?;
        if let Some(order) = &order {
            info!(order_id = %order.id, %status, "Order status set");
        }
        Ok(order)
    }

    /// Re-reads the store every `period` and publishes the result.
    ///
    /// The first read happens immediately. The task ends when every receiver
    /// is dropped or the order actor shuts down. A failed read is logged and
    /// the previous snapshot stays published.
    pub fn spawn_refresh(&self, period: Duration) -> (watch::Receiver<BoardSnapshot>, JoinHandle<()>) {
        let (sender, receiver) = watch::channel(BoardSnapshot::empty(self.clock.now()));
        let board = self.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = sender.closed() => break,
                }

                match board.snapshot().await {
                    Ok(snapshot) => {
                        if sender.send(snapshot).is_err() {
                            break;
                        }
                    }
                    Err(_) if board.orders.is_closed() => break,
                    Err(e) => warn!(error = %e, "Board refresh failed"),
                }
            }
            info!("Board refresh stopped");
        });

        (receiver, handle)
    }
}
