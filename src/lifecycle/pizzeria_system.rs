use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::catalog::ProductCatalog;
use crate::checkout::Checkout;
use crate::clients::OrderClient;
use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::kitchen::KitchenBoard;
use crate::model::Order;
use crate::order_actor::{self, OrderContext};
use crate::pricing::PricingEngine;
use crate::service_area::{CampusServiceArea, ServiceArea};
use crate::storage::{EntityStorage, JsonFileStorage};

/// A running order store and the services built on it.
///
/// The order actor owns every order. `orders`, `checkout` and `kitchen` all
/// talk to it through clones of the same [`OrderClient`].
///
/// ```ignore
/// let system = PizzeriaSystem::start(&Settings::load()?);
///
/// let order = system.checkout.place_order(&mut cart, form).await?;
/// system.kitchen.advance(order.id).await?;
///
/// system.shutdown().await?;
/// ```
pub struct PizzeriaSystem {
    pub orders: OrderClient,
    pub checkout: Checkout,
    pub kitchen: KitchenBoard,
    pub catalog: Arc<dyn ProductCatalog>,
    pub pricing: PricingEngine,
    handles: Vec<JoinHandle<()>>,
}

impl PizzeriaSystem {
    /// Starts the store on the configured JSON file with the campus delivery area.
    pub fn start(settings: &Settings) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self::with_storage(
            settings.channel_capacity,
            JsonFileStorage::new(&settings.orders_file),
            OrderContext::new(clock, PricingEngine::default()),
            Arc::new(CampusServiceArea),
            settings.catalog(),
        )
    }

    /// Starts the store on any backend.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn with_storage(
        buffer_size: usize,
        storage: impl EntityStorage<Order>,
        context: OrderContext,
        service_area: Arc<dyn ServiceArea>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> Self {
        let (order_actor, orders) = order_actor::new(buffer_size, storage);

        let checkout = Checkout::new(orders.clone(), service_area);
        let kitchen = KitchenBoard::new(orders.clone(), context.clock.clone());
        let pricing = context.pricing.clone();

        let order_handle = tokio::spawn(order_actor.run(context));

        Self {
            orders,
            checkout,
            kitchen,
            catalog,
            pricing,
            handles: vec![order_handle],
        }
    }

    /// Stops the order actor and waits for it to finish.
    ///
    /// The actor stops once every [`OrderClient`] is gone, so clones handed
    /// out earlier (a running board refresh, for one) must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order store...");

        drop(self.orders);
        drop(self.checkout);
        drop(self.kitchen);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Order store shut down.");
        Ok(())
    }
}
