//! # Pizzeria
//!
//! Order lifecycle and pricing core for a pizza storefront that delivers
//! around a university campus.
//!
//! Customers configure products into a [`Cart`](model::Cart), the
//! [`PricingEngine`](pricing::PricingEngine) prices every line, and
//! [`Checkout`](checkout::Checkout) turns the cart into a persisted
//! [`Order`](model::Order). The kitchen then moves each order through
//! `pending → confirmed → preparing → baking → ready → delivered` on the
//! [`KitchenBoard`](kitchen::KitchenBoard).
//!
//! ## Concurrency
//!
//! One [`ResourceActor`](framework::ResourceActor) owns every order. All
//! reads and writes go through its channel, so the storefront and the kitchen
//! can share it from any number of tasks without locks, and every mutation is
//! persisted before its reply is sent.
//!
//! Dependencies reach the actor late, through `run(context)`: the clock and
//! the pricing engine are an [`OrderContext`](order_actor::OrderContext).
//!
//! ## Module tour
//!
//! - [`framework`]: the generic actor, its client and a mock for tests.
//! - [`order_actor`]: [`Order`](model::Order) as an actor entity.
//! - [`clients`]: [`OrderClient`](clients::OrderClient), the typed front door.
//! - [`model`], [`pricing`]: menu, cart, order and status types, and prices.
//! - [`storage`]: where the order collection lives between runs.
//! - [`catalog`], [`service_area`]: menu sources, delivery area and hours.
//! - [`checkout`], [`kitchen`]: the two sides of the counter.
//! - [`lifecycle`], [`config`]: start-up, shutdown, logging and settings.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run -- menu
//! RUST_LOG=info cargo run -- order --item 1 --item 9x2 \
//!     --name Ana --phone 3781234567 --address "Edificio C"
//! cargo run -- kitchen --filter active --watch
//! ```

pub mod catalog;
pub mod checkout;
pub mod clients;
pub mod clock;
pub mod config;
pub mod framework;
pub mod kitchen;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod pricing;
pub mod service_area;
pub mod storage;
