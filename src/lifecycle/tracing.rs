//! # Logging
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by
//! `RUST_LOG`. Module paths are hidden; every event carries its own fields
//! (`order_id`, `status`, `total`) instead.
//!
//! ```bash
//! RUST_LOG=info pizzeria orders
//! RUST_LOG=debug pizzeria order 1 --name Ana --phone 3781234567 --address Biblioteca
//! RUST_LOG=pizzeria::framework=debug pizzeria kitchen
//! ```
//!
//! At `info` each placed order and each status change logs one line:
//!
//! ```text
//! INFO create_order: Order placed order_id=7f1c… total=205
//! INFO Order advanced order_id=7f1c… status=confirmed
//! ```
//!
//! At `debug` the client also logs the full payload once on entry, and the
//! actor logs every request it handles.

/// Installs the global subscriber. Call once, before the system starts.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}
