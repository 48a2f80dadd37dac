//! # Observability & Tracing
//!
//! The serializer is silent; everything that touches the network or walks pages emits
//! `tracing` events with structured fields:
//!
//! - **Pager**: `Fetching page` (debug), `Page received` with `url`, `records`,
//!   `has_next` (info), failures and cancellation (warn/info)
//! - **Unserializer**: `Document carries errors` (warn), page sizes (debug)
//! - **Collections** (in the facade crate): one span per operation with the URL
//!
//! ## Usage Examples
//!
//! ```bash
//! # Page-level progress
//! RUST_LOG=info cargo run
//!
//! # Full request/response detail
//! RUST_LOG=debug cargo run
//!
//! # Only the pager
//! RUST_LOG=jsonapi_core::pager=debug cargo run
//! ```

/// Initializes a compact `tracing-subscriber` that honours `RUST_LOG`.
///
/// Call once at program start; a second call panics because a global subscriber is
/// already installed.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but returns quietly if a subscriber is already installed.
/// Handy in tests, where several may race to initialize.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
