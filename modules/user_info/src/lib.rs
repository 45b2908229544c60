//! Client module for the userservice UserInfo entity.
//!
//! Headless CRUD client: a typed remote-access layer over the service's REST
//! API, an observable entity state store reconciling the request lifecycle,
//! and thin list/detail/form/delete controllers on top.

// === PUBLIC CONTRACT ===
pub mod contract;

// Re-export the public contract components
pub use contract::{client, error, model};

// === MODULE INTERNALS ===
pub mod config;
pub mod domain;
pub mod infra;
pub mod ui;

// Convenience re-exports for the common wiring path
pub use config::UserInfoClientConfig;
pub use domain::store::{EntityState, UserInfoStore};
pub use infra::http::UserInfoRestClient;
