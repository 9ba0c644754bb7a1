//! skyroute - Travel-Sample Quickstart API
//!
//! A demonstration REST API over a travel-sample document dataset, built on
//! a key-addressed store with compare-and-swap write semantics.
//!
//! # Modules
//!
//! - [`store`] - Document store abstraction (get / insert / CAS replace / scan)
//! - [`models`] - Airline, Airport, Route and Profile documents
//! - [`money`] - Fixed-point on-board credit handling
//! - [`transfer`] - Credit transfer coordinator (the one real algorithm here)
//! - [`gateway`] - axum HTTP surface
//! - [`config`] / [`logging`] - YAML config and tracing setup
//! - [`seed`] - Demo dataset loading

pub mod config;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod money;
pub mod seed;
pub mod store;
pub mod transfer;

// Convenient re-exports at crate root
pub use gateway::AppState;
pub use models::{Airline, Airport, Profile, ProfileView, Route};
pub use store::{Cas, DocumentStore, MemoryStore, StoreError};
pub use transfer::{
    RetryPolicy, TransferCoordinator, TransferError, TransferId, TransferOutcome, TransferRequest,
};
