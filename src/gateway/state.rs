//! Shared gateway application state

use std::sync::Arc;

use crate::store::DocumentStore;
use crate::transfer::TransferCoordinator;

/// Gateway application state (shared across handlers)
#[derive(Clone)]
pub struct AppState {
    /// Document store behind every CRUD and query handler
    pub store: Arc<dyn DocumentStore>,
    /// Credit transfer coordinator
    pub coordinator: Arc<TransferCoordinator>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, coordinator: Arc<TransferCoordinator>) -> Self {
        Self { store, coordinator }
    }
}
