//! streamcat-server library - protocol adapters over one shared catalog
//!
//! Every adapter holds the same `Arc<dyn Catalog>` and owns no state of its own, so a write made
//! through one protocol is visible through all the others as soon as it returns.

use std::sync::Arc;

use streamcat_common::{Catalog, Store};

pub mod api;
pub mod graphql;
pub mod grpc;
pub mod rest;
pub mod server;
pub mod soap;

/// Application state shared across HTTP handlers and the gRPC service
#[derive(Clone)]
pub struct AppState {
    /// The catalog every adapter reads and writes
    pub catalog: Arc<dyn Catalog>,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// State over a fresh Store
    pub fn from_store(store: Store) -> Self {
        Self::new(Arc::new(store))
    }
}
