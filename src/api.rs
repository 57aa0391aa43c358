//! HTTP API over the conversation engine

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::ProductionEngine;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProductionEngine>,
}

impl AppState {
    pub fn new(engine: ProductionEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
