//! Runtime for executing conversation turns
//!
//! Binds the pure steps to a checkpoint store and a model client.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationEngine;
pub use traits::*;

use crate::checkpoint::MemoryCheckpointStore;
use std::sync::Arc;

/// Engine type used by the binary and the HTTP API
pub type ProductionEngine = ConversationEngine<Arc<MemoryCheckpointStore>, Arc<dyn ModelClient>>;

/// Engine over a fresh in-memory store
pub fn production_engine(model: Arc<dyn ModelClient>) -> ProductionEngine {
    ConversationEngine::new(Arc::new(MemoryCheckpointStore::new()), model)
}
