//! Shared state for the API router.

use std::sync::Arc;

use crate::consult::gateway::ChatModel;
use crate::store::MemStore;

/// Shared context for all API routes: the record store and the model
/// gateway the consultation pipeline calls.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<MemStore>,
    pub model: Arc<dyn ChatModel>,
}

impl ApiContext {
    pub fn new(store: Arc<MemStore>, model: Arc<dyn ChatModel>) -> Self {
        Self { store, model }
    }
}
