use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use std::sync::Arc;

/// Explicit delete-all. Idempotent: clearing an empty store removes 0.
pub struct ClearUseCase {
    store: Arc<dyn VectorStore>,
}

impl ClearUseCase {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Result<usize, DomainError> {
        self.store.delete_all()
    }
}
