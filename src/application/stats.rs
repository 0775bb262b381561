use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub products: usize,
    pub dimension: Option<usize>,
}

pub struct StatsUseCase {
    store: Arc<dyn VectorStore>,
}

impl StatsUseCase {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Result<StoreStats, DomainError> {
        Ok(StoreStats {
            products: self.store.count()?,
            dimension: self.store.stored_dimension()?,
        })
    }
}
