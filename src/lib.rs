pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::clear::ClearUseCase;
use crate::application::find_similar::{FindOptions, FindSimilarUseCase};
use crate::application::ingest::{IngestSummary, IngestUseCase};
use crate::application::stats::{StatsUseCase, StoreStats};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::ImageEmbedder;
use crate::domain::ports::vector_store::{InsertPolicy, VectorStore};
use crate::infrastructure::embeddings::http::HttpEmbedder;
use crate::infrastructure::embeddings::noop::NoopEmbedder;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::vector_store::SqliteVectorStore;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

pub struct ShopLens {
    ingest_uc: IngestUseCase,
    find_uc: FindSimilarUseCase,
    clear_uc: ClearUseCase,
    stats_uc: StatsUseCase,
    store: Arc<dyn VectorStore>,
}

impl ShopLens {
    /// Wires the stack from environment configuration:
    /// `SHOPLENS_EMBEDDING_PROVIDER` (`http` or `noop`),
    /// `SHOPLENS_EMBEDDING_URL`, `SHOPLENS_EMBEDDING_DIM`.
    pub fn new(db_path: &str, policy: InsertPolicy) -> Result<Self, DomainError> {
        let provider =
            std::env::var("SHOPLENS_EMBEDDING_PROVIDER").unwrap_or_else(|_| "noop".into());

        let embedder: Arc<dyn ImageEmbedder> = match provider.as_str() {
            "http" => {
                let url = std::env::var("SHOPLENS_EMBEDDING_URL").map_err(|_| {
                    DomainError::InvalidArgument(
                        "SHOPLENS_EMBEDDING_URL is required for the http provider".into(),
                    )
                })?;
                let dim = std::env::var("SHOPLENS_EMBEDDING_DIM")
                    .ok()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(2048);
                Arc::new(HttpEmbedder::new(url, dim))
            }
            _ => Arc::new(NoopEmbedder),
        };

        Self::with_providers(db_path, embedder, policy)
    }

    pub fn with_providers(
        db_path: &str,
        embedder: Arc<dyn ImageEmbedder>,
        policy: InsertPolicy,
    ) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::StoreUnavailable(format!("{db_path}: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::StoreUnavailable(format!("WAL error: {e}")))?;
        run_migrations(&conn)?;

        let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(conn, policy));

        let provider_dim = embedder.dimension();
        if provider_dim > 0 {
            if let Ok(Some(stored_dim)) = store.stored_dimension() {
                if stored_dim != provider_dim {
                    log::warn!(
                        "stored vectors have dimension {stored_dim} but the embedding provider reports {provider_dim}; clear and re-ingest to realign"
                    );
                }
            }
        }

        Ok(Self {
            ingest_uc: IngestUseCase::new(embedder.clone(), store.clone(), policy),
            find_uc: FindSimilarUseCase::new(embedder, store.clone()),
            clear_uc: ClearUseCase::new(store.clone()),
            stats_uc: StatsUseCase::new(store.clone()),
            store,
        })
    }

    pub async fn ingest(
        &self,
        manifest_path: &Path,
        images_dir: &Path,
    ) -> Result<IngestSummary, DomainError> {
        self.ingest_uc.execute(manifest_path, images_dir).await
    }

    /// Reads the query image and returns the ranked projection as one JSON
    /// value. An unreadable image fails the whole query.
    pub async fn find_similar(
        &self,
        image_path: &Path,
        opts: &FindOptions,
    ) -> Result<serde_json::Value, DomainError> {
        let bytes = std::fs::read(image_path)
            .map_err(|e| DomainError::DecodeError(format!("{}: {e}", image_path.display())))?;
        self.find_uc.execute(&bytes, opts).await
    }

    pub fn remove(&self, id: &str) -> Result<(), DomainError> {
        if self.store.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound(id.to_string()))
        }
    }

    pub fn clear(&self) -> Result<usize, DomainError> {
        self.clear_uc.execute()
    }

    pub fn stats(&self) -> Result<StoreStats, DomainError> {
        self.stats_uc.execute()
    }
}
