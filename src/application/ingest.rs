use crate::domain::entities::product::{ManifestEntry, VectorRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::ImageEmbedder;
use crate::domain::ports::vector_store::{InsertPolicy, VectorStore};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct IngestFailure {
    /// Manifest identifier of the failed entry (its id, or image name).
    pub entry: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub inserted: usize,
    pub failed: usize,
    pub failures: Vec<IngestFailure>,
}

/// Populates the store from a product manifest: one embedding call and one
/// insert per entry, with per-item failure isolation.
pub struct IngestUseCase {
    embedder: Arc<dyn ImageEmbedder>,
    store: Arc<dyn VectorStore>,
    policy: InsertPolicy,
}

impl IngestUseCase {
    pub fn new(
        embedder: Arc<dyn ImageEmbedder>,
        store: Arc<dyn VectorStore>,
        policy: InsertPolicy,
    ) -> Self {
        Self {
            embedder,
            store,
            policy,
        }
    }

    /// An unreadable manifest is fatal; a failing entry is logged, recorded
    /// in the summary, and skipped. Re-running against a non-empty store is
    /// refused unless the store was opened in upsert mode.
    pub async fn execute(
        &self,
        manifest_path: &Path,
        images_dir: &Path,
    ) -> Result<IngestSummary, DomainError> {
        let manifest = std::fs::read_to_string(manifest_path).map_err(|e| {
            DomainError::Parse(format!("manifest {}: {e}", manifest_path.display()))
        })?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&manifest).map_err(|e| {
            DomainError::Parse(format!("manifest {}: {e}", manifest_path.display()))
        })?;

        if self.policy == InsertPolicy::Reject && self.store.count()? > 0 {
            return Err(DomainError::InvalidArgument(
                "store is not empty; re-run with --upsert or clear it first".into(),
            ));
        }

        let mut summary = IngestSummary {
            inserted: 0,
            failed: 0,
            failures: Vec::new(),
        };

        for entry in entries {
            let label = entry
                .id
                .clone()
                .unwrap_or_else(|| entry.product.image.clone());
            match self.ingest_one(entry, images_dir).await {
                Ok(id) => {
                    log::info!("ingested {label} as {id}");
                    summary.inserted += 1;
                }
                Err(e) => {
                    log::warn!("skipping {label}: {e}");
                    summary.failed += 1;
                    summary.failures.push(IngestFailure {
                        entry: label,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }

    async fn ingest_one(
        &self,
        entry: ManifestEntry,
        images_dir: &Path,
    ) -> Result<String, DomainError> {
        let path = images_dir.join(&entry.product.image);
        let bytes = std::fs::read(&path)
            .map_err(|e| DomainError::DecodeError(format!("{}: {e}", path.display())))?;

        let vector = self.embedder.embed(&bytes).await?;
        if vector.is_empty() {
            return Err(DomainError::EmbeddingFailed(
                "provider returned no embedding".into(),
            ));
        }

        let record = VectorRecord::new(entry.id, vector, entry.product);
        let id = record.id.clone();
        self.store.insert(&record)?;
        Ok(id)
    }
}
