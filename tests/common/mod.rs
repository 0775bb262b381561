//! Shared test helpers.

use shoplens::domain::error::DomainError;
use shoplens::domain::ports::embedding_port::ImageEmbedder;
use shoplens::domain::ports::vector_store::InsertPolicy;
use shoplens::ShopLens;
use std::path::Path;
use std::sync::Arc;

/// Embedder that reads the "image" bytes as comma-separated floats, so tests
/// control vectors through plain fixture files.
pub struct StubEmbedder {
    pub dim: usize,
}

#[async_trait::async_trait]
impl ImageEmbedder for StubEmbedder {
    async fn embed(&self, image: &[u8]) -> Result<Vec<f32>, DomainError> {
        let text = std::str::from_utf8(image)
            .map_err(|e| DomainError::DecodeError(e.to_string()))?;
        text.split(',')
            .map(|s| {
                s.trim()
                    .parse::<f32>()
                    .map_err(|e| DomainError::DecodeError(e.to_string()))
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

pub fn setup(policy: InsertPolicy) -> ShopLens {
    ShopLens::with_providers(":memory:", Arc::new(StubEmbedder { dim: 2 }), policy).unwrap()
}

pub fn write_image(dir: &Path, name: &str, vector_text: &str) {
    std::fs::write(dir.join(name), vector_text).unwrap();
}

pub fn write_manifest(dir: &Path, name: &str, entries: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(entries).unwrap()).unwrap();
    path
}
