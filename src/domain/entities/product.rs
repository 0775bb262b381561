use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog metadata for one product. Opaque to the ranker — carried through
/// untouched and projected at output time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductInfo {
    pub title: String,
    /// Image file name, resolved against the ingest images directory.
    pub image: String,
    pub price: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// One entry of the ingest manifest (a JSON array of these).
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    /// Stable id for re-imports; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub product: ProductInfo,
}

/// A stored embedding plus its product metadata. Records are never mutated in
/// place; an update is an upsert at the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub product: ProductInfo,
    pub created_at: DateTime<Utc>,
}

impl VectorRecord {
    pub fn new(id: Option<String>, vector: Vec<f32>, product: ProductInfo) -> Self {
        Self {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            vector,
            product,
            created_at: Utc::now(),
        }
    }
}
