use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::ImageEmbedder;
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::ranking::{rank, RankedMatch};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_LIMIT: usize = 5;

/// Metadata fields that can appear in query output. The raw vector never
/// does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputField {
    Title,
    Price,
    Image,
    Link,
    Style,
}

impl FromStr for OutputField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(OutputField::Title),
            "price" => Ok(OutputField::Price),
            "image" => Ok(OutputField::Image),
            "link" => Ok(OutputField::Link),
            "style" => Ok(OutputField::Style),
            other => Err(format!("unknown output field: {other}")),
        }
    }
}

/// One parameterized query surface instead of per-projection script copies.
#[derive(Debug, Clone)]
pub struct FindOptions {
    pub limit: usize,
    pub fields: Vec<OutputField>,
    pub include_id: bool,
    /// Emit bare id strings instead of projected objects.
    pub ids_only: bool,
    /// Restrict results to the style of the best match.
    pub same_style: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            fields: vec![
                OutputField::Title,
                OutputField::Price,
                OutputField::Image,
                OutputField::Link,
            ],
            include_id: false,
            ids_only: false,
            same_style: false,
        }
    }
}

/// Embeds one query image, ranks it against a store snapshot, projects the
/// matches. Provider failure is fatal for the whole query; corrupt stored
/// records are skipped by the ranker and reported on the diagnostics channel.
pub struct FindSimilarUseCase {
    embedder: Arc<dyn ImageEmbedder>,
    store: Arc<dyn VectorStore>,
}

impl FindSimilarUseCase {
    pub fn new(embedder: Arc<dyn ImageEmbedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    pub async fn execute(&self, image: &[u8], opts: &FindOptions) -> Result<Value, DomainError> {
        let query = self.embedder.embed(image).await?;
        if query.is_empty() {
            return Err(DomainError::EmbeddingFailed(
                "provider returned no embedding for the query image".into(),
            ));
        }

        let candidates = self.store.scan_all()?;
        let ranking = rank(&query, candidates, opts.limit)?;
        for skip in &ranking.skipped {
            log::warn!("record {} excluded from ranking: {:?}", skip.id, skip.reason);
        }

        let mut matches = ranking.matches;
        if opts.same_style {
            if let Some(style) = matches.first().and_then(|m| m.product.style.clone()) {
                matches.retain(|m| m.product.style.as_deref() == Some(style.as_str()));
            }
        }

        Ok(self.project(&matches, opts))
    }

    fn project(&self, matches: &[RankedMatch], opts: &FindOptions) -> Value {
        if opts.ids_only {
            return Value::Array(matches.iter().map(|m| json!(m.id)).collect());
        }

        let objects: Vec<Value> = matches
            .iter()
            .map(|m| {
                let mut obj = serde_json::Map::new();
                if opts.include_id {
                    obj.insert("id".into(), json!(m.id));
                }
                for field in &opts.fields {
                    match field {
                        OutputField::Title => {
                            obj.insert("title".into(), json!(m.product.title));
                        }
                        OutputField::Price => {
                            obj.insert("price".into(), json!(m.product.price));
                        }
                        OutputField::Image => {
                            obj.insert("image".into(), json!(m.product.image));
                        }
                        OutputField::Link => {
                            obj.insert("link".into(), json!(m.product.link));
                        }
                        OutputField::Style => {
                            obj.insert("style".into(), json!(m.product.style));
                        }
                    }
                }
                obj.insert("score".into(), json!(m.score));
                Value::Object(obj)
            })
            .collect();
        Value::Array(objects)
    }
}
