use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::ImageEmbedder;
use reqwest::Client;
use serde::Deserialize;

/// Client for a remote image-embedding inference service: POSTs the raw
/// image bytes, expects `{"embedding": [..]}` back.
pub struct HttpEmbedder {
    client: Client,
    url: String,
    dimension: usize,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(url: String, dimension: usize) -> Self {
        Self {
            client: Client::new(),
            url,
            dimension,
        }
    }
}

#[async_trait::async_trait]
impl ImageEmbedder for HttpEmbedder {
    async fn embed(&self, image: &[u8]) -> Result<Vec<f32>, DomainError> {
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| DomainError::EmbeddingFailed(format!("embedding service: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            || status == reqwest::StatusCode::BAD_REQUEST
        {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::DecodeError(format!(
                "embedding service rejected image: {body}"
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::EmbeddingFailed(format!(
                "embedding service {status}: {body}"
            )));
        }

        let result: EmbedResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::EmbeddingFailed(format!("response parse: {e}")))?;
        Ok(result.embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
