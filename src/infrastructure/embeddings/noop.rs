use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::ImageEmbedder;

pub struct NoopEmbedder;

#[async_trait::async_trait]
impl ImageEmbedder for NoopEmbedder {
    async fn embed(&self, _image: &[u8]) -> Result<Vec<f32>, DomainError> {
        // Empty vector — signals no embedding available
        Ok(Vec::new())
    }

    fn dimension(&self) -> usize {
        0
    }
}
