use crate::domain::error::DomainError;

/// Maps raw image bytes to a fixed-dimension feature vector. The core never
/// inspects how the vector was computed.
#[async_trait::async_trait]
pub trait ImageEmbedder: Send + Sync {
    /// An empty result vector means "no embedding available" and is treated
    /// as a failure by callers, never ranked as a zero vector.
    async fn embed(&self, image: &[u8]) -> Result<Vec<f32>, DomainError>;

    /// Expected output dimensionality, 0 when unknown.
    fn dimension(&self) -> usize;
}
