use async_trait::async_trait;

use crate::domain::PixelGrid;

#[async_trait]
pub trait ImageCaptioner: Send + Sync {
    async fn caption(
        &self,
        image: &PixelGrid,
        max_new_tokens: usize,
    ) -> Result<String, ImageCaptionerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageCaptionerError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
