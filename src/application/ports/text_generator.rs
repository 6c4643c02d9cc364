use async_trait::async_trait;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the decoded model output. Causal models may echo the prompt.
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: usize,
    ) -> Result<String, TextGeneratorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextGeneratorError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
