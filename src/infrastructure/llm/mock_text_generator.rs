use crate::application::ports::{TextGenerator, TextGeneratorError};

/// Echoes the prompt followed by a canned answer, the way a causal model
/// echoes its input.
pub struct MockTextGenerator;

pub const MOCK_ANSWER: &str = "Mock answer";

#[async_trait::async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _max_new_tokens: usize,
    ) -> Result<String, TextGeneratorError> {
        Ok(format!("{prompt} {MOCK_ANSWER}"))
    }
}
