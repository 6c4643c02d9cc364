use std::sync::Arc;

use crate::application::ports::{TextGenerator, TextGeneratorError};
use crate::domain::Question;

pub const ANSWER_MAX_NEW_TOKENS: usize = 200;
const ANSWER_MARKER: &str = "Answer:";

pub struct AnswerService {
    generator: Arc<dyn TextGenerator>,
    max_new_tokens: usize,
}

impl AnswerService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            max_new_tokens: ANSWER_MAX_NEW_TOKENS,
        }
    }

    pub async fn answer(&self, question: &Question) -> Result<String, AnswerError> {
        let prompt = build_prompt(question);

        tracing::debug!(
            prompt_chars = prompt.len(),
            has_context = question.context().is_some(),
            "Generating answer"
        );

        let raw = self
            .generator
            .generate(&prompt, self.max_new_tokens)
            .await
            .map_err(AnswerError::Generation)?;

        Ok(extract_answer(&raw))
    }
}

pub fn build_prompt(question: &Question) -> String {
    match question.context() {
        Some(context) => format!(
            "Context: {}\nQuestion: {}\n{}",
            context, question.text, ANSWER_MARKER
        ),
        None => format!("Question: {}\n{}", question.text, ANSWER_MARKER),
    }
}

/// Drops the echoed prompt: keeps what follows the last `Answer:` marker.
pub fn extract_answer(raw: &str) -> String {
    let tail = match raw.rfind(ANSWER_MARKER) {
        Some(idx) => &raw[idx + ANSWER_MARKER.len()..],
        None => raw,
    };
    tail.trim().to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("answer generation failed: {0}")]
    Generation(TextGeneratorError),
}
