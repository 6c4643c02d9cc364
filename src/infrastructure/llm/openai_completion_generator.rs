use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{TextGenerator, TextGeneratorError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Text generation through an OpenAI-compatible `/completions` endpoint
/// (OpenAI, vLLM, llama.cpp server, LM Studio).
pub struct OpenAiCompletionGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAiCompletionGenerator {
    pub fn new(base_url: Option<String>, api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompletionGenerator {
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: usize,
    ) -> Result<String, TextGeneratorError> {
        let url = format!("{}/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: max_new_tokens,
            temperature: 0.0,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(model = %self.model, "Sending prompt to completions API");

        let response = request
            .send()
            .await
            .map_err(|e| TextGeneratorError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TextGeneratorError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| TextGeneratorError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| TextGeneratorError::InvalidResponse("no choices".to_string()))
    }
}
