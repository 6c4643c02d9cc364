use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{RecognitionError, SpeechRecognizer};
use crate::domain::PcmAudio;

const DEFAULT_BASE_URL: &str = "https://speech.googleapis.com/v1";

/// Google Cloud Speech-to-Text, synchronous `speech:recognize` with
/// `LINEAR16` audio.
pub struct GoogleSpeechRecognizer {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl GoogleSpeechRecognizer {
    pub fn new(api_key: String, base_url: Option<String>, language: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            language,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

/// Joins the top alternative of every result. No results means the service
/// heard nothing it could transcribe.
pub fn parse_recognize_response(body: &[u8]) -> Result<String, RecognitionError> {
    let response: RecognizeResponse = serde_json::from_slice(body)
        .map_err(|e| RecognitionError::RequestFailed(format!("invalid response: {e}")))?;

    let transcript = response
        .results
        .iter()
        .filter_map(|r| r.alternatives.first())
        .map(|a| a.transcript.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if transcript.is_empty() {
        Err(RecognitionError::NotUnderstood)
    } else {
        Ok(transcript)
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    async fn recognize(&self, audio: &PcmAudio) -> Result<String, RecognitionError> {
        let url = format!("{}/speech:recognize", self.base_url);

        let body = serde_json::json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": audio.sample_rate,
                "audioChannelCount": 1,
                "languageCode": self.language,
            },
            "audio": {
                "content": general_purpose::STANDARD.encode(audio.to_le_bytes()),
            }
        });

        tracing::debug!(
            language = %self.language,
            duration_secs = audio.duration_secs(),
            "Sending audio to Google Speech API"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| RecognitionError::RequestFailed(format!("recognition request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RecognitionError::RequestFailed(format!(
                "recognition request failed; HTTP {}: {}",
                status,
                text.trim()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RecognitionError::RequestFailed(format!("body: {e}")))?;

        parse_recognize_response(&bytes)
    }
}
