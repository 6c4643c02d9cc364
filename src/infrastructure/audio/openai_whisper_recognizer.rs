use std::io::Cursor;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{RecognitionError, SpeechRecognizer};
use crate::domain::PcmAudio;

/// OpenAI-compatible `/audio/transcriptions` endpoint fed with the canonical
/// WAV.
pub struct OpenAiWhisperRecognizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiWhisperRecognizer {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

pub fn encode_wav(audio: &PcmAudio) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in &audio.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

#[async_trait]
impl SpeechRecognizer for OpenAiWhisperRecognizer {
    async fn recognize(&self, audio: &PcmAudio) -> Result<String, RecognitionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let wav = encode_wav(audio)
            .map_err(|e| RecognitionError::RequestFailed(format!("wav encode: {}", e)))?;

        let file_part = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| RecognitionError::RequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(model = %self.model, "Sending audio to Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::RequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RecognitionError::RequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| RecognitionError::RequestFailed(format!("body: {}", e)))?;

        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(RecognitionError::NotUnderstood);
        }

        tracing::info!(chars = transcript.len(), "Whisper transcription completed");

        Ok(transcript.to_string())
    }
}
