use crate::application::ports::{RecognitionError, SpeechRecognizer};
use crate::domain::PcmAudio;

pub const MOCK_TRANSCRIPT: &str = "Mock transcript";

/// Treats all-zero audio as silence, anything else as speech.
pub struct MockSpeechRecognizer;

#[async_trait::async_trait]
impl SpeechRecognizer for MockSpeechRecognizer {
    async fn recognize(&self, audio: &PcmAudio) -> Result<String, RecognitionError> {
        if audio.samples.iter().all(|&s| s == 0) {
            return Err(RecognitionError::NotUnderstood);
        }
        Ok(MOCK_TRANSCRIPT.to_string())
    }
}
