use async_trait::async_trait;

use crate::domain::PcmAudio;

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, audio: &PcmAudio) -> Result<String, RecognitionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("could not understand audio")]
    NotUnderstood,
    #[error("{0}")]
    RequestFailed(String),
    #[error("recognizer configuration: {0}")]
    Configuration(String),
}
