use std::path::Path;

use async_trait::async_trait;

/// Converts an audio file into a 16 kHz mono 16-bit PCM WAV file.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("resampling failed: {0}")]
    ResamplingFailed(String),
    #[error("wav encoding failed: {0}")]
    EncodingFailed(String),
    #[error("transcoder unavailable: {0}")]
    Unavailable(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
