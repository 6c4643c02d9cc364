use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoder, TranscodeError};
use crate::domain::CANONICAL_SAMPLE_RATE;

/// Transcodes through the `ffmpeg` binary, which handles the webm/opus
/// recordings browsers produce.
pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let sample_rate = CANONICAL_SAMPLE_RATE.to_string();

        let result = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"])
            .arg(input)
            .args(["-ar", sample_rate.as_str(), "-ac", "1", "-c:a", "pcm_s16le", "-f", "wav"])
            .arg(output)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TranscodeError::Unavailable(format!("{}: {}", self.binary, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(TranscodeError::DecodingFailed(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        tracing::debug!(input = %input.display(), "ffmpeg transcoding completed");

        Ok(())
    }
}

pub fn check_ffmpeg_binary(binary: &str) -> Result<(), TranscodeError> {
    let output = std::process::Command::new(binary)
        .arg("-version")
        .output()
        .map_err(|e| TranscodeError::Unavailable(format!("{binary}: {e}")))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(TranscodeError::Unavailable(format!(
            "{binary} -version exited with {}",
            output.status
        )))
    }
}
