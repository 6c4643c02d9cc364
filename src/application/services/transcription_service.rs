use std::path::PathBuf;
use std::sync::Arc;

use tracing::Instrument;

use crate::application::ports::{AudioTranscoder, RecognitionError, SpeechRecognizer};
use crate::domain::{AudioPayload, CANONICAL_SAMPLE_RATE, PcmAudio};

use super::temp_artifact::{TempArtifact, materialize_input, output_path};

/// Runs one upload through received -> materialized -> transcoded ->
/// transcribed. Every state is terminal on failure and both scratch files are
/// released when the pipeline finishes, whichever state it stopped in.
///
/// The pipeline runs in its own task that owns both scratch guards, so a
/// caller dropping the future (client disconnect, timeout) detaches the work
/// instead of abandoning it mid-transcode with files on disk.
pub struct TranscriptionService {
    transcoder: Arc<dyn AudioTranscoder>,
    recognizer: Arc<dyn SpeechRecognizer>,
    scratch_dir: PathBuf,
}

impl TranscriptionService {
    pub fn new(
        transcoder: Arc<dyn AudioTranscoder>,
        recognizer: Arc<dyn SpeechRecognizer>,
        scratch_dir: PathBuf,
    ) -> Self {
        Self {
            transcoder,
            recognizer,
            scratch_dir,
        }
    }

    #[tracing::instrument(skip(self, audio), fields(bytes = audio.bytes.len()))]
    pub async fn transcribe(&self, audio: &AudioPayload) -> Result<String, TranscriptionError> {
        if audio.is_empty() {
            tracing::warn!("Empty audio payload received");
            return Err(TranscriptionError::EmptyAudio);
        }

        let pipeline = Pipeline {
            transcoder: Arc::clone(&self.transcoder),
            recognizer: Arc::clone(&self.recognizer),
            scratch_dir: self.scratch_dir.clone(),
        };
        let extension = audio.extension();
        let bytes = audio.bytes.clone();

        tokio::spawn(async move { pipeline.run(&extension, &bytes).await }.in_current_span())
            .await
            .map_err(|e| TranscriptionError::Unexpected(format!("transcription task failed: {e}")))?
    }
}

struct Pipeline {
    transcoder: Arc<dyn AudioTranscoder>,
    recognizer: Arc<dyn SpeechRecognizer>,
    scratch_dir: PathBuf,
}

impl Pipeline {
    async fn run(&self, extension: &str, bytes: &[u8]) -> Result<String, TranscriptionError> {
        let (id, input) = materialize_input(&self.scratch_dir, extension, bytes)
            .await
            .map_err(|e| TranscriptionError::Unexpected(format!("failed to stage audio: {e}")))?;
        let output = TempArtifact::new(output_path(&self.scratch_dir, &id));

        tracing::debug!(temp_id = %id, extension = %extension, "Audio materialized");

        self.transcoder
            .transcode(input.path(), output.path())
            .await
            .map_err(|e| TranscriptionError::Unexpected(format!("audio conversion failed: {e}")))?;

        let pcm = read_canonical_wav(output.path().to_path_buf()).await?;

        tracing::debug!(
            temp_id = %id,
            duration_secs = pcm.duration_secs(),
            "Audio transcoded, submitting to recognizer"
        );

        match self.recognizer.recognize(&pcm).await {
            Ok(text) => {
                tracing::info!(chars = text.len(), "Transcription completed");
                Ok(text)
            }
            Err(RecognitionError::NotUnderstood) => {
                tracing::info!("Speech not recognized");
                Err(TranscriptionError::NotRecognized)
            }
            Err(RecognitionError::RequestFailed(detail)) => {
                tracing::warn!(error = %detail, "Speech recognition request failed");
                Err(TranscriptionError::Upstream(detail))
            }
            Err(e) => Err(TranscriptionError::Unexpected(e.to_string())),
        }
    }
}

async fn read_canonical_wav(path: PathBuf) -> Result<PcmAudio, TranscriptionError> {
    tokio::task::spawn_blocking(move || {
        let mut reader = hound::WavReader::open(&path)
            .map_err(|e| TranscriptionError::Unexpected(format!("failed to open wav: {e}")))?;
        let spec = reader.spec();

        if spec.channels != 1
            || spec.sample_rate != CANONICAL_SAMPLE_RATE
            || spec.bits_per_sample != 16
            || spec.sample_format != hound::SampleFormat::Int
        {
            return Err(TranscriptionError::Unexpected(format!(
                "transcoder produced {} Hz / {} ch / {} bit audio, expected 16 kHz mono 16 bit",
                spec.sample_rate, spec.channels, spec.bits_per_sample
            )));
        }

        let samples = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TranscriptionError::Unexpected(format!("failed to read wav: {e}")))?;

        Ok(PcmAudio::new(spec.sample_rate, samples))
    })
    .await
    .map_err(|e| TranscriptionError::Unexpected(format!("task join error: {e}")))?
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("Error: Empty audio file received")]
    EmptyAudio,
    #[error("Speech not recognized")]
    NotRecognized,
    #[error("Google API error: {0}")]
    Upstream(String),
    #[error("{0}")]
    Unexpected(String),
}

impl TranscriptionError {
    /// Expected failure modes; the caller should treat them as a bad request
    /// rather than a server fault.
    pub fn is_soft_failure(&self) -> bool {
        !matches!(self, Self::Unexpected(_))
    }
}
