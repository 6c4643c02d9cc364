use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{
    ImageCaptionerError, RecognitionError, TextGeneratorError, TranscodeError,
};
use crate::application::services::{AnswerService, CaptionService, TranscriptionService};
use crate::infrastructure::audio::{AudioTranscoderFactory, SpeechRecognizerFactory};
use crate::infrastructure::llm::TextGeneratorFactory;
use crate::infrastructure::vision::ImageCaptionerFactory;
use crate::presentation::config::Settings;

/// Everything a handler may touch. Built once at startup, shared read-only.
#[derive(Clone)]
pub struct AppState {
    pub answer_service: Arc<AnswerService>,
    pub caption_service: Arc<CaptionService>,
    pub transcription_service: Arc<TranscriptionService>,
    pub frontend_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("text generator: {0}")]
    TextGenerator(#[from] TextGeneratorError),
    #[error("image captioner: {0}")]
    ImageCaptioner(#[from] ImageCaptionerError),
    #[error("speech recognizer: {0}")]
    SpeechRecognizer(#[from] RecognitionError),
    #[error("audio transcoder: {0}")]
    AudioTranscoder(#[from] TranscodeError),
}

impl AppState {
    /// Loads or connects every capability named in `settings`. Local models
    /// are read from disk here, so this blocks.
    pub fn initialize(settings: &Settings) -> Result<Self, StartupError> {
        let generator = TextGeneratorFactory::create(&settings.llm)?;
        let captioner = ImageCaptionerFactory::create(&settings.captioning)?;
        let recognizer = SpeechRecognizerFactory::create(&settings.speech)?;
        let transcoder = AudioTranscoderFactory::create(&settings.audio)?;

        let scratch_dir = settings.audio.scratch_dir();
        tracing::info!(scratch_dir = %scratch_dir.display(), "Audio scratch directory");

        Ok(Self {
            answer_service: Arc::new(AnswerService::new(generator)),
            caption_service: Arc::new(CaptionService::new(captioner)),
            transcription_service: Arc::new(TranscriptionService::new(
                transcoder,
                recognizer,
                scratch_dir,
            )),
            frontend_dir: settings.frontend.dir.clone(),
            max_upload_bytes: settings.server.max_upload_bytes(),
        })
    }
}
