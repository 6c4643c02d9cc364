use std::sync::Arc;

use crate::application::ports::{AudioTranscoder, RecognitionError, SpeechRecognizer, TranscodeError};
use crate::presentation::config::{AudioSettings, SpeechProvider, SpeechSettings, TranscoderKind};

use super::audio_decoder::SymphoniaTranscoder;
use super::ffmpeg_transcoder::{FfmpegTranscoder, check_ffmpeg_binary};
use super::google_speech_recognizer::GoogleSpeechRecognizer;
use super::mock_speech_recognizer::MockSpeechRecognizer;
use super::openai_whisper_recognizer::OpenAiWhisperRecognizer;

pub struct SpeechRecognizerFactory;

impl SpeechRecognizerFactory {
    pub fn create(settings: &SpeechSettings) -> Result<Arc<dyn SpeechRecognizer>, RecognitionError> {
        let api_key = settings.api_key.clone().filter(|k| !k.is_empty());

        match settings.provider {
            SpeechProvider::Google => {
                let key = api_key.ok_or_else(|| {
                    RecognitionError::Configuration(
                        "API key required for Google Speech-to-Text (set APP_SPEECH__API_KEY)"
                            .to_string(),
                    )
                })?;
                tracing::info!(language = %settings.language, "Using Google speech recognizer");
                Ok(Arc::new(GoogleSpeechRecognizer::new(
                    key,
                    settings.base_url.clone(),
                    settings.language.clone(),
                )))
            }
            SpeechProvider::OpenAi => {
                let key = api_key.ok_or_else(|| {
                    RecognitionError::Configuration(
                        "API key required for OpenAI Whisper (set APP_SPEECH__API_KEY)".to_string(),
                    )
                })?;
                tracing::info!(model = %settings.model, "Using Whisper speech recognizer");
                Ok(Arc::new(OpenAiWhisperRecognizer::new(
                    key,
                    settings.base_url.clone(),
                    Some(settings.model.clone()),
                )))
            }
            SpeechProvider::Mock => {
                tracing::warn!("Using mock speech recognizer");
                Ok(Arc::new(MockSpeechRecognizer))
            }
        }
    }
}

pub struct AudioTranscoderFactory;

impl AudioTranscoderFactory {
    pub fn create(settings: &AudioSettings) -> Result<Arc<dyn AudioTranscoder>, TranscodeError> {
        match settings.transcoder {
            TranscoderKind::Ffmpeg => {
                check_ffmpeg_binary(&settings.ffmpeg_binary)?;
                tracing::info!(binary = %settings.ffmpeg_binary, "Using ffmpeg audio transcoder");
                Ok(Arc::new(FfmpegTranscoder::new(settings.ffmpeg_binary.clone())))
            }
            TranscoderKind::Symphonia => {
                tracing::info!("Using symphonia audio transcoder");
                Ok(Arc::new(SymphoniaTranscoder))
            }
        }
    }
}
