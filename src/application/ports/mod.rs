mod audio_transcoder;
mod image_captioner;
mod speech_recognizer;
mod text_generator;

pub use audio_transcoder::{AudioTranscoder, TranscodeError};
pub use image_captioner::{ImageCaptioner, ImageCaptionerError};
pub use speech_recognizer::{RecognitionError, SpeechRecognizer};
pub use text_generator::{TextGenerator, TextGeneratorError};
