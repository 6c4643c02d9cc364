pub mod audio_decoder;
mod ffmpeg_transcoder;
mod google_speech_recognizer;
mod mock_speech_recognizer;
mod openai_whisper_recognizer;
mod speech_recognizer_factory;

pub use audio_decoder::SymphoniaTranscoder;
pub use ffmpeg_transcoder::{FfmpegTranscoder, check_ffmpeg_binary};
pub use google_speech_recognizer::{GoogleSpeechRecognizer, parse_recognize_response};
pub use mock_speech_recognizer::{MOCK_TRANSCRIPT, MockSpeechRecognizer};
pub use openai_whisper_recognizer::{OpenAiWhisperRecognizer, encode_wav};
pub use speech_recognizer_factory::{AudioTranscoderFactory, SpeechRecognizerFactory};
