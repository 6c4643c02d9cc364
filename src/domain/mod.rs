mod audio_payload;
mod image_payload;
mod pcm_audio;
mod question;

pub use audio_payload::{AudioPayload, DEFAULT_AUDIO_EXTENSION};
pub use image_payload::{ImagePayload, PixelGrid};
pub use pcm_audio::{CANONICAL_SAMPLE_RATE, PcmAudio};
pub use question::Question;
