mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    AudioSettings, CaptioningProvider, CaptioningSettings, FrontendSettings, LlmSettings,
    LoggingSettings, ServerSettings, Settings, SpeechProvider, SpeechSettings,
    TextGenerationProvider, TranscoderKind,
};
