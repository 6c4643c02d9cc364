use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub llm: LlmSettings,
    pub captioning: CaptioningSettings,
    pub speech: SpeechSettings,
    pub audio: AudioSettings,
    pub frontend: FrontendSettings,
}

impl Settings {
    /// Layers `appsettings.{environment}` (optional) under `APP_*` variables,
    /// e.g. `APP_SPEECH__API_KEY` sets `speech.api_key`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&environment.config_file_stem()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_mb: 25,
        }
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; empty falls back to the built-in default.
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextGenerationProvider {
    #[default]
    Local,
    #[serde(rename = "openai")]
    OpenAi,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: TextGenerationProvider,
    pub model_id: String,
    pub revision: Option<String>,
    pub model_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: TextGenerationProvider::default(),
            model_id: "microsoft/phi-2".to_string(),
            revision: None,
            model_dir: None,
            base_url: None,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptioningProvider {
    #[default]
    Local,
    #[serde(rename = "openai")]
    OpenAi,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptioningSettings {
    pub provider: CaptioningProvider,
    pub model_id: String,
    pub revision: Option<String>,
    pub model_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for CaptioningSettings {
    fn default() -> Self {
        Self {
            provider: CaptioningProvider::default(),
            model_id: "Salesforce/blip-image-captioning-large".to_string(),
            revision: Some("refs/pr/18".to_string()),
            model_dir: None,
            base_url: None,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    #[default]
    Google,
    #[serde(rename = "openai")]
    OpenAi,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub provider: SpeechProvider,
    pub language: String,
    /// Only read by the Whisper provider.
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::default(),
            language: "en-US".to_string(),
            model: "whisper-1".to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscoderKind {
    #[default]
    Ffmpeg,
    Symphonia,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub transcoder: TranscoderKind,
    pub ffmpeg_binary: String,
    pub scratch_dir: Option<PathBuf>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            transcoder: TranscoderKind::default(),
            ffmpeg_binary: "ffmpeg".to_string(),
            scratch_dir: None,
        }
    }
}

impl AudioSettings {
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontendSettings {
    pub dir: PathBuf,
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("frontend"),
        }
    }
}
