use std::path::Path;

pub const DEFAULT_AUDIO_EXTENSION: &str = "webm";

#[derive(Debug, Clone, PartialEq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, filename: Option<String>) -> Self {
        Self { bytes, filename }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lower-cased extension of the original filename, `webm` when the name
    /// has none.
    pub fn extension(&self) -> String {
        self.filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| is_safe_extension(ext))
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_AUDIO_EXTENSION.to_string())
    }
}

fn is_safe_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
}
