use std::sync::Arc;

use crate::application::ports::{TextGenerator, TextGeneratorError};
use crate::infrastructure::model_source::ModelSource;
use crate::presentation::config::{LlmSettings, TextGenerationProvider};

use super::{CandlePhiGenerator, MockTextGenerator, OpenAiCompletionGenerator};

pub struct TextGeneratorFactory;

impl TextGeneratorFactory {
    pub fn create(settings: &LlmSettings) -> Result<Arc<dyn TextGenerator>, TextGeneratorError> {
        match settings.provider {
            TextGenerationProvider::Local => {
                let source = ModelSource::new(
                    settings.model_dir.as_deref(),
                    &settings.model_id,
                    settings.revision.as_deref(),
                );
                Ok(Arc::new(CandlePhiGenerator::new(&source)?))
            }
            TextGenerationProvider::OpenAi => {
                tracing::info!(
                    model = %settings.model_id,
                    base_url = ?settings.base_url,
                    "Using remote completions API for text generation"
                );
                Ok(Arc::new(OpenAiCompletionGenerator::new(
                    settings.base_url.clone(),
                    settings.api_key.clone(),
                    settings.model_id.clone(),
                )))
            }
            TextGenerationProvider::Mock => {
                tracing::warn!("Using mock text generator");
                Ok(Arc::new(MockTextGenerator))
            }
        }
    }
}
