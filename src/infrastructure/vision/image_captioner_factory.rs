use std::sync::Arc;

use crate::application::ports::{ImageCaptioner, ImageCaptionerError};
use crate::infrastructure::model_source::ModelSource;
use crate::presentation::config::{CaptioningProvider, CaptioningSettings};

use super::{CandleBlipCaptioner, MockImageCaptioner, OpenAiVisionCaptioner};

pub struct ImageCaptionerFactory;

impl ImageCaptionerFactory {
    pub fn create(
        settings: &CaptioningSettings,
    ) -> Result<Arc<dyn ImageCaptioner>, ImageCaptionerError> {
        match settings.provider {
            CaptioningProvider::Local => {
                let source = ModelSource::new(
                    settings.model_dir.as_deref(),
                    &settings.model_id,
                    settings.revision.as_deref(),
                );
                Ok(Arc::new(CandleBlipCaptioner::new(&source)?))
            }
            CaptioningProvider::OpenAi => {
                tracing::info!(
                    model = %settings.model_id,
                    base_url = ?settings.base_url,
                    "Using remote vision API for captioning"
                );
                Ok(Arc::new(OpenAiVisionCaptioner::new(
                    settings.base_url.clone(),
                    settings.api_key.clone(),
                    settings.model_id.clone(),
                )))
            }
            CaptioningProvider::Mock => {
                tracing::warn!("Using mock image captioner");
                Ok(Arc::new(MockImageCaptioner))
            }
        }
    }
}
