use std::sync::Arc;

use image::ImageFormat;

use crate::application::ports::ImageCaptioner;
use crate::domain::{ImagePayload, PixelGrid};

pub const CAPTION_MAX_NEW_TOKENS: usize = 30;

pub struct CaptionService {
    captioner: Arc<dyn ImageCaptioner>,
    max_new_tokens: usize,
}

impl CaptionService {
    pub fn new(captioner: Arc<dyn ImageCaptioner>) -> Self {
        Self {
            captioner,
            max_new_tokens: CAPTION_MAX_NEW_TOKENS,
        }
    }

    pub async fn caption(&self, image: &ImagePayload) -> Result<String, CaptionError> {
        let grid = decode_image(image)?;

        tracing::debug!(
            width = grid.width(),
            height = grid.height(),
            "Image decoded, running captioner"
        );

        let caption = self
            .captioner
            .caption(&grid, self.max_new_tokens)
            .await
            .map_err(|e| CaptionError::Inference(e.to_string()))?;

        Ok(caption.trim().to_string())
    }
}

/// Decodes any supported encoding into an RGB grid. A declared MIME type is
/// tried first, content sniffing is the fallback.
pub fn decode_image(payload: &ImagePayload) -> Result<PixelGrid, CaptionError> {
    let declared = payload
        .content_type
        .as_deref()
        .and_then(ImageFormat::from_mime_type);

    let decoded = match declared {
        Some(format) => image::load_from_memory_with_format(&payload.bytes, format)
            .or_else(|_| image::load_from_memory(&payload.bytes)),
        None => image::load_from_memory(&payload.bytes),
    }
    .map_err(|e| CaptionError::Decode(e.to_string()))?;

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    PixelGrid::from_rgb(width, height, rgb.into_raw())
        .ok_or_else(|| CaptionError::Decode("unexpected pixel buffer size".to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("Error generating caption: {0}")]
    Decode(String),
    #[error("Error generating caption: {0}")]
    Inference(String),
}
