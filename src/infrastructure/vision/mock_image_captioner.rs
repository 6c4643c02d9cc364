use crate::application::ports::{ImageCaptioner, ImageCaptionerError};
use crate::domain::PixelGrid;

pub struct MockImageCaptioner;

#[async_trait::async_trait]
impl ImageCaptioner for MockImageCaptioner {
    async fn caption(
        &self,
        image: &PixelGrid,
        _max_new_tokens: usize,
    ) -> Result<String, ImageCaptionerError> {
        Ok(format!(
            "a mock picture of {}x{} pixels",
            image.width(),
            image.height()
        ))
    }
}
