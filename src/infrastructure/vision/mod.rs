mod candle_blip_captioner;
mod image_captioner_factory;
mod mock_image_captioner;
mod openai_vision_captioner;

pub use candle_blip_captioner::CandleBlipCaptioner;
pub use image_captioner_factory::ImageCaptionerFactory;
pub use mock_image_captioner::MockImageCaptioner;
pub use openai_vision_captioner::{CAPTION_PROMPT, OpenAiVisionCaptioner};
