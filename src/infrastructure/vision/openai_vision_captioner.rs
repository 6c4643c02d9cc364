use std::io::Cursor;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, RgbImage};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{ImageCaptioner, ImageCaptionerError};
use crate::domain::PixelGrid;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const CAPTION_PROMPT: &str =
    "Write one short sentence describing this image. Output only the caption.";

/// Captioning through an OpenAI-compatible vision chat endpoint.
pub struct OpenAiVisionCaptioner {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiVisionCaptioner {
    pub fn new(base_url: Option<String>, api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

fn encode_png(image: &PixelGrid) -> Result<Vec<u8>, ImageCaptionerError> {
    let rgb = RgbImage::from_raw(image.width(), image.height(), image.as_rgb().to_vec())
        .ok_or_else(|| {
            ImageCaptionerError::InferenceFailed("pixel buffer size mismatch".to_string())
        })?;

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ImageCaptionerError::InferenceFailed(format!("png encode: {e}")))?;
    Ok(png)
}

#[async_trait]
impl ImageCaptioner for OpenAiVisionCaptioner {
    async fn caption(
        &self,
        image: &PixelGrid,
        max_new_tokens: usize,
    ) -> Result<String, ImageCaptionerError> {
        let b64 = general_purpose::STANDARD.encode(encode_png(image)?);
        let data_uri = format!("data:image/png;base64,{b64}");

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": { "url": data_uri }
                        },
                        {
                            "type": "text",
                            "text": CAPTION_PROMPT
                        }
                    ]
                }
            ],
            "max_tokens": max_new_tokens,
            "temperature": 0.0,
            "stream": false
        });

        let url = format!("{}/chat/completions", self.base_url);

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ImageCaptionerError::ApiRequestFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ImageCaptionerError::ApiRequestFailed(format!(
                "HTTP {status}: {text}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ImageCaptionerError::ApiRequestFailed(format!("parse: {e}")))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}
