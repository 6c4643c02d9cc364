use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{D, DType, Device, Module, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::blip;
use image::imageops::FilterType;
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{ImageCaptioner, ImageCaptionerError};
use crate::domain::PixelGrid;
use crate::infrastructure::model_source::ModelSource;

const BLIP_IMAGE_SIZE: u32 = 384;
const BLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const BLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];
const BOS_TOKEN_ID: u32 = 30522;
const SEP_TOKEN_ID: u32 = 102;

/// BLIP image-captioning model running in-process on candle.
pub struct CandleBlipCaptioner {
    model: Arc<Mutex<blip::BlipForConditionalGeneration>>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
}

impl CandleBlipCaptioner {
    pub fn new(source: &ModelSource) -> Result<Self, ImageCaptionerError> {
        let device = Device::cuda_if_available(0).unwrap_or(Device::Cpu);

        tracing::info!(
            source = %source.describe(),
            device = ?device,
            "Initializing BLIP image captioner"
        );

        let files = source
            .resolve()
            .map_err(|e| ImageCaptionerError::ModelLoadFailed(e.to_string()))?;

        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| ImageCaptionerError::ModelLoadFailed(format!("tokenizer: {e}")))?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&files.weights, DType::F32, &device)
                .map_err(|e| ImageCaptionerError::ModelLoadFailed(format!("weights: {e}")))?
        };

        let config = blip::Config::image_captioning_large();
        let model = blip::BlipForConditionalGeneration::new(&config, vb)
            .map_err(|e| ImageCaptionerError::ModelLoadFailed(format!("model: {e}")))?;

        tracing::info!("BLIP image captioner loaded successfully");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            tokenizer: Arc::new(tokenizer),
            device,
        })
    }

    /// Resizes to the BLIP input size and applies CLIP normalization,
    /// yielding a `(3, 384, 384)` tensor.
    fn preprocess_image(image: &PixelGrid) -> Result<Tensor, ImageCaptionerError> {
        let rgb = image::RgbImage::from_raw(image.width(), image.height(), image.as_rgb().to_vec())
            .ok_or_else(|| {
                ImageCaptionerError::InferenceFailed("pixel buffer size mismatch".to_string())
            })?;

        let resized = image::imageops::resize(
            &rgb,
            BLIP_IMAGE_SIZE,
            BLIP_IMAGE_SIZE,
            FilterType::Triangle,
        );

        let pixel_data: Vec<f32> = resized
            .into_raw()
            .into_iter()
            .map(|p| p as f32 / 255.0)
            .collect();

        let failed =
            |e: candle_core::Error| ImageCaptionerError::InferenceFailed(format!("image tensor: {e}"));

        let size = BLIP_IMAGE_SIZE as usize;
        let mean = Tensor::new(&BLIP_MEAN, &Device::Cpu)
            .and_then(|t| t.reshape((3, 1, 1)))
            .map_err(failed)?;
        let std = Tensor::new(&BLIP_STD, &Device::Cpu)
            .and_then(|t| t.reshape((3, 1, 1)))
            .map_err(failed)?;

        Tensor::from_vec(pixel_data, (size, size, 3), &Device::Cpu)
            .and_then(|t| t.permute((2, 0, 1)))
            .and_then(|t| t.broadcast_sub(&mean))
            .and_then(|t| t.broadcast_div(&std))
            .map_err(failed)
    }
}

#[async_trait]
impl ImageCaptioner for CandleBlipCaptioner {
    async fn caption(
        &self,
        image: &PixelGrid,
        max_new_tokens: usize,
    ) -> Result<String, ImageCaptionerError> {
        let model = Arc::clone(&self.model);
        let tokenizer = Arc::clone(&self.tokenizer);
        let device = self.device.clone();
        let image = image.clone();

        tokio::task::spawn_blocking(move || {
            run_caption(&model, &tokenizer, &device, &image, max_new_tokens)
        })
        .await
        .map_err(|e| ImageCaptionerError::InferenceFailed(format!("task join error: {e}")))?
    }
}

fn run_caption(
    model: &Mutex<blip::BlipForConditionalGeneration>,
    tokenizer: &Tokenizer,
    device: &Device,
    image: &PixelGrid,
    max_new_tokens: usize,
) -> Result<String, ImageCaptionerError> {
    let failed = |e: candle_core::Error| ImageCaptionerError::InferenceFailed(e.to_string());

    let pixels = CandleBlipCaptioner::preprocess_image(image)?
        .to_device(device)
        .and_then(|t| t.unsqueeze(0))
        .map_err(failed)?;

    let mut model = model.blocking_lock();
    model.reset_kv_cache();

    let image_embeds = model.vision_model().forward(&pixels).map_err(failed)?;

    let mut token_ids = vec![BOS_TOKEN_ID];

    for index in 0..max_new_tokens {
        let context_size = if index > 0 { 1 } else { token_ids.len() };
        let start = token_ids.len().saturating_sub(context_size);

        let input_ids = Tensor::new(&token_ids[start..], device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(failed)?;

        let logits = model
            .text_decoder()
            .forward(&input_ids, &image_embeds)
            .and_then(|l| l.squeeze(0))
            .map_err(failed)?;

        let last = logits
            .dim(0)
            .and_then(|len| logits.get(len - 1))
            .map_err(failed)?;

        let token = last
            .argmax(D::Minus1)
            .and_then(|t| t.to_scalar::<u32>())
            .map_err(failed)?;

        if token == SEP_TOKEN_ID {
            break;
        }
        token_ids.push(token);
    }

    let caption = tokenizer
        .decode(&token_ids[1..], true)
        .map_err(|e| ImageCaptionerError::InferenceFailed(format!("decode: {e}")))?;

    Ok(caption.trim().to_string())
}
