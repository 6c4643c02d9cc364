use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{D, DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::phi::{Config as PhiConfig, Model as Phi};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{TextGenerator, TextGeneratorError};
use crate::infrastructure::model_source::ModelSource;

const EOS_TOKEN: &str = "<|endoftext|>";

/// Phi-2 causal language model running in-process on candle.
///
/// Decoding is greedy. The returned text is the prompt followed by the
/// continuation, like `generate` + `decode` on a causal model.
pub struct CandlePhiGenerator {
    model: Arc<Mutex<Phi>>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
    eos_token: u32,
}

impl CandlePhiGenerator {
    pub fn new(source: &ModelSource) -> Result<Self, TextGeneratorError> {
        let device = Device::cuda_if_available(0).unwrap_or(Device::Cpu);

        tracing::info!(
            source = %source.describe(),
            device = ?device,
            "Initializing Phi text generator"
        );

        let files = source
            .resolve()
            .map_err(|e| TextGeneratorError::ModelLoadFailed(e.to_string()))?;

        let config_contents = std::fs::read_to_string(&files.config)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: PhiConfig = serde_json::from_str(&config_contents)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("tokenizer: {}", e)))?;
        let eos_token = tokenizer.token_to_id(EOS_TOKEN).ok_or_else(|| {
            TextGeneratorError::ModelLoadFailed(format!("tokenizer has no {EOS_TOKEN} token"))
        })?;

        let dtype = if device.is_cpu() {
            DType::F32
        } else {
            DType::F16
        };

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&files.weights, dtype, &device)
                .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = Phi::new(&config, vb)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!("Phi text generator loaded successfully");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            tokenizer: Arc::new(tokenizer),
            device,
            eos_token,
        })
    }
}

#[async_trait]
impl TextGenerator for CandlePhiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: usize,
    ) -> Result<String, TextGeneratorError> {
        let model = Arc::clone(&self.model);
        let tokenizer = Arc::clone(&self.tokenizer);
        let device = self.device.clone();
        let eos_token = self.eos_token;
        let prompt = prompt.to_string();

        tokio::task::spawn_blocking(move || {
            run_generation(
                &model,
                &tokenizer,
                &device,
                eos_token,
                &prompt,
                max_new_tokens,
            )
        })
        .await
        .map_err(|e| TextGeneratorError::GenerationFailed(format!("task join error: {e}")))?
    }
}

fn run_generation(
    model: &Mutex<Phi>,
    tokenizer: &Tokenizer,
    device: &Device,
    eos_token: u32,
    prompt: &str,
    max_new_tokens: usize,
) -> Result<String, TextGeneratorError> {
    let failed = |e: candle_core::Error| TextGeneratorError::GenerationFailed(e.to_string());

    let encoding = tokenizer
        .encode(prompt, true)
        .map_err(|e| TextGeneratorError::GenerationFailed(format!("tokenize: {e}")))?;
    let mut tokens: Vec<u32> = encoding.get_ids().to_vec();

    if tokens.is_empty() {
        return Err(TextGeneratorError::GenerationFailed(
            "prompt produced no tokens".to_string(),
        ));
    }

    let prompt_len = tokens.len();
    let mut model = model.blocking_lock();
    model.clear_kv_cache();

    for index in 0..max_new_tokens {
        // the KV cache holds everything but the newest token after the first pass
        let context_size = if index > 0 { 1 } else { tokens.len() };
        let start = tokens.len() - context_size;

        let input = Tensor::new(&tokens[start..], device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(failed)?;

        let next_token = model
            .forward(&input)
            .and_then(|logits| logits.squeeze(0))
            .and_then(|logits| logits.to_dtype(DType::F32))
            .and_then(|logits| logits.argmax(D::Minus1))
            .and_then(|t| t.to_scalar::<u32>())
            .map_err(failed)?;

        if next_token == eos_token {
            break;
        }
        tokens.push(next_token);
    }

    tracing::debug!(
        prompt_tokens = prompt_len,
        generated_tokens = tokens.len() - prompt_len,
        "Phi generation finished"
    );

    tokenizer
        .decode(&tokens, true)
        .map_err(|e| TextGeneratorError::GenerationFailed(format!("decode: {e}")))
}
