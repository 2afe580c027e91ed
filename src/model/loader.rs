use std::{fs, time::Instant};

use parking_lot::Mutex;
use tch::{Device, Tensor, no_grad};
use tokenizers::Tokenizer;
use tracing::debug;

use crate::{
    config::AppConfig,
    error::ServiceError,
    model::{
        DecodingParams, ModelMetadata,
        generation::{decode_sequence, greedy_extend, resolve_eos_id},
    },
};

/// A TorchScript causal language model with its tokenizer.
///
/// The module is guarded by a mutex so only one generation runs at a time.
pub struct CausalLm {
    tokenizer: Tokenizer,
    eos_token_id: u32,
    device: Device,
    metadata: ModelMetadata,
    module: Mutex<tch::CModule>,
}

impl CausalLm {
    pub fn load(config: &AppConfig) -> Result<Self, ServiceError> {
        let tokenizer = Tokenizer::from_file(config.tokenizer_path.as_path())
            .map_err(|e| ServiceError::Tokenizer(e.to_string()))?;
        let eos_token_id = resolve_eos_id(&tokenizer, &config.eos_token)?;

        let module_path = config.module_path.as_path();
        if !module_path.exists() {
            return Err(ServiceError::Other(format!(
                "model artifact missing: {}",
                module_path.display()
            )));
        }
        let size_bytes = fs::metadata(module_path)?.len();
        let mut module = tch::CModule::load_on_device(module_path, config.device)
            .map_err(|e| ServiceError::Inference(e.to_string()))?;
        module.set_eval();

        Ok(Self {
            tokenizer,
            eos_token_id,
            device: config.device,
            metadata: ModelMetadata {
                name: config.model_id.clone(),
                dtype: "float32".to_string(),
                device: format!("{:?}", config.device),
                size_bytes,
            },
            module: Mutex::new(module),
        })
    }

    pub fn metadata(&self) -> ModelMetadata {
        self.metadata.clone()
    }

    /// Runs greedy generation and returns the decoded prompt plus continuation.
    pub fn generate(&self, text: &str, params: &DecodingParams) -> Result<String, ServiceError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ServiceError::Tokenizer(e.to_string()))?;
        let mut input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let prompt_token_len = input_ids.len();

        let start = Instant::now();

        let tokens_generated = no_grad(|| {
            let module = self.module.lock();
            greedy_extend(
                &mut input_ids,
                params,
                self.eos_token_id as i64,
                |ids| self.next_token(&module, ids),
            )
        })?;

        let elapsed = start.elapsed();
        debug!(
            prompt_tokens = prompt_token_len,
            tokens_generated,
            tokens_per_second = tokens_generated as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
            "generation finished"
        );

        decode_sequence(&self.tokenizer, &input_ids)
    }

    fn next_token(&self, module: &tch::CModule, ids: &[i64]) -> Result<i64, ServiceError> {
        let input_tensor = Tensor::from_slice(ids)
            .reshape([1, ids.len() as i64])
            .to(self.device);

        // Traced exports return either bare logits or (logits, past).
        let output = module
            .forward_is(&[tch::IValue::Tensor(input_tensor)])
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        let logits = match output {
            tch::IValue::Tensor(t) => t,
            tch::IValue::Tuple(ref tuple) if !tuple.is_empty() => match &tuple[0] {
                tch::IValue::Tensor(t) => t.shallow_clone(),
                _ => {
                    return Err(ServiceError::Inference(
                        "expected tensor as first tuple element".into(),
                    ));
                }
            },
            _ => {
                return Err(ServiceError::Inference(
                    "unexpected model output format".into(),
                ));
            }
        };

        // [1, seq_len, vocab] -> [vocab] at the last position
        let last_logits = logits.select(1, -1).squeeze();
        Ok(last_logits.argmax(0, false).int64_value(&[]))
    }
}
