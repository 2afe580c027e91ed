use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;

use crate::{
    config::AppConfig,
    error::ServiceError,
    model::{CausalLm, DecodingParams, ModelMetadata, TextCompletion},
};

/// Process-wide handle to the loaded model. Loaded once before serving.
pub struct ModelRegistry {
    model: Arc<CausalLm>,
}

impl ModelRegistry {
    pub fn initialize(config: &AppConfig) -> Result<Self, ServiceError> {
        let model = CausalLm::load(config)?;
        Ok(Self {
            model: Arc::new(model),
        })
    }
}

#[async_trait]
impl TextCompletion for ModelRegistry {
    async fn complete(
        &self,
        formatted: &str,
        params: &DecodingParams,
    ) -> Result<String, ServiceError> {
        let model = self.model.clone();
        let text = formatted.to_string();
        let params = *params;

        task::spawn_blocking(move || model.generate(&text, &params))
            .await
            .map_err(|err| ServiceError::Inference(format!("inference task failed: {err}")))?
    }

    fn metadata(&self) -> Option<ModelMetadata> {
        Some(self.model.metadata())
    }
}
