use async_trait::async_trait;

use crate::error::ServiceError;

mod generation;
#[cfg(feature = "tch-backend")]
mod loader;
#[cfg(feature = "tch-backend")]
mod registry;
mod types;

#[cfg(feature = "tch-backend")]
pub use loader::CausalLm;
#[cfg(feature = "tch-backend")]
pub use registry::ModelRegistry;
pub use generation::{decode_sequence, greedy_extend, resolve_eos_id};
pub use types::{DecodingParams, ModelMetadata};

/// Read-only access to a loaded causal language model.
///
/// `complete` returns the full decoded sequence, i.e. the input text echoed
/// back followed by the continuation.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(
        &self,
        formatted: &str,
        params: &DecodingParams,
    ) -> Result<String, ServiceError>;

    fn metadata(&self) -> Option<ModelMetadata> {
        None
    }
}
