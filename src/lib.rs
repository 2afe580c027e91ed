pub mod config;
pub mod enricher;
pub mod error;
pub mod model;
pub mod prompt;
pub mod sanitize;
pub mod server;

pub use config::AppConfig;
pub use enricher::PromptEnricher;
pub use error::ServiceError;
pub use model::{DecodingParams, ModelMetadata, TextCompletion};
pub use server::build_router;
