use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::{
    config::AppConfig,
    enricher::PromptEnricher,
    error::ServiceError,
    model::{DecodingParams, ModelMetadata, TextCompletion},
};

#[derive(Clone)]
pub struct AppState {
    pub enricher: PromptEnricher,
    pub max_prompt_chars: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RewriteResponse {
    pub rewrite: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: bool,
}

#[derive(Serialize)]
struct MetadataResponse {
    model: Option<ModelMetadata>,
    decoding: DecodingParams,
}

pub fn build_router(config: Arc<AppConfig>, completion: Arc<dyn TextCompletion>) -> Router {
    let state = AppState {
        enricher: PromptEnricher::new(completion),
        max_prompt_chars: config.max_prompt_chars,
    };

    Router::new()
        .route("/status", get(status))
        .route("/rewrite_prompt", post(rewrite_prompt))
        .route("/metadata", get(metadata))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse { status: true })
}

async fn rewrite_prompt(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, ServiceError> {
    if let Some(limit) = state.max_prompt_chars {
        let len = request.prompt.chars().count();
        if len > limit {
            return Err(ServiceError::BadRequest(format!(
                "prompt is {len} characters, limit is {limit}"
            )));
        }
    }

    let rewrite = state.enricher.enrich(&request.prompt).await?;
    Ok(Json(RewriteResponse { rewrite }))
}

async fn metadata(State(state): State<AppState>) -> Json<MetadataResponse> {
    Json(MetadataResponse {
        model: state.enricher.model_metadata(),
        decoding: state.enricher.decoding_params(),
    })
}
