use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prompt_enrichment_service::{AppConfig, TextCompletion, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(model = %config.model_id, "loading model artifacts");

    let completion = load_completion(config.as_ref())?;
    let router = build_router(config.clone(), completion);

    let listener = TcpListener::bind(config.listen_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "REST server ready");

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(feature = "tch-backend")]
fn load_completion(config: &AppConfig) -> anyhow::Result<Arc<dyn TextCompletion>> {
    let registry = prompt_enrichment_service::model::ModelRegistry::initialize(config)?;
    Ok(Arc::new(registry))
}

#[cfg(not(feature = "tch-backend"))]
fn load_completion(_config: &AppConfig) -> anyhow::Result<Arc<dyn TextCompletion>> {
    anyhow::bail!("built without an inference backend; enable the `tch-backend` feature")
}

fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,hyper=warn,axum::rejection=trace".into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
