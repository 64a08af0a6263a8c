mod config;
mod diagram;
mod error;
mod llm;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::error::ErrorCode;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, code = e.error_code(), "configuration invalid");
    })?;

    let llm = llm::LlmClient::from_config(config.llm)?;
    tracing::info!(provider = ?llm.provider(), model = llm.model(), "LLM client initialized");

    let pipeline = diagram::DiagramPipeline::new(Arc::new(llm), config.pipeline);
    let app = routes::app(state::AppState::new(pipeline), &config.cors);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "ripple listening");
    axum::serve(listener, app).await?;
    Ok(())
}
