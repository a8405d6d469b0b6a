mod config;
mod documents;
mod errors;
mod jd;
mod llm_client;
mod routes;
mod schema;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::documents::ocr::TesseractOcr;
use crate::documents::DocumentTextExtractor;
use crate::jd::enhancement::JdEnhancer;
use crate::jd::extraction::JdExtractor;
use crate::jd::pipeline::JdPipeline;
use crate::llm_client::structured::StructuredRequester;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{target}={level},tower_http={level}",
                target = env!("CARGO_CRATE_NAME"),
                level = config.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JD API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.gpt_model.clone(),
        &config.openai_base_url,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let requester = StructuredRequester::new(Arc::new(llm));
    let documents = DocumentTextExtractor::new(TesseractOcr::new(
        config.tesseract_path.clone(),
        config.ocr_language.clone(),
    ));
    let pipeline = JdPipeline::new(
        documents,
        JdExtractor::new(requester.clone()),
        JdEnhancer::new(requester),
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
