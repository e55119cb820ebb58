//! HTTP API gateway for ReadPal.
//!
//! Exposes the reading-companion operations as JSON endpoints for the
//! reading UI. Built on Axum; every handler is a thin caller of
//! [`ReadingCompanion`].

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use readpal_agent::ProviderAgentFactory;
use readpal_companion::ReadingCompanion;
use readpal_config::{AppConfig, GatewayConfig};
use readpal_knowledge::PdfKnowledgeSource;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use handlers::*;

/// Shared application state for the gateway.
pub type SharedState = Arc<ReadingCompanion>;

/// Wire the production collaborators (provider, PDF pipeline, RAG agents)
/// into a companion.
pub fn build_companion(config: &AppConfig) -> Result<SharedState, Box<dyn std::error::Error>> {
    let router = readpal_providers::router::build_from_config(config);
    let provider = router
        .default()
        .ok_or("No default provider configured; set an API key")?;

    info!(
        provider = provider.name(),
        model = %config.default_model,
        embedding_model = config.knowledge.active_embedding_model().unwrap_or("(keyword search)"),
        "Building reading companion"
    );

    let source = PdfKnowledgeSource::new(provider.clone(), &config.knowledge);
    let factory = ProviderAgentFactory::from_config(config, provider);
    Ok(Arc::new(ReadingCompanion::new(
        Arc::new(source),
        Arc::new(factory),
        &config.cache,
    )))
}

fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let origin = if config.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Build the Axum router with all gateway routes.
///
/// Layers: request body limit, CORS for the configured origins, HTTP trace logging.
pub fn build_router(state: SharedState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/process-pdf", post(process_pdf_handler))
        .route("/ask", post(ask_handler))
        .route("/summarize", post(summarize_handler))
        .route("/insights", post(insights_handler))
        .route("/personalized-insights", post(personalized_insights_handler))
        .route("/reading-progress", post(reading_progress_handler))
        .route("/suggestions/{user_id}", get(suggestions_handler))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(cors_layer(config))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until Ctrl-C.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let companion = build_companion(&config)?;
    let app = build_router(companion.clone(), &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    companion.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C; shutting down"),
    }
}
