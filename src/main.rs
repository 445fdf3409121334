use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use clinic_assistant::adapters::http::{chat_router, ChatAppState};
use clinic_assistant::adapters::{HttpClinicGateway, HttpGatewayConfig, StaticCatalog, SystemClock};
use clinic_assistant::application::dialogue::DialogueEngine;
use clinic_assistant::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("load configuration failed")?;
    init_tracing(&config.server);
    config.validate().context("invalid configuration")?;

    let gateway = HttpClinicGateway::new(
        HttpGatewayConfig::new(
            config.gateway.appointment_base_url.clone(),
            config.gateway.queue_base_url.clone(),
            config.gateway.billing_base_url.clone(),
        )
        .with_timeout(config.gateway.timeout()),
    )
    .context("build clinic gateway failed")?;

    let settings = config.dialogue.settings()?;
    let engine = DialogueEngine::new(
        Arc::new(gateway),
        Arc::new(StaticCatalog::builtin()),
        Arc::new(SystemClock),
        settings,
    );

    let app = chat_router()
        .with_state(ChatAppState::new(Arc::new(engine)))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind server listener failed")?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "clinic assistant listening"
    );

    axum::serve(listener, app)
        .await
        .context("server terminated with error")
}

fn init_tracing(server: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
