use dotenvy::dotenv;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnResponse};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;
use std::sync::Arc;

mod config;
mod error;
mod handlers {
    pub mod analytics_handlers;
    pub mod contact_handlers;
}
mod models {
    pub mod contact_models;
    pub mod event_models;
}
mod repositories {
    pub mod event_repository;
}

use config::AppConfig;
use handlers::analytics_handlers;
use handlers::contact_handlers;
use repositories::event_repository::EventRepository;

async fn health_check() -> &'static str {
    "OK"
}

pub struct AppState {
    config: AppConfig,
    events: EventRepository,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            events: EventRepository::new(config.event_buffer_size),
            config,
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = match config.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(url)) => AllowOrigin::exact(url),
        Some(Err(e)) => {
            warn!("FRONTEND_URL is not a valid origin ({}), allowing any origin", e);
            AllowOrigin::from(Any)
        }
        None => {
            if !config.is_development() {
                warn!("FRONTEND_URL not set outside development, allowing any origin");
            }
            AllowOrigin::from(Any)
        }
    };

    CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_origin(origin)
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/analytics/events", post(analytics_handlers::ingest_event))
        .route("/api/analytics/summary", get(analytics_handlers::get_summary))
        .route("/api/contact", post(contact_handlers::submit_contact))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let port = config.port;
    info!("Starting clinic backend in {} mode", config.environment);

    let state = Arc::new(AppState::new(config));
    let app = app(state);

    use tokio::net::TcpListener;

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on port {}", port);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_check_responds() {
        let app = app(Arc::new(AppState::new(AppConfig::default())));
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cors_allows_configured_frontend() {
        let config = AppConfig {
            environment: "production".to_string(),
            frontend_url: Some("https://brightsmile.example".to_string()),
            ..AppConfig::default()
        };
        let app = app(Arc::new(AppState::new(config)));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("origin", "https://brightsmile.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").map(|v| v.as_bytes()),
            Some("https://brightsmile.example".as_bytes())
        );
    }
}
