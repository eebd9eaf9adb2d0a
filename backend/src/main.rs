mod config;
mod error;
mod handlers;
mod relay;
mod routes;

use anyhow::Result;
use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::relay::{HttpUpstream, RelayResolver};
use crate::routes::app_routes;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayResolver>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;

    tracing::info!(
        community_id = config.circle_community_id.as_deref().unwrap_or("unset"),
        community_host = %config.circle_community_host,
        "Starting community events relay"
    );

    let upstream = HttpUpstream::new(config.relay_timeout())?;
    let relay = RelayResolver::new(config.endpoints(), Arc::new(upstream));
    for (position, endpoint) in relay.endpoints().iter().enumerate() {
        tracing::info!(
            position = position + 1,
            endpoint = %endpoint.name,
            url = %endpoint.url,
            host_override = endpoint.header("host").unwrap_or("none"),
            "Upstream endpoint configured"
        );
    }

    let state = AppState {
        relay: Arc::new(relay),
    };
    let app = create_app(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState, config: &AppConfig) -> Router {
    let app = app_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config.cors_allowed_origins.as_deref()));

    // Serve the widget bundle if it has been built
    let frontend_dir = &config.frontend_dir;
    if std::path::Path::new(frontend_dir).exists() {
        tracing::info!("Serving frontend from {}", frontend_dir);
        let index_path = format!("{}/index.html", frontend_dir);
        let serve_dir = ServeDir::new(frontend_dir).not_found_service(ServeFile::new(index_path));
        app.fallback_service(serve_dir)
    } else {
        tracing::info!(
            "Frontend directory not found at {}, serving API only",
            frontend_dir
        );
        app
    }
}

/// Build CORS layer from `CORS_ALLOWED_ORIGINS`.
///
/// Unset or empty falls back to permissive CORS (for development only).
fn build_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS_ALLOWED_ORIGINS not set, using permissive CORS (not recommended for production)"
        );
        return CorsLayer::permissive();
    }

    tracing::info!("CORS configured for origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
