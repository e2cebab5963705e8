//! Matchbook: matchmaking HTTP backend over an embedded document store.

/// Environment configuration.
pub mod config;
/// Storage layer.
pub mod db;
/// Application error type and HTTP mapping.
pub mod error;
/// HTTP handlers.
pub mod handlers;
/// Orientation filter and match query composer.
pub mod matching;
/// Request/response and domain types.
pub mod models;

pub use config::Config;
pub use db::Database;
pub use error::AppError;

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    routing::{delete, get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state passed to HTTP handlers. The store handle is owned here
/// and injected by axum; there is no process-wide singleton client.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from
///   any origin.
///
/// # Panics
/// Panics if static origin values fail to parse (should not happen).
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors = if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
            ])
            .allow_headers(tower_http::cors::Any)
    } else {
        let port = state.config.port;
        CorsLayer::new()
            .allow_origin([
                format!("http://localhost:{}", port).parse().unwrap(),
                format!("http://127.0.0.1:{}", port).parse().unwrap(),
            ])
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    };

    let max_request_size = state.config.max_request_size;

    Router::new()
        .route("/user", post(handlers::user::create_user))
        .route(
            "/user/:user_id",
            get(handlers::user::get_user).delete(handlers::user::delete_user),
        )
        .route(
            "/user/:user_id/listing",
            get(handlers::listing::get_all_listings),
        )
        .route(
            "/user/:user_id/:listing_type",
            get(handlers::listing::get_listing).post(handlers::listing::post_listing),
        )
        .route(
            "/user/:user_id/:listing_type/:other_user_id",
            delete(handlers::listing::delete_listing_entry),
        )
        .route("/match-making", post(handlers::matchmaking::find_matches))
        .route("/learnings", get(handlers::content::list_learnings))
        .route(
            "/learnings/:learning_id",
            get(handlers::content::get_learning),
        )
        .route("/interests", get(handlers::content::list_interests))
        .route("/send-email", post(handlers::mail::send_email))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_request_size))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Resolve the listener address from env var overrides and security
/// policy: non-loopback binds require public access to be enabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

/// Run the server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state, allow_public_access);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
