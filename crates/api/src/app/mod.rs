//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store/image/catalog wiring from [`AppConfig`]
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request parsing and JSON response mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, extract::DefaultBodyLimit, routing::get};
use tower::ServiceBuilder;

use stockroom_auth::Hs256TokenVerifier;
use stockroom_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Request body cap. Above the image limit so oversized uploads reach validation.
pub const MAX_REQUEST_BYTES: usize = 4 * 1024 * 1024;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let verifier = Arc::new(Hs256TokenVerifier::new(&config.jwt_secret));
    let auth_state = middleware::AuthState { verifier };

    let services = Arc::new(services::build_services(config).await?);

    // Protected routes: require a verified session.
    let protected = routes::router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let storage_route = format!("{}/*key", config.public_storage_prefix);

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .route("/", get(routes::system::home))
        .route(&storage_route, get(routes::storage::serve))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_requests))
                .layer(Extension(services))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES)),
        ))
}
