use axum::{Router, routing::get};

pub mod dashboard;
pub mod products;
pub mod storage;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .nest("/products", products::router())
}
