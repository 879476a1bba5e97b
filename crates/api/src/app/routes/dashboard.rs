use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn show(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.catalog.dashboard().await {
        Ok(dashboard) => {
            Json(dto::dashboard_to_json(&dashboard, &services.public_storage_prefix)).into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}
