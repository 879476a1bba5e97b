use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::IntoResponse,
};

use stockroom_infra::ImageStoreError;

use crate::app::errors::json_error;
use crate::app::services::AppServices;

/// Serve an uploaded product image by storage key.
pub async fn serve(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    match services.catalog.images().open(&key).await {
        Ok(Some(image)) => (
            [(header::CONTENT_TYPE, image.content_type)],
            image.bytes,
        )
            .into_response(),
        Ok(None) | Err(ImageStoreError::InvalidKey(_)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "File not found.")
        }
        Err(e) => {
            tracing::error!(error = %e, key = %key, "failed to read product image");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "image_store_error", e.to_string())
        }
    }
}
