use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::DomainError;
use stockroom_infra::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Domain(DomainError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({
                "error": "validation_error",
                "message": errors.to_string(),
                "errors": errors,
            })),
        )
            .into_response(),
        CatalogError::Domain(DomainError::NotFound | DomainError::InvalidId(_)) => not_found(),
        CatalogError::Store(e) => {
            tracing::error!(error = %e, "product store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        CatalogError::Image(e) => {
            tracing::error!(error = %e, "image store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "image_store_error", e.to_string())
        }
    }
}

pub fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "Product not found.")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
