use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use stockroom_core::ProductId;
use stockroom_products::RawListParams;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub const CREATED_MESSAGE: &str = "Product created successfully!";
pub const UPDATED_MESSAGE: &str = "Product updated successfully!";
pub const DELETED_MESSAGE: &str = "Product deleted successfully!";

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/create", get(create_form))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/edit", get(edit_form))
}

/// Non-positive or non-numeric ids name no product.
fn parse_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse().map_err(|_| errors::not_found())
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> axum::response::Response {
    errors::json_error(e.status(), "invalid_multipart", e.body_text())
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let raw: RawListParams = pairs.into_iter().collect();
    match services.catalog.build_view(&raw).await {
        Ok(view) => Json(dto::view_to_json(&view, &services.public_storage_prefix)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_form() -> impl IntoResponse {
    Json(dto::form_metadata_json())
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    multipart: Multipart,
) -> axum::response::Response {
    let form = match dto::read_product_form(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_error(e),
    };

    match services.catalog.create(form).await {
        Ok(product) => {
            tracing::info!(
                user_id = %session.user_id(),
                email = session.email().unwrap_or_default(),
                product_id = %product.id,
                "create accepted"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": CREATED_MESSAGE,
                    "product": dto::product_to_json(&product, &services.public_storage_prefix),
                })),
            )
                .into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.catalog.get(id).await {
        Ok(product) => {
            Json(dto::product_to_json(&product, &services.public_storage_prefix)).into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn edit_form(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.catalog.get(id).await {
        Ok(product) => Json(json!({
            "product": dto::product_to_json(&product, &services.public_storage_prefix),
            "form": dto::form_metadata_json(),
        }))
        .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let form = match dto::read_product_form(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_error(e),
    };

    match services.catalog.update(id, form).await {
        Ok(product) => {
            tracing::info!(
                user_id = %session.user_id(),
                email = session.email().unwrap_or_default(),
                product_id = %product.id,
                "update accepted"
            );
            Json(json!({
                "message": UPDATED_MESSAGE,
                "product": dto::product_to_json(&product, &services.public_storage_prefix),
            }))
            .into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.catalog.delete(id).await {
        Ok(removed) => {
            tracing::info!(
                user_id = %session.user_id(),
                email = session.email().unwrap_or_default(),
                product_id = %removed.id,
                "delete accepted"
            );
            Json(json!({
                "message": DELETED_MESSAGE,
                "id": removed.id,
            }))
            .into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}
