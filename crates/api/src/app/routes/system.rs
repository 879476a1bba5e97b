use axum::{http::StatusCode, response::Redirect};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn home() -> Redirect {
    Redirect::to("/dashboard")
}
