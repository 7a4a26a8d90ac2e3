use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use postboard_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", get(get_user))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match services.create_user(body.name, body.email, &body.password).await {
        Ok(id) => (StatusCode::CREATED, Json(dto::created_to_json(id))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UserId = match errors::parse_path_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.get_user(id).await {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(user))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
