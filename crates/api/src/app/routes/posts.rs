use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use postboard_content::PageRequest;
use postboard_core::{PostId, UserId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_post))
        .route("/:id", get(get_post))
        .route("/users/:id", get(list_user_posts))
}

pub async fn create_post(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreatePostRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match services.create_post(body.author, body.content).await {
        Ok(id) => (StatusCode::CREATED, Json(dto::created_to_json(id))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_post(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PostId = match errors::parse_path_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.get_post(id).await {
        Ok(post) => (StatusCode::OK, Json(dto::post_to_json(post))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `GET /api/posts/users/:id?limit=N&lowerid=C`
pub async fn list_user_posts(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<dto::PageQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    let user_id: UserId = match errors::parse_path_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let request = match PageRequest::from_query(query.limit.as_deref(), query.lowerid.as_deref()) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.list_user_posts(user_id, request).await {
        Ok(page) => (StatusCode::OK, Json(dto::page_to_json(page))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
