use axum::Router;

pub mod posts;
pub mod system;
pub mod users;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .nest("/users", users::router())
        .nest("/posts", posts::router())
}
