use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use postboard_core::DomainError;

/// Map a domain failure onto an HTTP response.
///
/// Client errors echo their message. Server errors are logged in full and
/// answered with a generic message.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound(resource) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{resource} not found"))
        }
        DomainError::InvalidArgument(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_argument", msg),
        DomainError::AuthenticationFailure => {
            tracing::error!("credential guard rejected a stored password");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "authentication_failure",
                "internal error",
            )
        }
        DomainError::StoreUnavailable(detail) => {
            tracing::error!(error = %detail, "document store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable", "internal error")
        }
    }
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

/// Answer a request whose body or query string failed to deserialize.
pub fn rejection_to_response(rejection: impl std::fmt::Display) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_argument", rejection.to_string())
}

/// Parse a path identifier, answering 400 when it is not 32 hex characters.
pub fn parse_path_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_argument",
            format!("invalid id {raw:?}: {e}"),
        )
    })
}
