use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Renders a use-case error as a JSON body. Internal error detail never
/// reaches the client on 5xx responses.
pub fn render<E: std::fmt::Display>(status: StatusCode, error: &E) -> Response {
    let message = if status.is_server_error() {
        "Internal server error".to_string()
    } else {
        error.to_string()
    };

    (
        status,
        Json(ErrorResponse {
            code: status.as_u16(),
            message,
        }),
    )
        .into_response()
}
