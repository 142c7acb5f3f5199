use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::{DomainError, Violations};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let code = err.code();
    match err {
        DomainError::Validation(violations) => validation_error(violations),
        DomainError::InvalidArgument(msg) => json_error(StatusCode::BAD_REQUEST, code, msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, code, msg),
        DomainError::Unexpected(msg) => {
            tracing::error!(error = %msg, "unexpected failure while handling request");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, code, format!("Error: {msg}"))
        }
    }
}

/// Body could not be parsed into the expected JSON shape.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        format!("invalid request body: {}", rejection.body_text()),
    )
}

pub fn validation_error(violations: Violations) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_error",
            "message": format!("validation failed: {violations}"),
            "violations": violations,
        })),
    )
        .into_response()
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
