use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use classroom_groups::Rejection;
use classroom_infra::{AccessError, AllocationError};

pub fn access_error_to_response(err: AccessError) -> axum::response::Response {
    match err {
        AccessError::StudentNotFound(_) | AccessError::ProductNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        AccessError::Allocation(e) => allocation_error_to_response(e),
    }
}

pub fn allocation_error_to_response(err: AllocationError) -> axum::response::Response {
    match &err {
        AllocationError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        AllocationError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", err.to_string()),
        AllocationError::Storage(_) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", err.to_string())
        }
        AllocationError::Invariant(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "invariant_violation",
            err.to_string(),
        ),
    }
}

/// A full product is reported as "not found", matching the public contract.
pub fn rejection_to_response(reason: Rejection) -> axum::response::Response {
    match reason {
        Rejection::ProductFull => json_error(StatusCode::NOT_FOUND, "product_full", reason.to_string()),
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

pub fn invalid_id(what: &str) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id"))
}
