use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use classroom_core::{ProductId, StudentId};
use classroom_infra::{AccessDecision, AccessGrant, upcoming_products};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:id/access", post(grant_access))
        .route("/:id/groups", get(list_groups))
}

/// Products that have not started yet.
pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(upcoming_products(services.catalog(), Utc::now()))
}

pub async fn grant_access(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AccessRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("product"),
    };
    let student_id: StudentId = match body.student_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("student"),
    };

    let grant = AccessGrant {
        product_id,
        student_id,
        granted: body.access,
    };

    match services.gateway().grant(grant) {
        Ok(AccessDecision::Granted(outcome)) => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(AccessDecision::Ignored) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ignored" })),
        )
            .into_response(),
        Ok(AccessDecision::Denied(reason)) => errors::rejection_to_response(reason),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn list_groups(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id("product"),
    };

    match services.engine().groups(product_id) {
        Ok(groups) => Json(
            groups
                .iter()
                .map(dto::group_to_json)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::allocation_error_to_response(e),
    }
}
