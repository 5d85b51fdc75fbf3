//! HTTP Transport
//!
//! JSON routes over [`UserGateway`]. Response bodies are always the envelope;
//! the status code is derived from its error kind.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::envelope::{ApiResponse, ErrorKind};
use crate::gateway::UserGateway;
use crate::users::{UserCreateInput, UserUpdateInput};

/// Build the router. Paths:
///
/// ```text
/// GET    /api/users
/// POST   /api/users
/// GET    /api/users/:id
/// PUT    /api/users/:id
/// PATCH  /api/users/:id
/// DELETE /api/users/:id
/// POST   /api/reset
/// ```
pub fn router(gateway: UserGateway) -> Router {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/api/reset", post(reset_all))
        .with_state(gateway)
}

async fn list_users(State(gateway): State<UserGateway>) -> Response {
    reply(gateway.list_users().await, StatusCode::OK)
}

async fn get_user(State(gateway): State<UserGateway>, Path(id): Path<String>) -> Response {
    reply(gateway.get_user(&id).await, StatusCode::OK)
}

async fn create_user(
    State(gateway): State<UserGateway>,
    body: Result<Json<UserCreateInput>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(input)) => reply(gateway.create_user(input).await, StatusCode::CREATED),
        Err(rejection) => bad_body(&rejection),
    }
}

async fn update_user(
    State(gateway): State<UserGateway>,
    Path(id): Path<String>,
    body: Result<Json<UserUpdateInput>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(input)) => reply(gateway.update_user(&id, input).await, StatusCode::OK),
        Err(rejection) => bad_body(&rejection),
    }
}

async fn delete_user(State(gateway): State<UserGateway>, Path(id): Path<String>) -> Response {
    reply(gateway.delete_user(&id).await, StatusCode::OK)
}

async fn reset_all(State(gateway): State<UserGateway>) -> Response {
    reply(gateway.reset_all().await, StatusCode::OK)
}

fn reply<T: Serialize>(response: ApiResponse<T>, success: StatusCode) -> Response {
    let status = match response.kind {
        None => success,
        Some(ErrorKind::Validation) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
        Some(ErrorKind::DuplicateEmail) => StatusCode::CONFLICT,
        Some(ErrorKind::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(response)).into_response()
}

fn bad_body(rejection: &JsonRejection) -> Response {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    let body = serde_json::json!({
        "success": false,
        "error": rejection.body_text(),
    });
    (rejection.status(), Json(body)).into_response()
}
