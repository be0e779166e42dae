use axum::extract::rejection::JsonRejection;
use axum::{extract::{Path, State}, http::StatusCode, Json};
use models::{User, UserInput};
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// 列出所有用户
pub async fn list_users(State(state): State<ServerState>) -> Json<Vec<User>> {
    let store = state.users.clone();
    Json(store.list().await)
}

/// 创建用户：id 由存储分配，客户端提供的 id 被忽略
pub async fn create_user(
    State(state): State<ServerState>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let Json(input) = payload.map_err(bad_payload)?;
    let store = state.users.clone();
    store.create(input).await
        .map(|user| (StatusCode::CREATED, Json(user)))
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string())))
}

/// 获取指定用户
pub async fn get_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let store = state.users.clone();
    match store.get(&id).await {
        Some(user) => Ok(Json(user)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// 更新指定用户
pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<User>, JsonApiError> {
    let Json(input) = payload.map_err(bad_payload)?;
    let store = state.users.clone();
    store.update(&id, input).await
        .map(Json)
        .map_err(|e| match e {
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            _ => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string())),
        })
}

/// 删除指定用户
pub async fn delete_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> StatusCode {
    let store = state.users.clone();
    match store.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Malformed create/update payloads map to 400 rather than axum's default
/// rejection status.
fn bad_payload(rejection: JsonRejection) -> JsonApiError {
    JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Input", Some(rejection.body_text()))
}
