use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domain::{Todo, TodoId, TodoInput};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// サービスの簡易ステータス
    status: &'static str,
}

/// ヘルスチェック用ハンドラ
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// POST /todos
/// - ID はデータ層で採番（クライアントからは受け取らない）
/// - タイトルの検証はストレージ呼び出し前に行う
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(input) = payload?;
    let valid = input.validate()?;

    let todo = state.repo.insert(valid).await?;
    tracing::info!(todo_id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /todos（新しい順）
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.repo.list_all().await?;
    Ok(Json(todos))
}

/// PUT /todos/:id
pub async fn update_todo(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::parse(&id)?;
    let Json(input) = payload?;
    let valid = input.validate()?;

    let todo = state.repo.update_by_id(&id, valid).await?;
    tracing::info!(todo_id = %todo.id, "todo updated");
    Ok(Json(todo))
}

/// DELETE /todos/:id
pub async fn delete_todo(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let id = TodoId::parse(&id)?;

    state.repo.delete_by_id(&id).await?;
    tracing::info!(todo_id = %id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
