use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
    tasks::{
        dto::{
            partition, CreateTaskRequest, CreatedTaskResponse, DeleteTaskRequest,
            MutationResponse, TaskBoard, UpdateTaskRequest,
        },
        repo::{Task, TaskStatus},
    },
};

pub fn task_routes() -> Router<AppState> {
    Router::new().route(
        "/tasks",
        get(list_tasks)
            .post(create_task)
            .put(update_task)
            .delete(delete_task),
    )
}

fn parse_task_id(raw: Option<&str>) -> Result<Uuid, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::Validation("task id required".into()))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation("invalid task id".into()))
}

/// Zero rows out of an owner-scoped mutation: either the task is gone or it
/// belongs to someone else. One probe tells the two apart.
async fn diagnose_zero_rows(state: &AppState, task_id: Uuid) -> ApiError {
    match Task::exists(&state.db, task_id).await {
        Ok(true) => ApiError::Forbidden("unauthorized".into()),
        Ok(false) => ApiError::NotFound("task not found".into()),
        Err(e) => e.into(),
    }
}

#[instrument(skip(state, caller))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<TaskBoard>, ApiError> {
    let tasks = Task::list_by_user(&state.db, caller.id).await?;
    Ok(Json(partition(tasks)))
}

#[instrument(skip(state, caller, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<CreatedTaskResponse>, ApiError> {
    let title = payload.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        warn!("create task with empty title");
        return Err(ApiError::Validation("title is required".into()));
    }

    let task = Task::create(&state.db, caller.id, title).await?;
    info!(task_id = %task.id, user_id = %caller.id, "task created");
    Ok(Json(CreatedTaskResponse {
        success: true,
        task_id: task.id,
    }))
}

#[instrument(skip(state, caller, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let task_id = parse_task_id(payload.task_id.as_deref())?;

    let title = match payload.title.as_deref() {
        Some(t) => {
            let t = t.trim();
            if t.is_empty() {
                return Err(ApiError::Validation("title cannot be empty".into()));
            }
            Some(t.to_string())
        }
        None => None,
    };

    let status = match payload.status.as_deref() {
        Some(s) => Some(
            TaskStatus::parse(s).ok_or_else(|| ApiError::Validation("invalid status".into()))?,
        ),
        None => None,
    };

    let affected = Task::update(&state.db, task_id, caller.id, title.as_deref(), status).await?;
    if affected == 0 {
        return Err(diagnose_zero_rows(&state, task_id).await);
    }

    info!(%task_id, user_id = %caller.id, "task updated");
    Ok(Json(MutationResponse {
        success: true,
        affected,
    }))
}

#[instrument(skip(state, caller, payload))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<DeleteTaskRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let task_id = parse_task_id(payload.task_id.as_deref())?;

    let affected = Task::delete(&state.db, task_id, caller.id).await?;
    if affected == 0 {
        return Err(diagnose_zero_rows(&state, task_id).await);
    }

    info!(%task_id, user_id = %caller.id, "task deleted");
    Ok(Json(MutationResponse {
        success: true,
        affected,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_task_id_requires_a_value() {
        let err = parse_task_id(None).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_task_id_rejects_non_uuid() {
        let err = parse_task_id(Some("not-a-uuid")).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_task_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_task_id(Some(&id.to_string())).unwrap(), id);
    }
}
