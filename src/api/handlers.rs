//! Route handlers for `/projects` and `/tasks`.

use super::{
    error::ApiError,
    extract::{JsonBody, QueryParams},
    payloads::{
        AssignTaskPayload, ChangeStatusPayload, MoveTaskPayload, NameQuery, ProjectNameQuery,
        ProjectPayload, SortQuery, StatusQuery, TaskPayload, project_id, task_id,
    },
    state::ApiState,
};
use crate::planning::{
    domain::{Project, ProjectWithTasks, Task, TaskWithProject},
    ports::PlanningStore,
};
use axum::{
    Json,
    extract::{Path, Request, State},
    http::StatusCode,
};
use mockable::Clock;
use serde_json::{Value, json};

type ApiResult<T> = Result<T, ApiError>;

// Projects

pub(super) async fn create_project<S, C>(
    State(state): State<ApiState<S, C>>,
    JsonBody(payload): JsonBody<ProjectPayload>,
) -> ApiResult<(StatusCode, Json<Value>)>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let project = state.projects.create(payload.into_request()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Project created successfully", "projectId": project.id() })),
    ))
}

pub(super) async fn list_projects<S, C>(
    State(state): State<ApiState<S, C>>,
) -> ApiResult<Json<Vec<Project>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    Ok(Json(state.projects.list().await?))
}

pub(super) async fn update_project<S, C>(
    State(state): State<ApiState<S, C>>,
    Path(raw_id): Path<String>,
    JsonBody(payload): JsonBody<ProjectPayload>,
) -> ApiResult<Json<Value>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let id = project_id(&raw_id)?;
    state.projects.update(id, payload.into_request()?).await?;
    Ok(message("Project updated"))
}

pub(super) async fn delete_project<S, C>(
    State(state): State<ApiState<S, C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Value>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let id = project_id(&raw_id)?;
    let unassigned = state.projects.delete(id).await?;
    Ok(Json(json!({
        "message": "Project deleted and associated tasks unassigned",
        "unassignedTasks": unassigned,
    })))
}

pub(super) async fn assign_task<S, C>(
    State(state): State<ApiState<S, C>>,
    JsonBody(payload): JsonBody<AssignTaskPayload>,
) -> ApiResult<Json<Value>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    state.projects.assign_task(payload.into_request()?).await?;
    Ok(message("Task assigned to project"))
}

pub(super) async fn move_task<S, C>(
    State(state): State<ApiState<S, C>>,
    JsonBody(payload): JsonBody<MoveTaskPayload>,
) -> ApiResult<Json<Value>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    state.projects.move_task(payload.into_request()?).await?;
    Ok(message("Task successfully moved to the target project"))
}

pub(super) async fn project_tasks<S, C>(
    State(state): State<ApiState<S, C>>,
    QueryParams(query): QueryParams<ProjectNameQuery>,
) -> ApiResult<Json<Vec<Task>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let name = query.project_name.unwrap_or_default();
    Ok(Json(state.projects.tasks_by_project_name(&name).await?))
}

pub(super) async fn sort_projects<S, C>(
    State(state): State<ApiState<S, C>>,
    QueryParams(query): QueryParams<SortQuery>,
) -> ApiResult<Json<Vec<Project>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let field = query.field.unwrap_or_default();
    Ok(Json(state.projects.sort_by_date(&field).await?))
}

pub(super) async fn projects_due_today<S, C>(
    State(state): State<ApiState<S, C>>,
) -> ApiResult<Json<Vec<ProjectWithTasks>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    Ok(Json(state.projects.projects_with_tasks_due_today().await?))
}

// Tasks

pub(super) async fn create_task<S, C>(
    State(state): State<ApiState<S, C>>,
    JsonBody(payload): JsonBody<TaskPayload>,
) -> ApiResult<(StatusCode, Json<Value>)>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let task = state.tasks.create(payload.into_create_request()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Task created successfully", "taskId": task.id() })),
    ))
}

pub(super) async fn list_tasks<S, C>(
    State(state): State<ApiState<S, C>>,
) -> ApiResult<Json<Vec<Task>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    Ok(Json(state.tasks.list().await?))
}

pub(super) async fn update_task<S, C>(
    State(state): State<ApiState<S, C>>,
    Path(raw_id): Path<String>,
    JsonBody(payload): JsonBody<TaskPayload>,
) -> ApiResult<Json<Value>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let id = task_id(&raw_id)?;
    state.tasks.update(id, payload.into_update_request()?).await?;
    Ok(message("Task updated"))
}

pub(super) async fn delete_task<S, C>(
    State(state): State<ApiState<S, C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Value>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let id = task_id(&raw_id)?;
    state.tasks.delete(id).await?;
    Ok(message("Task deleted"))
}

pub(super) async fn filter_tasks<S, C>(
    State(state): State<ApiState<S, C>>,
    QueryParams(query): QueryParams<StatusQuery>,
) -> ApiResult<Json<Vec<Task>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    Ok(Json(
        state.tasks.filter_by_status(query.status.as_deref()).await?,
    ))
}

pub(super) async fn search_tasks<S, C>(
    State(state): State<ApiState<S, C>>,
    QueryParams(query): QueryParams<NameQuery>,
) -> ApiResult<Json<Vec<Task>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let fragment = query.name.unwrap_or_default();
    Ok(Json(state.tasks.search_by_name(&fragment).await?))
}

pub(super) async fn sort_tasks<S, C>(
    State(state): State<ApiState<S, C>>,
    QueryParams(query): QueryParams<SortQuery>,
) -> ApiResult<Json<Vec<Task>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let field = query.field.unwrap_or_default();
    Ok(Json(state.tasks.sort_by_date(&field).await?))
}

pub(super) async fn tasks_due_today<S, C>(
    State(state): State<ApiState<S, C>>,
) -> ApiResult<Json<Vec<TaskWithProject>>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    Ok(Json(state.tasks.tasks_with_project_due_today().await?))
}

pub(super) async fn change_status<S, C>(
    State(state): State<ApiState<S, C>>,
    JsonBody(payload): JsonBody<ChangeStatusPayload>,
) -> ApiResult<Json<Value>>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    let task = state.tasks.change_status(payload.into_request()?).await?;
    Ok(Json(json!({
        "message": format!("Task status updated to {}", task.status()),
        "taskId": task.id(),
    })))
}

pub(super) async fn no_route(request: Request) -> ApiError {
    let (parts, _body) = request.into_parts();
    ApiError::NoRoute {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
    }
}

fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}
