//! Bodies and query strings accepted on the wire and their conversion to
//! service requests.
//!
//! Dates travel as strings and ids as UUID strings. Empty strings count as
//! absent so the services report them as missing fields.

use super::error::ApiError;
use crate::planning::{
    domain::{PlanningDomainError, ProjectId, TaskId, parse_date},
    services::{
        AssignTaskRequest, ChangeStatusRequest, CreateTaskRequest, MoveTaskRequest,
        ProjectRequest, UpdateTaskRequest,
    },
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProjectPayload {
    name: Option<String>,
    description: Option<String>,
    start_date: Option<String>,
    due_date: Option<String>,
}

impl ProjectPayload {
    pub(super) fn into_request(self) -> Result<ProjectRequest, ApiError> {
        Ok(ProjectRequest {
            name: self.name,
            description: self.description,
            start_date: optional_date(self.start_date)?,
            due_date: optional_date(self.due_date)?,
        })
    }
}

/// Task body for both creation and full updates.
///
/// `doneDate` is ignored on creation and `projectId` on update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TaskPayload {
    name: Option<String>,
    description: Option<String>,
    status: Option<String>,
    start_date: Option<String>,
    due_date: Option<String>,
    done_date: Option<String>,
    project_id: Option<String>,
}

impl TaskPayload {
    pub(super) fn into_create_request(self) -> Result<CreateTaskRequest, ApiError> {
        Ok(CreateTaskRequest {
            name: self.name,
            description: self.description,
            status: self.status,
            start_date: optional_date(self.start_date)?,
            due_date: optional_date(self.due_date)?,
            project_id: optional_project_id(self.project_id)?,
        })
    }

    pub(super) fn into_update_request(self) -> Result<UpdateTaskRequest, ApiError> {
        Ok(UpdateTaskRequest {
            name: self.name,
            description: self.description,
            status: self.status,
            start_date: optional_date(self.start_date)?,
            due_date: optional_date(self.due_date)?,
            done_date: optional_date(self.done_date)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AssignTaskPayload {
    task_id: Option<String>,
    project_id: Option<String>,
}

impl AssignTaskPayload {
    pub(super) fn into_request(self) -> Result<AssignTaskRequest, ApiError> {
        Ok(AssignTaskRequest {
            task_id: optional_task_id(self.task_id)?,
            project_id: optional_project_id(self.project_id)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MoveTaskPayload {
    task_id: Option<String>,
    from_project_id: Option<String>,
    to_project_id: Option<String>,
}

impl MoveTaskPayload {
    pub(super) fn into_request(self) -> Result<MoveTaskRequest, ApiError> {
        Ok(MoveTaskRequest {
            task_id: optional_task_id(self.task_id)?,
            from_project_id: optional_project_id(self.from_project_id)?,
            to_project_id: optional_project_id(self.to_project_id)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChangeStatusPayload {
    task_id: Option<String>,
    new_status: Option<String>,
}

impl ChangeStatusPayload {
    pub(super) fn into_request(self) -> Result<ChangeStatusRequest, ApiError> {
        Ok(ChangeStatusRequest {
            task_id: optional_task_id(self.task_id)?,
            status: self.new_status,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProjectNameQuery {
    pub(super) project_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SortQuery {
    pub(super) field: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct StatusQuery {
    pub(super) status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct NameQuery {
    pub(super) name: Option<String>,
}

pub(super) fn project_id(raw: &str) -> Result<ProjectId, ApiError> {
    raw.parse().map_err(|_| ApiError::MalformedId {
        entity: "project",
        raw: raw.to_owned(),
    })
}

pub(super) fn task_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse().map_err(|_| ApiError::MalformedId {
        entity: "task",
        raw: raw.to_owned(),
    })
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn optional_project_id(value: Option<String>) -> Result<Option<ProjectId>, ApiError> {
    present(value).map(|raw| project_id(&raw)).transpose()
}

fn optional_task_id(value: Option<String>) -> Result<Option<TaskId>, ApiError> {
    present(value).map(|raw| task_id(&raw)).transpose()
}

fn optional_date(value: Option<String>) -> Result<Option<DateTime<Utc>>, ApiError> {
    present(value)
        .map(|raw| parse_date(&raw))
        .transpose()
        .map_err(|err: PlanningDomainError| ApiError::Service(err.into()))
}
