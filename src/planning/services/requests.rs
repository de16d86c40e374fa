//! Request payloads accepted by the planning services.
//!
//! Fields are optional so missing input can be reported together as one
//! validation error.

use crate::planning::domain::{
    NewTask, PlanningDomainError, ProjectFields, ProjectId, TaskId, TaskStatus, TaskUpdate,
};
use chrono::{DateTime, Utc};

/// Fields for creating or fully updating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRequest {
    /// Unique project name. Required.
    pub name: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

impl ProjectRequest {
    /// Creates a request with only a name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub(super) fn into_fields(self) -> Result<ProjectFields, PlanningDomainError> {
        let Some(name) = self.name.filter(|value| !value.trim().is_empty()) else {
            return Err(PlanningDomainError::MissingFields(vec!["name"]));
        };
        Ok(ProjectFields {
            name,
            description: self.description,
            start_date: self.start_date,
            due_date: self.due_date,
        })
    }
}

/// Fields for creating a task.
///
/// A client-supplied completion date is not accepted: a task created as
/// `done` is stamped with the creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskRequest {
    /// Unique task name. Required.
    pub name: Option<String>,
    /// Description. Required.
    pub description: Option<String>,
    /// One of `to-do`, `in-progress`, or `done`. Required.
    pub status: Option<String>,
    /// Start date. Required.
    pub start_date: Option<DateTime<Utc>>,
    /// Due date. Required.
    pub due_date: Option<DateTime<Utc>>,
    /// Project to associate the task with.
    pub project_id: Option<ProjectId>,
}

impl CreateTaskRequest {
    /// Creates a request with every required field set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        start_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            status: Some(status.into()),
            start_date: Some(start_date),
            due_date: Some(due_date),
            project_id: None,
        }
    }

    /// Associates the new task with a project.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub(super) fn into_new_task(self) -> Result<NewTask, PlanningDomainError> {
        let required = RequiredTaskFields::validate(
            self.name,
            self.description,
            self.status.as_deref(),
            self.start_date,
            self.due_date,
        )?;
        Ok(NewTask {
            name: required.name,
            description: required.description,
            status: required.status,
            start_date: required.start_date,
            due_date: required.due_date,
            project_id: self.project_id,
        })
    }
}

/// Fields for a full task update.
///
/// The project association is not part of an update; use assignment or
/// moves instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    /// Replacement name. Required.
    pub name: Option<String>,
    /// Replacement description. Required.
    pub description: Option<String>,
    /// Replacement status. Required.
    pub status: Option<String>,
    /// Replacement start date. Required.
    pub start_date: Option<DateTime<Utc>>,
    /// Replacement due date. Required.
    pub due_date: Option<DateTime<Utc>>,
    /// Completion date, kept only when the status is `done`.
    pub done_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    /// Creates a request with every required field set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        start_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            status: Some(status.into()),
            start_date: Some(start_date),
            due_date: Some(due_date),
            done_date: None,
        }
    }

    /// Sets the completion date.
    #[must_use]
    pub const fn with_done_date(mut self, done_date: DateTime<Utc>) -> Self {
        self.done_date = Some(done_date);
        self
    }

    pub(super) fn into_update(self) -> Result<TaskUpdate, PlanningDomainError> {
        let required = RequiredTaskFields::validate(
            self.name,
            self.description,
            self.status.as_deref(),
            self.start_date,
            self.due_date,
        )?;
        Ok(TaskUpdate {
            name: required.name,
            description: required.description,
            status: required.status,
            start_date: required.start_date,
            due_date: required.due_date,
            done_date: self.done_date,
        })
    }
}

/// Request to attach an unassigned task to a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignTaskRequest {
    /// Task to assign. Required.
    pub task_id: Option<TaskId>,
    /// Destination project. Required.
    pub project_id: Option<ProjectId>,
}

impl AssignTaskRequest {
    /// Creates a complete request.
    #[must_use]
    pub const fn new(task_id: TaskId, project_id: ProjectId) -> Self {
        Self {
            task_id: Some(task_id),
            project_id: Some(project_id),
        }
    }

    pub(super) fn validate(self) -> Result<(TaskId, ProjectId), PlanningDomainError> {
        match (self.task_id, self.project_id) {
            (Some(task_id), Some(project_id)) => Ok((task_id, project_id)),
            (task_id, project_id) => Err(missing([
                ("taskId", task_id.is_none()),
                ("projectId", project_id.is_none()),
            ])),
        }
    }
}

/// Request to move a task between projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveTaskRequest {
    /// Task to move. Required.
    pub task_id: Option<TaskId>,
    /// Project the task must currently belong to. Required.
    pub from_project_id: Option<ProjectId>,
    /// Destination project. Required.
    pub to_project_id: Option<ProjectId>,
}

impl MoveTaskRequest {
    /// Creates a complete request.
    #[must_use]
    pub const fn new(task_id: TaskId, from: ProjectId, to: ProjectId) -> Self {
        Self {
            task_id: Some(task_id),
            from_project_id: Some(from),
            to_project_id: Some(to),
        }
    }

    pub(super) fn validate(self) -> Result<(TaskId, ProjectId, ProjectId), PlanningDomainError> {
        match (self.task_id, self.from_project_id, self.to_project_id) {
            (Some(task_id), Some(from), Some(to)) => Ok((task_id, from, to)),
            (task_id, from, to) => Err(missing([
                ("taskId", task_id.is_none()),
                ("fromProjectId", from.is_none()),
                ("toProjectId", to.is_none()),
            ])),
        }
    }
}

/// Request to move a task through the status machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeStatusRequest {
    /// Task to update. Required.
    pub task_id: Option<TaskId>,
    /// Target status. Required.
    pub status: Option<String>,
}

impl ChangeStatusRequest {
    /// Creates a complete request.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            task_id: Some(task_id),
            status: Some(status.into()),
        }
    }

    pub(super) fn validate(self) -> Result<(TaskId, TaskStatus), PlanningDomainError> {
        let status = self.status.filter(|value| !value.trim().is_empty());
        match (self.task_id, status) {
            (Some(task_id), Some(raw)) => Ok((task_id, TaskStatus::try_from(raw.as_str())?)),
            (task_id, raw) => Err(missing([
                ("taskId", task_id.is_none()),
                ("newStatus", raw.is_none()),
            ])),
        }
    }
}

struct RequiredTaskFields {
    name: String,
    description: String,
    status: TaskStatus,
    start_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
}

impl RequiredTaskFields {
    fn validate(
        name: Option<String>,
        description: Option<String>,
        status: Option<&str>,
        start_date: Option<DateTime<Utc>>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Self, PlanningDomainError> {
        let present_name = name.filter(|value| !value.trim().is_empty());
        let present_description = description.filter(|value| !value.trim().is_empty());
        let present_status = status.filter(|value| !value.trim().is_empty());

        match (
            present_name,
            present_description,
            present_status,
            start_date,
            due_date,
        ) {
            (Some(task_name), Some(task_description), Some(raw_status), Some(start), Some(due)) => {
                Ok(Self {
                    name: task_name,
                    description: task_description,
                    status: TaskStatus::try_from(raw_status)?,
                    start_date: start,
                    due_date: due,
                })
            }
            (task_name, task_description, raw_status, start, due) => Err(missing([
                ("status", raw_status.is_none()),
                ("name", task_name.is_none()),
                ("description", task_description.is_none()),
                ("startDate", start.is_none()),
                ("dueDate", due.is_none()),
            ])),
        }
    }
}

fn missing<const N: usize>(fields: [(&'static str, bool); N]) -> PlanningDomainError {
    PlanningDomainError::MissingFields(
        fields
            .into_iter()
            .filter_map(|(field, absent)| absent.then_some(field))
            .collect(),
    )
}
