//! Task aggregate root, status machine, and project association rules.

use super::{ParseTaskStatusError, PlanningDomainError, ProjectId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not started.
    #[serde(rename = "to-do")]
    ToDo,
    /// Work is underway.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Work is complete.
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// Returns the canonical wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to-do",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "to-do" => Ok(Self::ToDo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task date fields that may be used for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskDateField {
    /// Sort by `startDate`.
    StartDate,
    /// Sort by `dueDate`.
    DueDate,
    /// Sort by `doneDate`.
    DoneDate,
}

impl TaskDateField {
    const ALLOWED: &'static str = "startDate, dueDate, doneDate";

    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartDate => "startDate",
            Self::DueDate => "dueDate",
            Self::DoneDate => "doneDate",
        }
    }
}

impl TryFrom<&str> for TaskDateField {
    type Error = PlanningDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "startDate" => Ok(Self::StartDate),
            "dueDate" => Ok(Self::DueDate),
            "doneDate" => Ok(Self::DoneDate),
            _ => Err(PlanningDomainError::InvalidSortField {
                field: value.to_owned(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Unique task name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Initial status.
    pub status: TaskStatus,
    /// Requested start date; replaced by the creation time for `done` tasks.
    pub start_date: DateTime<Utc>,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Owning project, if any.
    pub project_id: Option<ProjectId>,
}

/// Validated payload for a full task update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Replacement name.
    pub name: String,
    /// Replacement description.
    pub description: String,
    /// Replacement status.
    pub status: TaskStatus,
    /// Replacement start date.
    pub start_date: DateTime<Utc>,
    /// Replacement due date.
    pub due_date: DateTime<Utc>,
    /// Replacement completion date, honoured only for `done` tasks.
    pub done_date: Option<DateTime<Utc>>,
}

/// A mutation applied to a stored task as one read-modify-write step.
///
/// Repositories load the task, call [`Task::apply`], and persist the result
/// without letting another writer interleave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    /// Replace the editable fields wholesale.
    Replace {
        /// New field values.
        update: TaskUpdate,
        /// Time of the update.
        at: DateTime<Utc>,
    },
    /// Associate an unassigned task with a project.
    AssignProject(ProjectId),
    /// Reassign a task from one project to another.
    MoveProject {
        /// Project the task must currently belong to.
        from: ProjectId,
        /// Destination project.
        to: ProjectId,
    },
    /// Move the task through the status machine.
    ChangeStatus {
        /// Target status.
        status: TaskStatus,
        /// Time of the transition.
        at: DateTime<Utc>,
    },
}

impl TaskChange {
    /// Returns the project the change would point the task at, if any.
    #[must_use]
    pub const fn target_project(&self) -> Option<ProjectId> {
        match self {
            Self::AssignProject(project_id) => Some(*project_id),
            Self::MoveProject { to, .. } => Some(*to),
            Self::Replace { .. } | Self::ChangeStatus { .. } => None,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    name: String,
    description: String,
    status: TaskStatus,
    created_date: DateTime<Utc>,
    start_date: Option<DateTime<Utc>>,
    due_date: DateTime<Utc>,
    done_date: Option<DateTime<Utc>>,
    project_id: Option<ProjectId>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Persisted start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Persisted due date.
    pub due_date: DateTime<Utc>,
    /// Persisted completion date.
    pub done_date: Option<DateTime<Utc>>,
    /// Persisted project association.
    pub project_id: Option<ProjectId>,
}

impl Task {
    /// Creates a new task.
    ///
    /// A task created as `done` is stamped with the creation time for both
    /// its start and completion dates, whatever the caller supplied.
    #[must_use]
    pub fn new(new_task: NewTask, clock: &impl Clock) -> Self {
        let now = clock.utc();
        let (start_date, done_date) = match new_task.status {
            TaskStatus::Done => (Some(now), Some(now)),
            TaskStatus::ToDo | TaskStatus::InProgress => (Some(new_task.start_date), None),
        };

        Self {
            id: TaskId::new(),
            name: new_task.name,
            description: new_task.description,
            status: new_task.status,
            created_date: now,
            start_date,
            due_date: new_task.due_date,
            done_date,
            project_id: new_task.project_id,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            status: data.status,
            created_date: data.created_date,
            start_date: data.start_date,
            due_date: data.due_date,
            done_date: data.done_date,
            project_id: data.project_id,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    /// Returns the start date, if work has started.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the completion date, if the task is done.
    #[must_use]
    pub const fn done_date(&self) -> Option<DateTime<Utc>> {
        self.done_date
    }

    /// Returns the owning project, if any.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the value of a sortable date field.
    #[must_use]
    pub const fn date_field(&self, field: TaskDateField) -> Option<DateTime<Utc>> {
        match field {
            TaskDateField::StartDate => self.start_date,
            TaskDateField::DueDate => Some(self.due_date),
            TaskDateField::DoneDate => self.done_date,
        }
    }

    /// Applies a [`TaskChange`].
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::TaskAlreadyAssigned`] or
    /// [`PlanningDomainError::TaskNotInProject`] when an association rule
    /// rejects the change. The task is left untouched on error.
    pub fn apply(&mut self, change: TaskChange) -> Result<(), PlanningDomainError> {
        match change {
            TaskChange::Replace { update, at } => {
                self.replace(update, at);
                Ok(())
            }
            TaskChange::AssignProject(project_id) => self.assign_to_project(project_id),
            TaskChange::MoveProject { from, to } => self.move_between_projects(from, to),
            TaskChange::ChangeStatus { status, at } => {
                self.change_status(status, at);
                Ok(())
            }
        }
    }

    /// Moves the task to `status`, adjusting its dates.
    ///
    /// - `to-do` clears both the start and completion dates.
    /// - `in-progress` clears the completion date and starts the task if it
    ///   has not started yet.
    /// - `done` stamps the completion date and starts the task if it has not
    ///   started yet.
    ///
    /// The effects apply whatever the previous status was.
    pub fn change_status(&mut self, status: TaskStatus, at: DateTime<Utc>) {
        match status {
            TaskStatus::ToDo => {
                self.start_date = None;
                self.done_date = None;
            }
            TaskStatus::InProgress => {
                self.start_if_unset(at);
                self.done_date = None;
            }
            TaskStatus::Done => {
                self.start_if_unset(at);
                self.done_date = Some(at);
            }
        }
        self.status = status;
    }

    /// Replaces the editable fields wholesale.
    ///
    /// The completion date follows the new status: a `done` task keeps the
    /// supplied date, else its previous one, else `at`; any other status
    /// clears it.
    pub fn replace(&mut self, update: TaskUpdate, at: DateTime<Utc>) {
        self.done_date = match update.status {
            TaskStatus::Done => update.done_date.or(self.done_date).or(Some(at)),
            TaskStatus::ToDo | TaskStatus::InProgress => None,
        };
        self.name = update.name;
        self.description = update.description;
        self.status = update.status;
        self.start_date = Some(update.start_date);
        self.due_date = update.due_date;
    }

    /// Associates the task with a project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::TaskAlreadyAssigned`] if the task
    /// already belongs to a project, including `project_id` itself.
    pub fn assign_to_project(&mut self, project_id: ProjectId) -> Result<(), PlanningDomainError> {
        if let Some(current) = self.project_id {
            return Err(PlanningDomainError::TaskAlreadyAssigned {
                task_id: self.id,
                project_id: current,
            });
        }
        self.project_id = Some(project_id);
        Ok(())
    }

    /// Reassigns the task from `from` to `to`.
    ///
    /// Moving a task to the project it is already in is permitted.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::TaskNotInProject`] when the task does
    /// not currently belong to `from`.
    pub fn move_between_projects(
        &mut self,
        from: ProjectId,
        to: ProjectId,
    ) -> Result<(), PlanningDomainError> {
        if self.project_id != Some(from) {
            return Err(PlanningDomainError::TaskNotInProject {
                task_id: self.id,
                project_id: from,
            });
        }
        self.project_id = Some(to);
        Ok(())
    }

    /// Clears the project association.
    pub const fn unassign_project(&mut self) {
        self.project_id = None;
    }

    const fn start_if_unset(&mut self, at: DateTime<Utc>) {
        if self.start_date.is_none() {
            self.start_date = Some(at);
        }
    }
}
