//! Error types for planning domain validation and rule enforcement.

use super::{ProjectId, TaskId};
use thiserror::Error;

/// Errors returned while validating input or applying domain rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanningDomainError {
    /// One or more mandatory fields were absent or empty.
    #[error("the fields {} are required", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The status value is not one of `to-do`, `in-progress`, or `done`.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The requested sort field is not sortable for the entity.
    #[error("invalid field for sorting: '{field}', expected one of {allowed}")]
    InvalidSortField {
        /// The rejected field name.
        field: String,
        /// Comma-separated list of accepted field names.
        allowed: &'static str,
    },

    /// A date value could not be parsed.
    #[error("invalid date '{0}', expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),

    /// The task already belongs to a project.
    #[error("task {task_id} is already assigned to project {project_id}")]
    TaskAlreadyAssigned {
        /// The task being assigned.
        task_id: TaskId,
        /// The project the task currently belongs to.
        project_id: ProjectId,
    },

    /// The task is not associated with the expected source project.
    #[error("task {task_id} is not in project {project_id}")]
    TaskNotInProject {
        /// The task being moved.
        task_id: TaskId,
        /// The expected source project.
        project_id: ProjectId,
    },
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid status value '{0}', expected to-do, in-progress, or done")]
pub struct ParseTaskStatusError(pub String);
