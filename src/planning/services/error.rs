//! Service-level errors shared by the project and task services.

use crate::planning::{
    domain::{PlanningDomainError, ProjectId, TaskId},
    ports::PlanningRepositoryError,
};
use thiserror::Error;

/// Coarse classification of a service failure.
///
/// Transport layers map each kind to a single response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field is missing or a value is malformed.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The request collides with existing state.
    Conflict,
    /// The store failed or behaved unexpectedly.
    Internal,
}

/// Errors returned by planning services.
#[derive(Debug, Clone, Error)]
pub enum PlanningServiceError {
    /// Validation or a domain rule rejected the request.
    #[error(transparent)]
    Domain(#[from] PlanningDomainError),

    /// No project has the given identifier.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),

    /// No project has the given name.
    #[error("no project named '{0}'")]
    ProjectNameNotFound(String),

    /// No task has the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// Another project already uses the name.
    #[error("a project named '{0}' already exists")]
    DuplicateProjectName(String),

    /// Another task already uses the name.
    #[error("a task named '{0}' already exists")]
    DuplicateTaskName(String),

    /// No project has a task due today.
    #[error("no projects have tasks due today")]
    NoProjectsWithTasksDueToday,

    /// No task belongs to a project due today.
    #[error("no tasks belong to a project due today")]
    NoTasksWithProjectsDueToday,

    /// The project existed when checked but the delete removed nothing.
    #[error("project {0} disappeared before it could be deleted")]
    DeleteRaced(ProjectId),

    /// The store failed.
    #[error(transparent)]
    Repository(PlanningRepositoryError),
}

impl PlanningServiceError {
    /// Classifies the error for transport mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(
                PlanningDomainError::MissingFields(_)
                | PlanningDomainError::InvalidStatus(_)
                | PlanningDomainError::InvalidSortField { .. }
                | PlanningDomainError::InvalidDate(_),
            ) => ErrorKind::Validation,
            Self::Domain(PlanningDomainError::TaskAlreadyAssigned { .. })
            | Self::DuplicateProjectName(_)
            | Self::DuplicateTaskName(_) => ErrorKind::Conflict,
            Self::Domain(PlanningDomainError::TaskNotInProject { .. })
            | Self::ProjectNotFound(_)
            | Self::ProjectNameNotFound(_)
            | Self::TaskNotFound(_)
            | Self::NoProjectsWithTasksDueToday
            | Self::NoTasksWithProjectsDueToday => ErrorKind::NotFound,
            Self::DeleteRaced(_) | Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

impl From<PlanningRepositoryError> for PlanningServiceError {
    fn from(err: PlanningRepositoryError) -> Self {
        match err {
            PlanningRepositoryError::DuplicateProjectName(name) => Self::DuplicateProjectName(name),
            PlanningRepositoryError::DuplicateTaskName(name) => Self::DuplicateTaskName(name),
            PlanningRepositoryError::ProjectNotFound(project_id) => {
                Self::ProjectNotFound(project_id)
            }
            PlanningRepositoryError::Rejected(domain) => Self::Domain(domain),
            PlanningRepositoryError::Persistence(_) => Self::Repository(err),
        }
    }
}

/// Result type for planning service operations.
pub type PlanningServiceResult<T> = Result<T, PlanningServiceError>;
