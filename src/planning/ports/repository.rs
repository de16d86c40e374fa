//! Repository ports for project and task persistence.
//!
//! Both collections live behind one store. Operations that touch a task
//! after reading it, or that span both collections, are single port calls so
//! adapters can run them atomically.

use crate::planning::domain::{
    DayWindow, PlanningDomainError, Project, ProjectDateField, ProjectId, ProjectWithTasks, Task,
    TaskChange, TaskDateField, TaskId, TaskStatus, TaskWithProject,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for planning repository operations.
pub type PlanningRepositoryResult<T> = Result<T, PlanningRepositoryError>;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::DuplicateProjectName`] when another
    /// project already uses the name.
    async fn store_project(&self, project: &Project) -> PlanningRepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::ProjectNotFound`] when the project
    /// does not exist or [`PlanningRepositoryError::DuplicateProjectName`]
    /// when the new name is taken.
    async fn update_project(&self, project: &Project) -> PlanningRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_project(&self, id: ProjectId) -> PlanningRepositoryResult<Option<Project>>;

    /// Finds a project by exact name.
    async fn find_project_by_name(&self, name: &str) -> PlanningRepositoryResult<Option<Project>>;

    /// Returns every project in store order.
    async fn list_projects(&self) -> PlanningRepositoryResult<Vec<Project>>;

    /// Returns every project ordered ascending by `field`, unset dates first.
    async fn list_projects_sorted(
        &self,
        field: ProjectDateField,
    ) -> PlanningRepositoryResult<Vec<Project>>;

    /// Deletes a project and clears the project reference of every task that
    /// pointed at it, as one atomic unit.
    ///
    /// Returns the number of tasks unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::ProjectNotFound`] when nothing was
    /// deleted. No task is modified in that case.
    async fn delete_project_cascading(&self, id: ProjectId) -> PlanningRepositoryResult<usize>;

    /// Returns projects with at least one task due inside `window`, each with
    /// all of its tasks.
    async fn projects_with_tasks_due(
        &self,
        window: DayWindow,
    ) -> PlanningRepositoryResult<Vec<ProjectWithTasks>>;
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::DuplicateTaskName`] when another
    /// task already uses the name, or
    /// [`PlanningRepositoryError::ProjectNotFound`] when the referenced
    /// project does not exist.
    async fn store_task(&self, task: &Task) -> PlanningRepositoryResult<()>;

    /// Loads a task, applies `change`, and persists the result without any
    /// other writer interleaving.
    ///
    /// Returns `None` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::Rejected`] when the domain refuses
    /// the change, [`PlanningRepositoryError::DuplicateTaskName`] when a
    /// rename collides, or [`PlanningRepositoryError::ProjectNotFound`] when a
    /// target project does not exist.
    async fn apply_task_change(
        &self,
        id: TaskId,
        change: TaskChange,
    ) -> PlanningRepositoryResult<Option<Task>>;

    /// Deletes a task. Returns `false` when no task matched.
    async fn delete_task(&self, id: TaskId) -> PlanningRepositoryResult<bool>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> PlanningRepositoryResult<Option<Task>>;

    /// Returns every task in store order.
    async fn list_tasks(&self) -> PlanningRepositoryResult<Vec<Task>>;

    /// Returns tasks with the given status.
    async fn find_tasks_by_status(&self, status: TaskStatus)
    -> PlanningRepositoryResult<Vec<Task>>;

    /// Returns tasks whose name contains `fragment`, ignoring case.
    async fn search_tasks_by_name(&self, fragment: &str) -> PlanningRepositoryResult<Vec<Task>>;

    /// Returns every task ordered ascending by `field`, unset dates first.
    async fn list_tasks_sorted(&self, field: TaskDateField) -> PlanningRepositoryResult<Vec<Task>>;

    /// Returns tasks that belong to the project.
    async fn find_tasks_by_project(
        &self,
        project_id: ProjectId,
    ) -> PlanningRepositoryResult<Vec<Task>>;

    /// Returns tasks whose project is due inside `window`, each with its
    /// project. Tasks without a project are never returned.
    async fn tasks_with_project_due(
        &self,
        window: DayWindow,
    ) -> PlanningRepositoryResult<Vec<TaskWithProject>>;
}

/// The shared store both planning services depend on.
pub trait PlanningStore: ProjectRepository + TaskRepository {}

impl<T> PlanningStore for T where T: ProjectRepository + TaskRepository {}

/// Errors returned by planning repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PlanningRepositoryError {
    /// A project with the same name already exists.
    #[error("a project named '{0}' already exists")]
    DuplicateProjectName(String),

    /// A task with the same name already exists.
    #[error("a task named '{0}' already exists")]
    DuplicateTaskName(String),

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The domain rejected a task change.
    #[error(transparent)]
    Rejected(#[from] PlanningDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlanningRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
