//! Project lifecycle, task association, and project queries.

use super::{
    error::{PlanningServiceError, PlanningServiceResult},
    requests::{AssignTaskRequest, MoveTaskRequest, ProjectRequest},
};
use crate::planning::{
    domain::{
        DayWindow, Project, ProjectDateField, ProjectId, ProjectWithTasks, Task, TaskChange,
        TaskId,
    },
    ports::{PlanningRepositoryError, PlanningStore},
};
use mockable::Clock;
use std::sync::Arc;

/// Project orchestration service.
///
/// Deleting a project never deletes its tasks; they are unassigned in the
/// same store operation.
#[derive(Clone)]
pub struct ProjectService<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> ProjectService<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    async fn find_project_or_error(&self, id: ProjectId) -> PlanningServiceResult<Project> {
        self.store
            .find_project(id)
            .await?
            .ok_or(PlanningServiceError::ProjectNotFound(id))
    }

    async fn ensure_task_exists(&self, id: TaskId) -> PlanningServiceResult<()> {
        self.store
            .find_task(id)
            .await?
            .map(|_| ())
            .ok_or(PlanningServiceError::TaskNotFound(id))
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is missing, or
    /// [`PlanningServiceError::DuplicateProjectName`] when it is taken.
    pub async fn create(&self, request: ProjectRequest) -> PlanningServiceResult<Project> {
        let fields = request.into_fields()?;
        let project = Project::new(fields, &*self.clock);
        self.store.store_project(&project).await?;
        tracing::info!(project_id = %project.id(), name = project.name(), "project created");
        Ok(project)
    }

    /// Returns every project in store order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Repository`] when the store fails.
    pub async fn list(&self) -> PlanningServiceResult<Vec<Project>> {
        Ok(self.store.list_projects().await?)
    }

    /// Replaces a project's fields and bumps its update timestamp.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is missing,
    /// [`PlanningServiceError::ProjectNotFound`] when the project does not
    /// exist, or [`PlanningServiceError::DuplicateProjectName`] when the new
    /// name is taken.
    pub async fn update(
        &self,
        id: ProjectId,
        request: ProjectRequest,
    ) -> PlanningServiceResult<Project> {
        let fields = request.into_fields()?;
        let mut project = self.find_project_or_error(id).await?;
        project.replace(fields, &*self.clock);
        self.store.update_project(&project).await?;
        tracing::info!(project_id = %id, "project updated");
        Ok(project)
    }

    /// Deletes a project and unassigns every task that referenced it.
    ///
    /// Returns the number of tasks unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::ProjectNotFound`] when the project does
    /// not exist, or [`PlanningServiceError::DeleteRaced`] when it vanished
    /// between the existence check and the delete.
    pub async fn delete(&self, id: ProjectId) -> PlanningServiceResult<usize> {
        self.find_project_or_error(id).await?;
        let unassigned = match self.store.delete_project_cascading(id).await {
            Ok(count) => count,
            Err(PlanningRepositoryError::ProjectNotFound(_)) => {
                tracing::warn!(project_id = %id, "project vanished before delete");
                return Err(PlanningServiceError::DeleteRaced(id));
            }
            Err(err) => return Err(err.into()),
        };
        tracing::info!(project_id = %id, unassigned, "project deleted");
        Ok(unassigned)
    }

    /// Attaches an unassigned task to a project.
    ///
    /// # Errors
    ///
    /// Returns a validation error when an id is missing, a not-found error
    /// when the task or project does not exist, or
    /// [`PlanningDomainError::TaskAlreadyAssigned`](crate::planning::domain::PlanningDomainError::TaskAlreadyAssigned)
    /// when the task already has a project.
    pub async fn assign_task(&self, request: AssignTaskRequest) -> PlanningServiceResult<Task> {
        let (task_id, project_id) = request.validate()?;
        self.ensure_task_exists(task_id).await?;
        self.find_project_or_error(project_id).await?;

        let task = self
            .store
            .apply_task_change(task_id, TaskChange::AssignProject(project_id))
            .await?
            .ok_or(PlanningServiceError::TaskNotFound(task_id))?;
        tracing::info!(task_id = %task_id, project_id = %project_id, "task assigned");
        Ok(task)
    }

    /// Moves a task from one project to another.
    ///
    /// Moving a task to the project it already belongs to succeeds.
    ///
    /// # Errors
    ///
    /// Returns a validation error when an id is missing, a not-found error
    /// when either project or the task does not exist, and
    /// [`PlanningDomainError::TaskNotInProject`](crate::planning::domain::PlanningDomainError::TaskNotInProject)
    /// when the task is not in the source project.
    pub async fn move_task(&self, request: MoveTaskRequest) -> PlanningServiceResult<Task> {
        let (task_id, from, to) = request.validate()?;
        self.find_project_or_error(from).await?;
        self.find_project_or_error(to).await?;

        let task = self
            .store
            .apply_task_change(task_id, TaskChange::MoveProject { from, to })
            .await?
            .ok_or(PlanningServiceError::TaskNotFound(task_id))?;
        tracing::info!(task_id = %task_id, from = %from, to = %to, "task moved");
        Ok(task)
    }

    /// Returns the tasks of the project with exactly this name.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::ProjectNameNotFound`] when no project
    /// has the name; an existing project with no tasks yields an empty list.
    pub async fn tasks_by_project_name(&self, name: &str) -> PlanningServiceResult<Vec<Task>> {
        let project = self
            .store
            .find_project_by_name(name)
            .await?
            .ok_or_else(|| PlanningServiceError::ProjectNameNotFound(name.to_owned()))?;
        Ok(self.store.find_tasks_by_project(project.id()).await?)
    }

    /// Returns every project ordered ascending by a date field.
    ///
    /// Accepted fields are `startDate`, `dueDate`, `createdAt`, and
    /// `updatedAt`. Projects without the date sort first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for any other field name.
    pub async fn sort_by_date(&self, field: &str) -> PlanningServiceResult<Vec<Project>> {
        let sort_field = ProjectDateField::try_from(field)?;
        Ok(self.store.list_projects_sorted(sort_field).await?)
    }

    /// Returns projects with at least one task due today, each with all of
    /// its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::NoProjectsWithTasksDueToday`] when no
    /// project qualifies.
    pub async fn projects_with_tasks_due_today(
        &self,
    ) -> PlanningServiceResult<Vec<ProjectWithTasks>> {
        let window = DayWindow::today(&*self.clock);
        let projects = self.store.projects_with_tasks_due(window).await?;
        if projects.is_empty() {
            return Err(PlanningServiceError::NoProjectsWithTasksDueToday);
        }
        Ok(projects)
    }
}
