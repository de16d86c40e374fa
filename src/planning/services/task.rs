//! Task lifecycle, status transitions, and task queries.

use super::{
    error::{PlanningServiceError, PlanningServiceResult},
    requests::{ChangeStatusRequest, CreateTaskRequest, UpdateTaskRequest},
};
use crate::planning::{
    domain::{
        DayWindow, PlanningDomainError, Task, TaskChange, TaskDateField, TaskId, TaskStatus,
        TaskWithProject,
    },
    ports::PlanningStore,
};
use mockable::Clock;
use std::sync::Arc;

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskService<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a task.
    ///
    /// A task created as `done` starts and completes at the creation time,
    /// whatever dates the request carries.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing fields or an unknown status,
    /// [`PlanningServiceError::ProjectNotFound`] when the referenced project
    /// does not exist, or [`PlanningServiceError::DuplicateTaskName`] when
    /// the name is taken.
    pub async fn create(&self, request: CreateTaskRequest) -> PlanningServiceResult<Task> {
        let new_task = request.into_new_task()?;
        if let Some(project_id) = new_task.project_id
            && self.store.find_project(project_id).await?.is_none()
        {
            return Err(PlanningServiceError::ProjectNotFound(project_id));
        }

        let task = Task::new(new_task, &*self.clock);
        self.store.store_task(&task).await?;
        tracing::info!(task_id = %task.id(), status = %task.status(), "task created");
        Ok(task)
    }

    /// Returns every task in store order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Repository`] when the store fails.
    pub async fn list(&self) -> PlanningServiceResult<Vec<Task>> {
        Ok(self.store.list_tasks().await?)
    }

    /// Replaces a task's editable fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing fields or an unknown status,
    /// [`PlanningServiceError::TaskNotFound`] when the task does not exist,
    /// or [`PlanningServiceError::DuplicateTaskName`] when the new name is
    /// taken.
    pub async fn update(&self, id: TaskId, request: UpdateTaskRequest) -> PlanningServiceResult<Task> {
        let update = request.into_update()?;
        let change = TaskChange::Replace {
            update,
            at: self.clock.utc(),
        };
        let task = self
            .store
            .apply_task_change(id, change)
            .await?
            .ok_or(PlanningServiceError::TaskNotFound(id))?;
        tracing::info!(task_id = %id, status = %task.status(), "task updated");
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::TaskNotFound`] when no task matched.
    pub async fn delete(&self, id: TaskId) -> PlanningServiceResult<()> {
        if !self.store.delete_task(id).await? {
            return Err(PlanningServiceError::TaskNotFound(id));
        }
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Returns tasks with the given status.
    ///
    /// A status no task can hold matches nothing, so it yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the status is missing.
    pub async fn filter_by_status(&self, status: Option<&str>) -> PlanningServiceResult<Vec<Task>> {
        let Some(raw) = status.filter(|value| !value.trim().is_empty()) else {
            return Err(PlanningDomainError::MissingFields(vec!["status"]).into());
        };
        let Ok(wanted) = TaskStatus::try_from(raw) else {
            tracing::debug!(status = raw, "filter on unknown status matches no task");
            return Ok(Vec::new());
        };
        Ok(self.store.find_tasks_by_status(wanted).await?)
    }

    /// Returns tasks whose name contains `fragment`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Repository`] when the store fails.
    pub async fn search_by_name(&self, fragment: &str) -> PlanningServiceResult<Vec<Task>> {
        Ok(self.store.search_tasks_by_name(fragment).await?)
    }

    /// Returns every task ordered ascending by `startDate`, `dueDate`, or
    /// `doneDate`. Tasks without the date sort first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for any other field name.
    pub async fn sort_by_date(&self, field: &str) -> PlanningServiceResult<Vec<Task>> {
        let sort_field = TaskDateField::try_from(field)?;
        Ok(self.store.list_tasks_sorted(sort_field).await?)
    }

    /// Returns tasks whose project is due today, each with its project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::NoTasksWithProjectsDueToday`] when no
    /// task qualifies.
    pub async fn tasks_with_project_due_today(
        &self,
    ) -> PlanningServiceResult<Vec<TaskWithProject>> {
        let window = DayWindow::today(&*self.clock);
        let tasks = self.store.tasks_with_project_due(window).await?;
        if tasks.is_empty() {
            return Err(PlanningServiceError::NoTasksWithProjectsDueToday);
        }
        Ok(tasks)
    }

    /// Moves a task through the status machine.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the id or status is missing or the
    /// status is unknown, and [`PlanningServiceError::TaskNotFound`] when the
    /// task does not exist.
    pub async fn change_status(&self, request: ChangeStatusRequest) -> PlanningServiceResult<Task> {
        let (task_id, status) = request.validate()?;
        let change = TaskChange::ChangeStatus {
            status,
            at: self.clock.utc(),
        };
        let task = self
            .store
            .apply_task_change(task_id, change)
            .await?
            .ok_or(PlanningServiceError::TaskNotFound(task_id))?;
        tracing::info!(task_id = %task_id, status = %status, "task status changed");
        Ok(task)
    }
}
