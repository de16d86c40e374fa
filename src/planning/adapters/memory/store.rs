//! In-memory planning store for tests and embedded use.

use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::planning::{
    domain::{
        DayWindow, Project, ProjectDateField, ProjectId, ProjectWithTasks, Task, TaskChange,
        TaskDateField, TaskId, TaskStatus, TaskWithProject,
    },
    ports::{PlanningRepositoryError, PlanningRepositoryResult, ProjectRepository, TaskRepository},
};

/// Thread-safe in-memory store holding both collections behind one lock.
///
/// Records keep insertion order, which is the order `list_*` returns.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanningStore {
    state: Arc<RwLock<InMemoryPlanningState>>,
}

#[derive(Debug, Default)]
struct InMemoryPlanningState {
    projects: Vec<Project>,
    tasks: Vec<Task>,
}

impl InMemoryPlanningState {
    fn has_project(&self, id: ProjectId) -> bool {
        self.projects.iter().any(|project| project.id() == id)
    }

    fn tasks_of(&self, project_id: ProjectId) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.project_id() == Some(project_id))
            .cloned()
            .collect()
    }
}

impl InMemoryPlanningStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> PlanningRepositoryResult<RwLockReadGuard<'_, InMemoryPlanningState>> {
        self.state.read().map_err(|err| {
            PlanningRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> PlanningRepositoryResult<RwLockWriteGuard<'_, InMemoryPlanningState>> {
        self.state.write().map_err(|err| {
            PlanningRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ProjectRepository for InMemoryPlanningStore {
    async fn store_project(&self, project: &Project) -> PlanningRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state
            .projects
            .iter()
            .any(|existing| existing.name() == project.name())
        {
            return Err(PlanningRepositoryError::DuplicateProjectName(
                project.name().to_owned(),
            ));
        }
        state.projects.push(project.clone());
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> PlanningRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state
            .projects
            .iter()
            .any(|existing| existing.id() != project.id() && existing.name() == project.name())
        {
            return Err(PlanningRepositoryError::DuplicateProjectName(
                project.name().to_owned(),
            ));
        }
        let stored = state
            .projects
            .iter_mut()
            .find(|existing| existing.id() == project.id())
            .ok_or(PlanningRepositoryError::ProjectNotFound(project.id()))?;
        *stored = project.clone();
        Ok(())
    }

    async fn find_project(&self, id: ProjectId) -> PlanningRepositoryResult<Option<Project>> {
        let state = self.read_state()?;
        Ok(state
            .projects
            .iter()
            .find(|project| project.id() == id)
            .cloned())
    }

    async fn find_project_by_name(&self, name: &str) -> PlanningRepositoryResult<Option<Project>> {
        let state = self.read_state()?;
        Ok(state
            .projects
            .iter()
            .find(|project| project.name() == name)
            .cloned())
    }

    async fn list_projects(&self) -> PlanningRepositoryResult<Vec<Project>> {
        Ok(self.read_state()?.projects.clone())
    }

    async fn list_projects_sorted(
        &self,
        field: ProjectDateField,
    ) -> PlanningRepositoryResult<Vec<Project>> {
        let mut projects = self.read_state()?.projects.clone();
        projects.sort_by_key(|project| project.date_field(field));
        Ok(projects)
    }

    async fn delete_project_cascading(&self, id: ProjectId) -> PlanningRepositoryResult<usize> {
        let mut state = self.write_state()?;
        let before = state.projects.len();
        state.projects.retain(|project| project.id() != id);
        if state.projects.len() == before {
            return Err(PlanningRepositoryError::ProjectNotFound(id));
        }

        let mut unassigned = 0;
        for task in state
            .tasks
            .iter_mut()
            .filter(|task| task.project_id() == Some(id))
        {
            task.unassign_project();
            unassigned += 1;
        }
        Ok(unassigned)
    }

    async fn projects_with_tasks_due(
        &self,
        window: DayWindow,
    ) -> PlanningRepositoryResult<Vec<ProjectWithTasks>> {
        let state = self.read_state()?;
        Ok(state
            .projects
            .iter()
            .map(|project| ProjectWithTasks {
                project: project.clone(),
                tasks: state.tasks_of(project.id()),
            })
            .filter(|joined| {
                joined
                    .tasks
                    .iter()
                    .any(|task| window.contains(task.due_date()))
            })
            .collect())
    }
}

#[async_trait]
impl TaskRepository for InMemoryPlanningStore {
    async fn store_task(&self, task: &Task) -> PlanningRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state
            .tasks
            .iter()
            .any(|existing| existing.name() == task.name())
        {
            return Err(PlanningRepositoryError::DuplicateTaskName(
                task.name().to_owned(),
            ));
        }
        if let Some(project_id) = task.project_id()
            && !state.has_project(project_id)
        {
            return Err(PlanningRepositoryError::ProjectNotFound(project_id));
        }
        state.tasks.push(task.clone());
        Ok(())
    }

    async fn apply_task_change(
        &self,
        id: TaskId,
        change: TaskChange,
    ) -> PlanningRepositoryResult<Option<Task>> {
        let mut state = self.write_state()?;
        if !state.tasks.iter().any(|task| task.id() == id) {
            return Ok(None);
        }
        if let Some(project_id) = change.target_project()
            && !state.has_project(project_id)
        {
            return Err(PlanningRepositoryError::ProjectNotFound(project_id));
        }
        if let TaskChange::Replace { update, .. } = &change
            && state
                .tasks
                .iter()
                .any(|task| task.id() != id && task.name() == update.name)
        {
            return Err(PlanningRepositoryError::DuplicateTaskName(
                update.name.clone(),
            ));
        }

        let Some(stored) = state.tasks.iter_mut().find(|task| task.id() == id) else {
            return Ok(None);
        };
        let mut updated = stored.clone();
        updated.apply(change)?;
        *stored = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_task(&self, id: TaskId) -> PlanningRepositoryResult<bool> {
        let mut state = self.write_state()?;
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id() != id);
        Ok(state.tasks.len() != before)
    }

    async fn find_task(&self, id: TaskId) -> PlanningRepositoryResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.iter().find(|task| task.id() == id).cloned())
    }

    async fn list_tasks(&self) -> PlanningRepositoryResult<Vec<Task>> {
        Ok(self.read_state()?.tasks.clone())
    }

    async fn find_tasks_by_status(
        &self,
        status: TaskStatus,
    ) -> PlanningRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.status() == status)
            .cloned()
            .collect())
    }

    async fn search_tasks_by_name(&self, fragment: &str) -> PlanningRepositoryResult<Vec<Task>> {
        let needle = fragment.to_lowercase();
        let state = self.read_state()?;
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.name().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_tasks_sorted(&self, field: TaskDateField) -> PlanningRepositoryResult<Vec<Task>> {
        let mut tasks = self.read_state()?.tasks.clone();
        tasks.sort_by_key(|task| task.date_field(field));
        Ok(tasks)
    }

    async fn find_tasks_by_project(
        &self,
        project_id: ProjectId,
    ) -> PlanningRepositoryResult<Vec<Task>> {
        Ok(self.read_state()?.tasks_of(project_id))
    }

    async fn tasks_with_project_due(
        &self,
        window: DayWindow,
    ) -> PlanningRepositoryResult<Vec<TaskWithProject>> {
        let state = self.read_state()?;
        Ok(state
            .tasks
            .iter()
            .filter_map(|task| {
                let project_id = task.project_id()?;
                let project = state
                    .projects
                    .iter()
                    .find(|project| project.id() == project_id)?;
                project
                    .due_date()
                    .is_some_and(|due| window.contains(due))
                    .then(|| TaskWithProject {
                        task: task.clone(),
                        project: project.clone(),
                    })
            })
            .collect())
    }
}
