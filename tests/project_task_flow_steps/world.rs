//! Shared world state for planning BDD scenarios.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use taskboard::planning::{
    adapters::memory::InMemoryPlanningStore,
    domain::{Project, Task},
    services::{CreateTaskRequest, PlanningServiceError, ProjectService, TaskService},
};

/// Scenario world backed by one in-memory store.
pub struct PlanningWorld {
    pub projects: ProjectService<InMemoryPlanningStore, DefaultClock>,
    pub tasks: TaskService<InMemoryPlanningStore, DefaultClock>,
    pub last_error: Option<PlanningServiceError>,
}

impl PlanningWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryPlanningStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock)),
            tasks: TaskService::new(store, clock),
            last_error: None,
        }
    }

    /// Finds a stored project by exact name.
    pub fn project_named(&self, name: &str) -> Result<Project, eyre::Report> {
        run_async(self.projects.list())?
            .into_iter()
            .find(|project| project.name() == name)
            .ok_or_else(|| eyre::eyre!("no project named {name}"))
    }

    /// Finds a stored task by exact name.
    pub fn task_named(&self, name: &str) -> Result<Task, eyre::Report> {
        run_async(self.tasks.list())?
            .into_iter()
            .find(|task| task.name() == name)
            .ok_or_else(|| eyre::eyre!("no task named {name}"))
    }
}

impl Default for PlanningWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PlanningWorld {
    PlanningWorld::default()
}

/// Builds a complete creation request due a week from now.
pub fn task_request(name: &str, status: &str) -> CreateTaskRequest {
    let now = Utc::now();
    CreateTaskRequest::new(
        name,
        format!("{name} description"),
        status,
        now,
        now + TimeDelta::days(7),
    )
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
