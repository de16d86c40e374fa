//! Shared state handed to every handler.

use crate::planning::{
    ports::PlanningStore,
    services::{ProjectService, TaskService},
};
use mockable::Clock;
use std::sync::Arc;

/// Both services over one store and one clock.
pub(super) struct ApiState<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    pub(super) projects: Arc<ProjectService<S, C>>,
    pub(super) tasks: Arc<TaskService<S, C>>,
}

impl<S, C> ApiState<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    pub(super) fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            projects: Arc::new(ProjectService::new(Arc::clone(&store), Arc::clone(&clock))),
            tasks: Arc::new(TaskService::new(store, clock)),
        }
    }
}

impl<S, C> Clone for ApiState<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            projects: Arc::clone(&self.projects),
            tasks: Arc::clone(&self.tasks),
        }
    }
}
