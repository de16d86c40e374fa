//! Route table for the planning API.

use super::{handlers, state::ApiState};
use crate::planning::ports::PlanningStore;
use axum::{
    Router,
    routing::{get, patch, post, put},
};
use mockable::Clock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the `/projects` and `/tasks` routes over a shared store and clock.
///
/// Unrouted paths and methods answer `404` with an `{"error": message}` body.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mockable::DefaultClock;
/// use taskboard::{api, planning::adapters::memory::InMemoryPlanningStore};
///
/// let _app = api::router(
///     Arc::new(InMemoryPlanningStore::new()),
///     Arc::new(DefaultClock),
/// );
/// ```
#[must_use]
pub fn router<S, C>(store: Arc<S>, clock: Arc<C>) -> Router
where
    S: PlanningStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/projects",
            get(handlers::list_projects::<S, C>).post(handlers::create_project::<S, C>),
        )
        .route("/projects/assignTask", post(handlers::assign_task::<S, C>))
        .route("/projects/moveTask", post(handlers::move_task::<S, C>))
        .route("/projects/filterTasks", get(handlers::project_tasks::<S, C>))
        .route("/projects/sort", get(handlers::sort_projects::<S, C>))
        .route(
            "/projects/projectWithTask",
            get(handlers::projects_due_today::<S, C>),
        )
        .route(
            "/projects/{id}",
            put(handlers::update_project::<S, C>).delete(handlers::delete_project::<S, C>),
        )
        .route(
            "/tasks",
            get(handlers::list_tasks::<S, C>).post(handlers::create_task::<S, C>),
        )
        .route("/tasks/filter", get(handlers::filter_tasks::<S, C>))
        .route("/tasks/search", get(handlers::search_tasks::<S, C>))
        .route("/tasks/sort", get(handlers::sort_tasks::<S, C>))
        .route("/tasks/taskWithProject", get(handlers::tasks_due_today::<S, C>))
        .route("/tasks/changeStatus", patch(handlers::change_status::<S, C>))
        .route(
            "/tasks/{id}",
            put(handlers::update_task::<S, C>).delete(handlers::delete_task::<S, C>),
        )
        .method_not_allowed_fallback(handlers::no_route)
        .fallback(handlers::no_route)
        .layer(TraceLayer::new_for_http())
        .with_state(ApiState::new(store, clock))
}
