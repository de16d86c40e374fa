//! Application services for projects and tasks.

mod error;
mod project;
mod requests;
mod task;

pub use error::{ErrorKind, PlanningServiceError, PlanningServiceResult};
pub use project::ProjectService;
pub use requests::{
    AssignTaskRequest, ChangeStatusRequest, CreateTaskRequest, MoveTaskRequest, ProjectRequest,
    UpdateTaskRequest,
};
pub use task::TaskService;
