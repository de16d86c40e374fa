//! Read models produced by cross-collection joins.

use super::{Project, Task};
use serde::Serialize;

/// A project together with every task that refers to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectWithTasks {
    /// The project.
    #[serde(flatten)]
    pub project: Project,
    /// Tasks whose `projectId` is this project.
    pub tasks: Vec<Task>,
}

/// A task together with the project it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskWithProject {
    /// The task.
    #[serde(flatten)]
    pub task: Task,
    /// The task's project.
    pub project: Project,
}
