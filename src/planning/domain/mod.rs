//! Domain model for projects, tasks, and their association.
//!
//! Tasks reference at most one project. The status machine and association
//! rules live on [`Task`] so every adapter enforces them identically.

mod dates;
mod error;
mod ids;
mod project;
mod task;
mod views;

pub use dates::{DayWindow, parse_date};
pub use error::{ParseTaskStatusError, PlanningDomainError};
pub use ids::{ProjectId, TaskId};
pub use project::{PersistedProjectData, Project, ProjectDateField, ProjectFields};
pub use task::{NewTask, PersistedTaskData, Task, TaskChange, TaskDateField, TaskStatus, TaskUpdate};
pub use views::{ProjectWithTasks, TaskWithProject};
