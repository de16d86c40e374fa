//! Port contracts for planning persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by planning services.

pub mod repository;

pub use repository::{
    PlanningRepositoryError, PlanningRepositoryResult, PlanningStore, ProjectRepository,
    TaskRepository,
};
