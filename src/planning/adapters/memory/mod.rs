//! In-memory adapter for planning persistence.

mod store;

pub use store::InMemoryPlanningStore;
