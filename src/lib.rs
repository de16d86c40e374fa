//! Taskboard: project and task planning over a pluggable store.
//!
//! Projects group tasks by reference; each task carries an optional project
//! id and a three-state status whose transitions stamp start and completion
//! dates.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: entities, the status machine, and association rules
//! - **Ports**: repository traits the services depend on
//! - **Adapters**: an in-memory store and a `PostgreSQL` store
//! - **Services**: project and task orchestration with typed errors
//!
//! # Modules
//!
//! - [`planning`]: the bounded context for projects and tasks
//! - [`api`]: the axum router serving the planning routes
//! - [`config`]: store settings read from the environment

pub mod api;
pub mod config;
pub mod planning;
