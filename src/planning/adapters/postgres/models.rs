//! Diesel row models for planning persistence.

use super::schema::{projects, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Unique project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and changeset model for project records.
///
/// `None` writes `NULL` so a full update can clear optional fields.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Unique project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Unique task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Completion date.
    pub done_date: Option<DateTime<Utc>>,
    /// Owning project.
    pub project_id: Option<uuid::Uuid>,
}

/// Insert and changeset model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Unique task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Completion date.
    pub done_date: Option<DateTime<Utc>>,
    /// Owning project.
    pub project_id: Option<uuid::Uuid>,
}
