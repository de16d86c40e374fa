//! Project aggregate root.

use super::{PlanningDomainError, ProjectId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project date fields that may be used for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectDateField {
    /// Sort by `startDate`.
    StartDate,
    /// Sort by `dueDate`.
    DueDate,
    /// Sort by `createdAt`.
    CreatedAt,
    /// Sort by `updatedAt`.
    UpdatedAt,
}

impl ProjectDateField {
    const ALLOWED: &'static str = "startDate, dueDate, createdAt, updatedAt";

    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartDate => "startDate",
            Self::DueDate => "dueDate",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl TryFrom<&str> for ProjectDateField {
    type Error = PlanningDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "startDate" => Ok(Self::StartDate),
            "dueDate" => Ok(Self::DueDate),
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            _ => Err(PlanningDomainError::InvalidSortField {
                field: value.to_owned(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Validated project fields, used both for creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFields {
    /// Unique project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

/// Project aggregate root.
///
/// Projects do not hold their tasks; each task refers to its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    name: String,
    description: Option<String>,
    start_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project.
    #[must_use]
    pub fn new(fields: ProjectFields, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            name: fields.name,
            description: fields.description,
            start_date: fields.start_date,
            due_date: fields.due_date,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            start_date: data.start_date,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the value of a sortable date field.
    #[must_use]
    pub const fn date_field(&self, field: ProjectDateField) -> Option<DateTime<Utc>> {
        match field {
            ProjectDateField::StartDate => self.start_date,
            ProjectDateField::DueDate => self.due_date,
            ProjectDateField::CreatedAt => Some(self.created_at),
            ProjectDateField::UpdatedAt => Some(self.updated_at),
        }
    }

    /// Replaces every editable field and bumps `updated_at`.
    pub fn replace(&mut self, fields: ProjectFields, clock: &impl Clock) {
        self.name = fields.name;
        self.description = fields.description;
        self.start_date = fields.start_date;
        self.due_date = fields.due_date;
        self.updated_at = clock.utc();
    }
}
