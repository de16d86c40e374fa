//! `PostgreSQL` repository implementation for planning storage.

use super::{
    models::{NewProjectRow, NewTaskRow, ProjectRow, TaskRow},
    schema::{projects, tasks},
};
use crate::config::StoreConfig;
use crate::planning::{
    domain::{
        DayWindow, PersistedProjectData, PersistedTaskData, Project, ProjectDateField, ProjectId,
        ProjectWithTasks, Task, TaskChange, TaskDateField, TaskId, TaskStatus, TaskWithProject,
    },
    ports::{PlanningRepositoryError, PlanningRepositoryResult, ProjectRepository, TaskRepository},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by planning adapters.
pub type PlanningPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema creation script applied by [`PostgresPlanningStore::ensure_schema`].
pub const SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_planning_tables/up.sql");

const PROJECT_NAME_CONSTRAINT: &str = "idx_projects_name_unique";
const TASK_NAME_CONSTRAINT: &str = "idx_tasks_name_unique";

/// `PostgreSQL`-backed planning store.
#[derive(Debug, Clone)]
pub struct PostgresPlanningStore {
    pool: PlanningPgPool,
}

impl PostgresPlanningStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PlanningPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::Persistence`] when the pool cannot
    /// establish its initial connections.
    pub fn connect(config: &StoreConfig) -> PlanningRepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url());
        let pool = Pool::builder()
            .max_size(config.max_connections())
            .connection_timeout(config.connection_timeout())
            .build(manager)
            .map_err(PlanningRepositoryError::persistence)?;
        tracing::info!(
            max_connections = config.max_connections(),
            "planning store connection pool ready"
        );
        Ok(Self::new(pool))
    }

    /// Creates the planning tables.
    ///
    /// Intended for fresh databases and tests; it fails if the tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::Persistence`] when the script fails.
    pub async fn ensure_schema(&self) -> PlanningRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(SCHEMA_SQL)
                .map_err(PlanningRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> PlanningRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PlanningRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PlanningRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(PlanningRepositoryError::persistence)?
    }
}

impl From<DieselError> for PlanningRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ProjectRepository for PostgresPlanningStore {
    async fn store_project(&self, project: &Project) -> PlanningRepositoryResult<()> {
        let new_row = to_new_project_row(project);
        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_project_write_error(err, &new_row.name))?;
            Ok(())
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> PlanningRepositoryResult<()> {
        let project_id = project.id();
        let row = to_new_project_row(project);
        self.run_blocking(move |connection| {
            let updated = diesel::update(projects::table.find(row.id))
                .set(&row)
                .execute(connection)
                .map_err(|err| map_project_write_error(err, &row.name))?;
            if updated == 0 {
                return Err(PlanningRepositoryError::ProjectNotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_project(&self, id: ProjectId) -> PlanningRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            Ok(row.map(row_to_project))
        })
        .await
    }

    async fn find_project_by_name(&self, name: &str) -> PlanningRepositoryResult<Option<Project>> {
        let lookup_name = name.to_owned();
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::name.eq(&lookup_name))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            Ok(row.map(row_to_project))
        })
        .await
    }

    async fn list_projects(&self) -> PlanningRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            Ok(rows.into_iter().map(row_to_project).collect())
        })
        .await
    }

    async fn list_projects_sorted(
        &self,
        field: ProjectDateField,
    ) -> PlanningRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let query = projects::table.select(ProjectRow::as_select()).into_boxed();
            let ordered = match field {
                ProjectDateField::StartDate => query.order(projects::start_date.asc().nulls_first()),
                ProjectDateField::DueDate => query.order(projects::due_date.asc().nulls_first()),
                ProjectDateField::CreatedAt => query.order(projects::created_at.asc()),
                ProjectDateField::UpdatedAt => query.order(projects::updated_at.asc()),
            };
            let rows = ordered
                .then_order_by(projects::created_at.asc())
                .then_order_by(projects::id.asc())
                .load::<ProjectRow>(connection)?;
            Ok(rows.into_iter().map(row_to_project).collect())
        })
        .await
    }

    async fn delete_project_cascading(&self, id: ProjectId) -> PlanningRepositoryResult<usize> {
        let project_uuid = id.into_inner();
        self.run_blocking(move |connection| {
            // The task foreign key is deferred, so deleting first and
            // unassigning second is valid inside one transaction.
            connection.transaction::<_, PlanningRepositoryError, _>(|tx| {
                let deleted = diesel::delete(projects::table.find(project_uuid)).execute(tx)?;
                if deleted == 0 {
                    return Err(PlanningRepositoryError::ProjectNotFound(id));
                }
                let unassigned =
                    diesel::update(tasks::table.filter(tasks::project_id.eq(project_uuid)))
                        .set(tasks::project_id.eq(None::<Uuid>))
                        .execute(tx)?;
                Ok(unassigned)
            })
        })
        .await
    }

    async fn projects_with_tasks_due(
        &self,
        window: DayWindow,
    ) -> PlanningRepositoryResult<Vec<ProjectWithTasks>> {
        self.run_blocking(move |connection| {
            let due_project_ids: Vec<Option<Uuid>> = tasks::table
                .filter(tasks::due_date.between(window.start(), window.end()))
                .filter(tasks::project_id.is_not_null())
                .select(tasks::project_id)
                .distinct()
                .load(connection)?;
            let project_ids: Vec<Uuid> = due_project_ids.into_iter().flatten().collect();
            if project_ids.is_empty() {
                return Ok(Vec::new());
            }

            let rows = projects::table
                .inner_join(tasks::table)
                .filter(projects::id.eq_any(project_ids))
                .order((
                    projects::created_at.asc(),
                    projects::id.asc(),
                    tasks::created_date.asc(),
                    tasks::id.asc(),
                ))
                .select((ProjectRow::as_select(), TaskRow::as_select()))
                .load::<(ProjectRow, TaskRow)>(connection)?;
            group_tasks_by_project(rows)
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresPlanningStore {
    async fn store_task(&self, task: &Task) -> PlanningRepositoryResult<()> {
        let new_row = to_new_task_row(task);
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_task_write_error(err, &new_row))?;
            Ok(())
        })
        .await
    }

    async fn apply_task_change(
        &self,
        id: TaskId,
        change: TaskChange,
    ) -> PlanningRepositoryResult<Option<Task>> {
        let task_uuid = id.into_inner();
        self.run_blocking(move |connection| {
            connection.transaction::<_, PlanningRepositoryError, _>(|tx| {
                let Some(row) = tasks::table
                    .find(task_uuid)
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                else {
                    return Ok(None);
                };

                if let Some(project_id) = change.target_project() {
                    // Share-lock the target so it cannot be deleted before commit.
                    let target = projects::table
                        .find(project_id.into_inner())
                        .select(projects::id)
                        .for_share()
                        .first::<Uuid>(tx)
                        .optional()?;
                    if target.is_none() {
                        return Err(PlanningRepositoryError::ProjectNotFound(project_id));
                    }
                }

                let mut task = row_to_task(row)?;
                task.apply(change)?;
                let updated_row = to_new_task_row(&task);
                diesel::update(tasks::table.find(task_uuid))
                    .set(&updated_row)
                    .execute(tx)
                    .map_err(|err| map_task_write_error(err, &updated_row))?;
                Ok(Some(task))
            })
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> PlanningRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> PlanningRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_tasks(&self) -> PlanningRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .order((tasks::created_date.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_tasks_by_status(
        &self,
        status: TaskStatus,
    ) -> PlanningRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::status.eq(status.as_str()))
                .order((tasks::created_date.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn search_tasks_by_name(&self, fragment: &str) -> PlanningRepositoryResult<Vec<Task>> {
        let pattern = format!("%{}%", escape_like(fragment));
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::name.ilike(&pattern))
                .order((tasks::created_date.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_tasks_sorted(&self, field: TaskDateField) -> PlanningRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let query = tasks::table.select(TaskRow::as_select()).into_boxed();
            let ordered = match field {
                TaskDateField::StartDate => query.order(tasks::start_date.asc().nulls_first()),
                TaskDateField::DueDate => query.order(tasks::due_date.asc()),
                TaskDateField::DoneDate => query.order(tasks::done_date.asc().nulls_first()),
            };
            let rows = ordered
                .then_order_by(tasks::created_date.asc())
                .then_order_by(tasks::id.asc())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_tasks_by_project(
        &self,
        project_id: ProjectId,
    ) -> PlanningRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .order((tasks::created_date.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn tasks_with_project_due(
        &self,
        window: DayWindow,
    ) -> PlanningRepositoryResult<Vec<TaskWithProject>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .inner_join(projects::table)
                .filter(projects::due_date.between(window.start(), window.end()))
                .order((tasks::created_date.asc(), tasks::id.asc()))
                .select((TaskRow::as_select(), ProjectRow::as_select()))
                .load::<(TaskRow, ProjectRow)>(connection)?;
            rows.into_iter()
                .map(|(task_row, project_row)| {
                    Ok(TaskWithProject {
                        task: row_to_task(task_row)?,
                        project: row_to_project(project_row),
                    })
                })
                .collect()
        })
        .await
    }
}

fn to_new_project_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().to_owned(),
        description: project.description().map(str::to_owned),
        start_date: project.start_date(),
        due_date: project.due_date(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> Project {
    Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        name: row.name,
        description: row.description,
        start_date: row.start_date,
        due_date: row.due_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_new_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        name: task.name().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        created_date: task.created_date(),
        start_date: task.start_date(),
        due_date: task.due_date(),
        done_date: task.done_date(),
        project_id: task.project_id().map(ProjectId::into_inner),
    }
}

fn row_to_task(row: TaskRow) -> PlanningRepositoryResult<Task> {
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(PlanningRepositoryError::persistence)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        name: row.name,
        description: row.description,
        status,
        created_date: row.created_date,
        start_date: row.start_date,
        due_date: row.due_date,
        done_date: row.done_date,
        project_id: row.project_id.map(ProjectId::from_uuid),
    }))
}

/// Folds join rows ordered by project into one entry per project.
fn group_tasks_by_project(
    rows: Vec<(ProjectRow, TaskRow)>,
) -> PlanningRepositoryResult<Vec<ProjectWithTasks>> {
    let mut grouped: Vec<ProjectWithTasks> = Vec::new();
    for (project_row, task_row) in rows {
        let task = row_to_task(task_row)?;
        match grouped.last_mut() {
            Some(current) if current.project.id().into_inner() == project_row.id => {
                current.tasks.push(task);
            }
            _ => grouped.push(ProjectWithTasks {
                project: row_to_project(project_row),
                tasks: vec![task],
            }),
        }
    }
    Ok(grouped)
}

fn map_project_write_error(err: DieselError, name: &str) -> PlanningRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if violates(info.as_ref(), PROJECT_NAME_CONSTRAINT) =>
        {
            PlanningRepositoryError::DuplicateProjectName(name.to_owned())
        }
        _ => PlanningRepositoryError::persistence(err),
    }
}

fn map_task_write_error(err: DieselError, row: &NewTaskRow) -> PlanningRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if violates(info.as_ref(), TASK_NAME_CONSTRAINT) =>
        {
            PlanningRepositoryError::DuplicateTaskName(row.name.clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => row
            .project_id
            .map_or_else(
                || PlanningRepositoryError::persistence(err),
                |project_uuid| {
                    PlanningRepositoryError::ProjectNotFound(ProjectId::from_uuid(project_uuid))
                },
            ),
        _ => PlanningRepositoryError::persistence(err),
    }
}

fn violates(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

/// Escapes `LIKE` wildcards so the fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
