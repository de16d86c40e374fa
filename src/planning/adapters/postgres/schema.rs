//! Diesel schema for planning persistence.

diesel::table! {
    /// Project records.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Unique project name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional start date.
        start_date -> Nullable<Timestamptz>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records referencing at most one project.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Unique task name.
        #[max_length = 255]
        name -> Varchar,
        /// Task description.
        description -> Text,
        /// Workflow status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_date -> Timestamptz,
        /// Start date, cleared when the task returns to `to-do`.
        start_date -> Nullable<Timestamptz>,
        /// Due date.
        due_date -> Timestamptz,
        /// Completion date.
        done_date -> Nullable<Timestamptz>,
        /// Owning project.
        project_id -> Nullable<Uuid>,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
