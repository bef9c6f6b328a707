//! Diesel schema for defect tracking persistence.

diesel::table! {
    /// Users owned by the external directory (read-only here).
    users (id) {
        /// Directory user identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 255]
        full_name -> Varchar,
        /// Role name.
        #[max_length = 20]
        role -> Varchar,
    }
}

diesel::table! {
    /// Projects owned by the external directory (read-only here).
    projects (id) {
        /// Directory project identifier.
        id -> Int8,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Whether the project accepts new work.
        active -> Bool,
    }
}

diesel::table! {
    /// Reported defects.
    defects (id) {
        /// Defect identifier.
        id -> Uuid,
        /// Short summary.
        #[max_length = 255]
        title -> Varchar,
        /// Full description.
        description -> Text,
        /// Owning project.
        project_id -> Int8,
        /// Reporting user.
        initiator_id -> Int8,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Conversion flag, kept equal to `converted_to_task_id IS NOT NULL`.
        is_converted -> Bool,
        /// Task created from this defect, if any.
        converted_to_task_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Files attached to defects.
    defect_files (id) {
        /// Attachment identifier.
        id -> Uuid,
        /// Owning defect.
        defect_id -> Uuid,
        /// Stored file name.
        #[max_length = 255]
        file_name -> Varchar,
        /// Blob storage path.
        #[max_length = 512]
        file_path -> Varchar,
        /// Upload timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Assignable tasks.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Task description.
        description -> Text,
        /// Owning project.
        project_id -> Int8,
        /// Creating user.
        creator_id -> Int8,
        /// Assigned user, if any.
        assignee_id -> Nullable<Int8>,
        /// Due date, if any.
        due_date -> Nullable<Timestamptz>,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Defect this task was converted from, if any.
        related_defect_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only defect audit trail.
    defect_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Insertion sequence, breaks creation-time ties.
        seq -> Int8,
        /// Defect the entry belongs to.
        defect_id -> Uuid,
        /// Acting user.
        actor_id -> Int8,
        /// Action type.
        #[max_length = 32]
        action_type -> Varchar,
        /// Human-readable action description.
        action_text -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
