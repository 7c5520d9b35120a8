//! Diesel schema for tracker persistence.

diesel::table! {
    /// Registered users keyed by alias.
    users (alias) {
        /// Unique user alias.
        #[max_length = 255]
        alias -> Varchar,
        /// Display name.
        name -> Text,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Task name.
        name -> Text,
        /// Task description.
        description -> Text,
        /// Task lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last status change timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// `(user, task, role)` assignment triples.
    task_assignments (user_alias, task_id, role) {
        /// Assigned user.
        #[max_length = 255]
        user_alias -> Varchar,
        /// Task the user is assigned to.
        task_id -> Int8,
        /// Role held on the task.
        #[max_length = 20]
        role -> Varchar,
        /// Insertion order.
        position -> Int8,
    }
}

diesel::table! {
    /// Directed dependency edges: `task_id` depends on `depends_on_id`.
    task_dependencies (task_id, depends_on_id) {
        /// Dependent task.
        task_id -> Int8,
        /// Task depended upon.
        depends_on_id -> Int8,
    }
}

diesel::joinable!(task_assignments -> tasks (task_id));
diesel::joinable!(task_assignments -> users (user_alias));

diesel::allow_tables_to_appear_in_same_query!(users, tasks, task_assignments, task_dependencies);
