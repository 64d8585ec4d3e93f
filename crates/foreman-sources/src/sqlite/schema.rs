//! SQLite schema for the task database.

/// Schema version written to the `meta` table. Bump when
/// [`SCHEMA_STATEMENTS`] change shape and add a migration for existing
/// databases.
pub(crate) const CURRENT_SCHEMA_VERSION: i32 = 1;

/// DDL statements executed on every open. All statements are
/// idempotent (`IF NOT EXISTS`) so re-opening an initialized database
/// is a no-op.
pub(crate) const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id          TEXT PRIMARY KEY,
        title       TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status      TEXT NOT NULL DEFAULT 'pending',
        priority    INTEGER NOT NULL DEFAULT 2,
        agent       TEXT,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS task_deps (
        task_id       TEXT NOT NULL,
        depends_on_id TEXT NOT NULL,
        PRIMARY KEY (task_id, depends_on_id),
        FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS meta (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_agent ON tasks(agent)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_task_deps_depends_on ON task_deps(depends_on_id)",
];

/// Named migrations applied once each, tracked via `migration:{name}`
/// keys in the `meta` table.
pub(crate) const MIGRATIONS: &[(&str, &str)] = &[
    // Example:
    // ("add_tasks_labels", "ALTER TABLE tasks ADD COLUMN labels TEXT NOT NULL DEFAULT '[]'"),
];
