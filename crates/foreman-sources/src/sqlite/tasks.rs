//! Task operations for [`SqliteSource`].

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use tracing::debug;

use foreman_core::{Task, TaskStatus};

use crate::error::{Result, SourceError};
use crate::sqlite::store::SqliteSource;

// ---------------------------------------------------------------------------
// Column list (shared between INSERT and SELECT)
// ---------------------------------------------------------------------------

/// All task columns in a deterministic order for SELECT queries.
pub(crate) const TASK_COLUMNS: &str =
    "id, title, description, status, priority, agent, created_at, updated_at";

// ---------------------------------------------------------------------------
// Row scanning
// ---------------------------------------------------------------------------

/// Deserialises a row into a [`Task`].
///
/// The column order MUST match [`TASK_COLUMNS`]. Dependencies live in
/// their own table and are populated separately.
pub(crate) fn scan_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status_str: String = row.get("status")?;
    let created_at_str: String = row.get("created_at")?;
    let updated_at_str: String = row.get("updated_at")?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: TaskStatus::from(status_str),
        priority: row.get("priority")?,
        agent: row.get("agent")?,
        depends_on: Vec::new(),
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Formats a `DateTime<Utc>` as ISO 8601 TEXT for SQLite.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses an ISO 8601 TEXT string from SQLite into a `DateTime<Utc>`.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // Try full RFC 3339 first, then common SQLite formats.
    s.parse::<DateTime<Utc>>().unwrap_or_else(|_| {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
            .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ"))
            .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
            .map(|ndt| ndt.and_utc())
            .unwrap_or_else(|_| Utc::now())
    })
}

fn task_exists(conn: &Connection, task_id: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
        params![task_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn load_deps(conn: &Connection, task_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT depends_on_id FROM task_deps WHERE task_id = ?1 ORDER BY depends_on_id",
    )?;
    let rows = stmt.query_map(params![task_id], |row| row.get(0))?;
    let mut deps = Vec::new();
    for row in rows {
        deps.push(row?);
    }
    Ok(deps)
}

fn populate_deps(conn: &Connection, tasks: &mut [Task]) -> Result<()> {
    for task in tasks.iter_mut() {
        task.depends_on = load_deps(conn, &task.id)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task insert helper
// ---------------------------------------------------------------------------

/// Inserts a single task and its dependency rows using the provided
/// connection.
pub(crate) fn insert_task(conn: &Connection, task: &Task) -> Result<()> {
    let created_at_str = format_datetime(&task.created_at);
    let updated_at_str = format_datetime(&task.updated_at);

    let result = conn.execute(
        &format!("INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        params![
            task.id,              // 1
            task.title,           // 2
            task.description,     // 3
            task.status.as_str(), // 4
            task.priority,        // 5
            task.agent,           // 6
            created_at_str,       // 7
            updated_at_str,       // 8
        ],
    );
    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(SourceError::duplicate(task.id.clone()));
        }
        Err(e) => return Err(SourceError::Query(e)),
    }

    for dep in &task.depends_on {
        conn.execute(
            "INSERT OR IGNORE INTO task_deps (task_id, depends_on_id) VALUES (?1, ?2)",
            params![task.id, dep],
        )?;
    }
    Ok(())
}

fn get_task_on_conn(conn: &Connection, task_id: &str) -> Result<Task> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
    let mut task = conn
        .query_row(&sql, params![task_id], scan_task)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => SourceError::not_found(task_id),
            other => SourceError::Query(other),
        })?;
    task.depends_on = load_deps(conn, task_id)?;
    Ok(task)
}

// ---------------------------------------------------------------------------
// SqliteSource task methods
// ---------------------------------------------------------------------------

impl SqliteSource {
    /// Inserts a new task, rejecting ids that are already present.
    pub fn insert_task(&self, task: &Task) -> Result<()> {
        let conn = self.lock_conn()?;
        insert_task(&conn, task)?;
        debug!(task_id = %task.id, "inserted task");
        Ok(())
    }

    /// Retrieves a task by id.
    pub fn get_task(&self, task_id: &str) -> Result<Task> {
        let conn = self.lock_conn()?;
        get_task_on_conn(&conn, task_id)
    }

    /// Records that `task_id` must wait for `depends_on_id`.
    ///
    /// The dependency target does not have to exist yet; an unresolved
    /// id simply keeps the task out of the ready set.
    pub fn add_dependency(&self, task_id: &str, depends_on_id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        if !task_exists(&conn, task_id)? {
            return Err(SourceError::not_found(task_id));
        }
        conn.execute(
            "INSERT OR IGNORE INTO task_deps (task_id, depends_on_id) VALUES (?1, ?2)",
            params![task_id, depends_on_id],
        )?;
        Ok(())
    }

    /// Lists every task, oldest first.
    pub fn get_tasks_impl(&self) -> Result<Vec<Task>> {
        let conn = self.lock_conn()?;
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at, id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], scan_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        populate_deps(&conn, &mut tasks)?;
        Ok(tasks)
    }

    /// Lists pending, unclaimed tasks whose dependencies are all done.
    pub fn get_ready_tasks_impl(&self) -> Result<Vec<Task>> {
        let conn = self.lock_conn()?;
        // A dependency row with no matching task blocks like an
        // unfinished one.
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE status = ?1
               AND agent IS NULL
               AND NOT EXISTS (
                   SELECT 1 FROM task_deps d
                   LEFT JOIN tasks dep ON dep.id = d.depends_on_id
                   WHERE d.task_id = tasks.id
                     AND (dep.id IS NULL OR dep.status != ?2)
               )
             ORDER BY priority, created_at, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![TaskStatus::Pending.as_str(), TaskStatus::Done.as_str()],
            scan_task,
        )?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        populate_deps(&conn, &mut tasks)?;
        Ok(tasks)
    }

    /// Sets the status of an existing task.
    pub fn update_status_impl(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        let conn = self.lock_conn()?;
        let now_str = format_datetime(&Utc::now());
        let affected = conn.execute(
            "UPDATE tasks SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![task_id, status.as_str(), now_str],
        )?;
        if affected == 0 {
            return Err(SourceError::not_found(task_id));
        }
        debug!(task_id, status = status.as_str(), "updated task status");
        Ok(())
    }

    /// Claims a task for an agent.
    ///
    /// The conditional UPDATE is the race arbiter: whichever claim the
    /// database applies first flips `agent` away from NULL, and every
    /// later claim matches zero rows.
    pub fn claim_task_impl(&self, task_id: &str, agent_id: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let now_str = format_datetime(&Utc::now());
        let affected = conn.execute(
            "UPDATE tasks SET agent = ?2, updated_at = ?3 WHERE id = ?1 AND agent IS NULL",
            params![task_id, agent_id, now_str],
        )?;
        if affected == 1 {
            debug!(task_id, agent_id, "claimed task");
            return Ok(true);
        }
        if task_exists(&conn, task_id)? {
            Ok(false)
        } else {
            Err(SourceError::not_found(task_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use foreman_core::TaskBuilder;
    use pretty_assertions::assert_eq;

    fn task(id: &str) -> Task {
        TaskBuilder::new(format!("title for {id}")).id(id).build()
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn insert_and_get_round_trip() {
        let source = SqliteSource::open_in_memory().unwrap();
        let task = TaskBuilder::new("Ship it")
            .id("fm-a")
            .description("all the details")
            .status(TaskStatus::InProgress)
            .priority(1)
            .agent("agent-1")
            .depend_on("fm-x")
            .depend_on("fm-y")
            .build();
        source.insert_task(&task).unwrap();

        let loaded = source.get_task("fm-a").unwrap();
        assert_eq!(loaded.id, "fm-a");
        assert_eq!(loaded.title, "Ship it");
        assert_eq!(loaded.description, "all the details");
        assert_eq!(loaded.status, TaskStatus::InProgress);
        assert_eq!(loaded.priority, 1);
        assert_eq!(loaded.agent.as_deref(), Some("agent-1"));
        assert_eq!(loaded.depends_on, vec!["fm-x", "fm-y"]);
    }

    #[test]
    fn get_unknown_task_is_not_found() {
        let source = SqliteSource::open_in_memory().unwrap();
        let err = source.get_task("fm-gone").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let source = SqliteSource::open_in_memory().unwrap();
        source.insert_task(&task("fm-a")).unwrap();
        let err = source.insert_task(&task("fm-a")).unwrap_err();
        assert!(matches!(err, SourceError::Duplicate { .. }));
    }

    #[test]
    fn get_tasks_orders_by_creation() {
        let now = Utc::now();
        let source = SqliteSource::open_in_memory().unwrap();
        for (id, minutes_ago) in [("fm-b", 5), ("fm-c", 1), ("fm-a", 10)] {
            source
                .insert_task(
                    &TaskBuilder::new(id)
                        .id(id)
                        .created_at(now - Duration::minutes(minutes_ago))
                        .build(),
                )
                .unwrap();
        }
        assert_eq!(
            ids(&source.get_tasks_impl().unwrap()),
            vec!["fm-a", "fm-b", "fm-c"]
        );
    }

    #[test]
    fn ready_excludes_claimed_and_blocked() {
        let source = SqliteSource::open_in_memory().unwrap();
        source.insert_task(&task("fm-a")).unwrap();
        source
            .insert_task(&TaskBuilder::new("blocked").id("fm-b").depend_on("fm-a").build())
            .unwrap();
        source
            .insert_task(&TaskBuilder::new("claimed").id("fm-c").agent("agent-1").build())
            .unwrap();

        assert_eq!(ids(&source.get_ready_tasks_impl().unwrap()), vec!["fm-a"]);

        source.update_status_impl("fm-a", TaskStatus::Done).unwrap();
        assert_eq!(ids(&source.get_ready_tasks_impl().unwrap()), vec!["fm-b"]);
    }

    #[test]
    fn ready_orders_by_priority_then_age() {
        let now = Utc::now();
        let source = SqliteSource::open_in_memory().unwrap();
        source
            .insert_task(
                &TaskBuilder::new("old low-pri")
                    .id("fm-a")
                    .priority(3)
                    .created_at(now - Duration::minutes(10))
                    .build(),
            )
            .unwrap();
        source
            .insert_task(
                &TaskBuilder::new("new high-pri")
                    .id("fm-b")
                    .priority(0)
                    .created_at(now)
                    .build(),
            )
            .unwrap();
        source
            .insert_task(
                &TaskBuilder::new("old high-pri")
                    .id("fm-c")
                    .priority(0)
                    .created_at(now - Duration::minutes(5))
                    .build(),
            )
            .unwrap();

        assert_eq!(
            ids(&source.get_ready_tasks_impl().unwrap()),
            vec!["fm-c", "fm-b", "fm-a"]
        );
    }

    #[test]
    fn unknown_dependency_blocks() {
        let source = SqliteSource::open_in_memory().unwrap();
        source
            .insert_task(&TaskBuilder::new("dangling").id("fm-a").depend_on("fm-gone").build())
            .unwrap();
        assert!(source.get_ready_tasks_impl().unwrap().is_empty());
    }

    #[test]
    fn add_dependency_requires_the_task() {
        let source = SqliteSource::open_in_memory().unwrap();
        source.insert_task(&task("fm-a")).unwrap();

        source.add_dependency("fm-a", "fm-b").unwrap();
        assert!(source.get_ready_tasks_impl().unwrap().is_empty());

        let err = source.add_dependency("fm-gone", "fm-a").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn claim_is_exclusive() {
        let source = SqliteSource::open_in_memory().unwrap();
        source.insert_task(&task("fm-a")).unwrap();

        assert!(source.claim_task_impl("fm-a", "agent-1").unwrap());
        assert!(!source.claim_task_impl("fm-a", "agent-2").unwrap());
        // Re-claiming by the holder is still a lost claim.
        assert!(!source.claim_task_impl("fm-a", "agent-1").unwrap());

        let loaded = source.get_task("fm-a").unwrap();
        assert_eq!(loaded.agent.as_deref(), Some("agent-1"));
    }

    #[test]
    fn claim_unknown_task_is_not_found() {
        let source = SqliteSource::open_in_memory().unwrap();
        let err = source.claim_task_impl("fm-gone", "agent-1").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn claimed_tasks_stay_listed() {
        let source = SqliteSource::open_in_memory().unwrap();
        source.insert_task(&task("fm-a")).unwrap();
        source.claim_task_impl("fm-a", "agent-1").unwrap();

        assert_eq!(source.get_tasks_impl().unwrap().len(), 1);
        assert!(source.get_ready_tasks_impl().unwrap().is_empty());
    }

    #[test]
    fn update_status_round_trips_unknown_statuses() {
        let source = SqliteSource::open_in_memory().unwrap();
        source.insert_task(&task("fm-a")).unwrap();
        source
            .update_status_impl("fm-a", TaskStatus::Other("triage".into()))
            .unwrap();

        let loaded = source.get_task("fm-a").unwrap();
        assert_eq!(loaded.status, TaskStatus::Other("triage".into()));
    }

    #[test]
    fn update_status_unknown_task_is_not_found() {
        let source = SqliteSource::open_in_memory().unwrap();
        let err = source
            .update_status_impl("fm-gone", TaskStatus::Done)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn concurrent_claims_have_one_winner() {
        use std::sync::Arc;

        let source = Arc::new(SqliteSource::open_in_memory().unwrap());
        source.insert_task(&task("fm-a")).unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let source = Arc::clone(&source);
            handles.push(std::thread::spawn(move || {
                source.claim_task_impl("fm-a", &format!("agent-{i}")).unwrap()
            }));
        }
        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(wins, 1);
    }
}
