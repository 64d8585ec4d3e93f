//! In-memory task source for tests and ephemeral runs.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use foreman_core::{Task, TaskStatus};

use crate::error::{Result, SourceError};
use crate::traits::TaskSource;

/// A [`TaskSource`] backed by a plain `Vec` behind a mutex.
///
/// Tasks keep their insertion order, which doubles as creation order.
/// Claims are atomic because every operation runs under the one lock.
#[derive(Debug, Default)]
pub struct MemorySource {
    tasks: Mutex<Vec<Task>>,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource::default()
    }

    /// Adds a task, rejecting ids that are already present.
    pub fn insert(&self, task: Task) -> Result<()> {
        let mut tasks = self.lock()?;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(SourceError::duplicate(task.id));
        }
        tasks.push(task);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Task>>> {
        self.tasks
            .lock()
            .map_err(|e| SourceError::Connection(format!("mutex poisoned: {e}")))
    }
}

/// An unknown dependency id never counts as done.
fn deps_done(tasks: &[Task], task: &Task) -> bool {
    task.depends_on
        .iter()
        .all(|dep_id| tasks.iter().any(|t| t.id == *dep_id && t.status == TaskStatus::Done))
}

impl TaskSource for MemorySource {
    fn get_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.lock()?.clone())
    }

    fn get_ready_tasks(&self) -> Result<Vec<Task>> {
        let tasks = self.lock()?;
        let mut ready: Vec<Task> = tasks
            .iter()
            .filter(|t| {
                t.status == TaskStatus::Pending && t.agent.is_none() && deps_done(&tasks, t)
            })
            .cloned()
            .collect();
        ready.sort_by(|a, b| {
            (a.priority, a.created_at, &a.id).cmp(&(b.priority, b.created_at, &b.id))
        });
        Ok(ready)
    }

    fn update_status(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        let mut tasks = self.lock()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| SourceError::not_found(task_id))?;
        task.status = status;
        task.updated_at = Utc::now();
        Ok(())
    }

    fn claim_task(&self, task_id: &str, agent_id: &str) -> Result<bool> {
        let mut tasks = self.lock()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| SourceError::not_found(task_id))?;
        if task.agent.is_some() {
            return Ok(false);
        }
        task.agent = Some(agent_id.to_string());
        task.updated_at = Utc::now();
        Ok(true)
    }
}
