//! The task source trait.

use foreman_core::{Task, TaskStatus};

use crate::error::Result;

/// A queue of tasks handed out to agents.
///
/// The contract is deliberately small so orchestration code can swap
/// sources freely. Implementations must be shareable across threads,
/// and [`TaskSource::claim_task`] must be atomic: when several agents
/// race for the same task, exactly one sees `Ok(true)`.
pub trait TaskSource: Send + Sync {
    /// All tasks, oldest first.
    fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Tasks an agent could start right now.
    ///
    /// A task is ready when it is pending, unclaimed, and every task it
    /// depends on is done. Results come back highest priority first
    /// (lower number wins), oldest first within a priority.
    fn get_ready_tasks(&self) -> Result<Vec<Task>>;

    /// Sets the status of an existing task.
    fn update_status(&self, task_id: &str, status: TaskStatus) -> Result<()>;

    /// Claims a task for `agent_id`.
    ///
    /// Returns `Ok(true)` when the claim won and `Ok(false)` when some
    /// agent already holds the task, no matter which one. Claiming a
    /// task that does not exist is [`NotFound`](crate::SourceError::NotFound).
    fn claim_task(&self, task_id: &str, agent_id: &str) -> Result<bool>;
}
