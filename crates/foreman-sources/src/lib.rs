//! Task sources for foreman.
//!
//! A task source is anything that can answer "what work exists" and
//! "what work is ready", and that can hand a task to exactly one agent
//! at a time. The [`TaskSource`] trait captures that contract;
//! [`MemorySource`] and [`SqliteSource`] implement it. Orchestration
//! code should accept `&dyn TaskSource` so the backing store stays
//! swappable.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use error::{Result, SourceError};
pub use memory::MemorySource;
pub use sqlite::SqliteSource;
pub use traits::TaskSource;

use foreman_core::{Task, TaskStatus};

impl TaskSource for SqliteSource {
    fn get_tasks(&self) -> Result<Vec<Task>> {
        self.get_tasks_impl()
    }

    fn get_ready_tasks(&self) -> Result<Vec<Task>> {
        self.get_ready_tasks_impl()
    }

    fn update_status(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        self.update_status_impl(task_id, status)
    }

    fn claim_task(&self, task_id: &str, agent_id: &str) -> Result<bool> {
        self.claim_task_impl(task_id, agent_id)
    }
}
