//! Task record and builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::TaskStatus;

/// Priority assigned when none is given. Lower numbers sort first.
pub const DEFAULT_PRIORITY: i32 = 2;

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

fn is_empty_vec(v: &Vec<String>) -> bool {
    v.is_empty()
}

/// A unit of work handed out to agents.
///
/// Tasks are intentionally small: an id, a human title, a status, and
/// enough scheduling metadata (priority, dependencies, claiming agent)
/// for a source to answer "what is ready to work on".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "TaskStatus::is_default")]
    pub status: TaskStatus,

    // Priority is always serialized; 0 is a valid value.
    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Agent that claimed the task, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Ids of tasks that must be done before this one is ready.
    #[serde(default, skip_serializing_if = "is_empty_vec")]
    pub depends_on: Vec<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        let now = Utc::now();
        Task {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: DEFAULT_PRIORITY,
            agent: None,
            depends_on: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.agent.is_some()
    }
}

/// Fluent construction for [`Task`].
#[derive(Debug, Default)]
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        TaskBuilder {
            task: Task {
                title: title.into(),
                ..Default::default()
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.task.id = id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.task.description = description.into();
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.task.agent = Some(agent.into());
        self
    }

    pub fn depends_on(mut self, ids: Vec<String>) -> Self {
        self.task.depends_on = ids;
        self
    }

    /// Adds a single dependency, keeping any already set.
    pub fn depend_on(mut self, id: impl Into<String>) -> Self {
        self.task.depends_on.push(id.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.task.created_at = at;
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}
