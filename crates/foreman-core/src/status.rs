//! Task status enum.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of a task.
///
/// This is an open enum: unknown strings deserialize into
/// [`TaskStatus::Other`] rather than failing, so records written by a
/// newer foreman (or by hand) still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Not started. The default for new tasks.
    Pending,
    /// Picked up by an agent and actively being worked.
    InProgress,
    /// Finished successfully.
    Done,
    /// Finished unsuccessfully.
    Failed,
    /// Any status string not listed above.
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
            TaskStatus::Other(s) => s,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }

    /// Whether the task has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TaskStatus::from(s))
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => TaskStatus::Pending,
            "in_progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            "failed" => TaskStatus::Failed,
            other => TaskStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        TaskStatus::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert!(TaskStatus::Pending.is_default());
        assert!(!TaskStatus::Done.is_default());
    }

    #[test]
    fn as_str_matches_wire_names() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
        assert_eq!(TaskStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn unknown_status_round_trips_through_other() {
        let status = TaskStatus::from("triage");
        assert_eq!(status, TaskStatus::Other("triage".to_string()));
        assert_eq!(status.as_str(), "triage");

        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"triage\"");
        let back: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }

    #[test]
    fn serde_round_trip_known_variants() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Done,
            TaskStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: TaskStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn terminal_states() {
        assert!(TaskStatus::Done.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert!(!TaskStatus::Other("triage".into()).is_terminal());
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
    }
}
