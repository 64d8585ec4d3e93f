//! Source error types.

/// Errors that can occur while reading or mutating a task source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No task with the given id exists.
    #[error("task not found: {task_id}")]
    NotFound {
        /// The identifier that was looked up.
        task_id: String,
    },

    /// A task with the given id already exists.
    #[error("task already exists: {task_id}")]
    Duplicate {
        /// The identifier that collided.
        task_id: String,
    },

    /// Failed to establish or maintain a connection to the source.
    #[error("connection error: {0}")]
    Connection(String),

    /// A schema migration failed.
    #[error("migration {name} failed: {reason}")]
    Migration {
        /// Name of the migration that failed.
        name: String,
        /// Underlying error description.
        reason: String,
    },

    /// A raw SQLite query error.
    #[error("query error: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Convenience alias used throughout the sources crate.
pub type Result<T> = std::result::Result<T, SourceError>;

impl SourceError {
    // -- Constructors --------------------------------------------------------

    /// Creates a [`SourceError::NotFound`] for the given task id.
    pub fn not_found(task_id: impl Into<String>) -> Self {
        Self::NotFound {
            task_id: task_id.into(),
        }
    }

    /// Creates a [`SourceError::Duplicate`] for the given task id.
    pub fn duplicate(task_id: impl Into<String>) -> Self {
        Self::Duplicate {
            task_id: task_id.into(),
        }
    }

    // -- Predicates ----------------------------------------------------------

    /// Returns `true` if this is a [`SourceError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the error is transient and the operation may succeed
    /// on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
