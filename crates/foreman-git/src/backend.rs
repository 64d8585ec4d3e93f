//! The backend trait and operation names.

use std::fmt;
use std::path::{Path, PathBuf};

/// The repository operations a backend supports.
///
/// Used wherever an operation is referred to by name, most notably the
/// failure switch on [`crate::RecordingBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Clone,
    CreateWorktree,
    Fetch,
    Checkout,
    EnsureLocal,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Clone => "clone",
            Operation::CreateWorktree => "create_worktree",
            Operation::Fetch => "fetch",
            Operation::Checkout => "checkout",
            Operation::EnsureLocal => "ensure_local",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source of git operations.
///
/// Implementations are interchangeable: callers hold a
/// `&dyn GitBackend` (or a `Box` of one) and stay agnostic about
/// whether commands really run. Methods return `true` on success and
/// `false` on any failure; none of them panic or return errors. The
/// trait is `Send + Sync` so a single backend can be shared across
/// worker threads.
pub trait GitBackend: Send + Sync {
    /// Clones `url` into `path`.
    ///
    /// Equivalent to `git clone <url> <path>`.
    fn clone_repo(&self, url: &str, path: &Path) -> bool;

    /// Creates a worktree of `repo` at `target` on a new branch.
    ///
    /// Equivalent to `git -C <repo> worktree add <target> -b <branch>`.
    fn create_worktree(&self, repo: &Path, branch: &str, target: &Path) -> bool;

    /// Fetches all remotes of `repo`.
    ///
    /// Equivalent to `git -C <repo> fetch --all`.
    fn fetch(&self, repo: &Path) -> bool;

    /// Checks out `branch` in `repo`.
    ///
    /// Equivalent to `git -C <repo> checkout <branch>`.
    fn checkout(&self, repo: &Path, branch: &str) -> bool;

    /// Resolves a repository reference to a local working copy.
    ///
    /// Returns the path when `repo` names a usable local repository and
    /// `None` otherwise, including when no reference was given at all.
    fn ensure_local(&self, repo: Option<&str>) -> Option<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::Clone.as_str(), "clone");
        assert_eq!(Operation::CreateWorktree.as_str(), "create_worktree");
        assert_eq!(Operation::Fetch.as_str(), "fetch");
        assert_eq!(Operation::Checkout.as_str(), "checkout");
        assert_eq!(Operation::EnsureLocal.as_str(), "ensure_local");
    }

    #[test]
    fn test_operation_display_matches_as_str() {
        assert_eq!(Operation::CreateWorktree.to_string(), "create_worktree");
    }
}
