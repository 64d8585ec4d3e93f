//! Backend that records calls instead of running git.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::backend::{GitBackend, Operation};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Test double that logs every call in order.
///
/// All operations succeed and are appended to a per-operation log. A
/// single failure switch makes exactly one operation report failure;
/// failed calls are not logged, mirroring work that never happened.
/// `ensure_local` answers from a fixed reference map instead of
/// touching the filesystem.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    cloned: Mutex<Vec<(String, PathBuf)>>,
    worktrees: Mutex<Vec<(PathBuf, String, PathBuf)>>,
    fetched: Mutex<Vec<PathBuf>>,
    checkouts: Mutex<Vec<(PathBuf, String)>>,
    fail_on: Option<Operation>,
    local_repos: HashMap<String, PathBuf>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        RecordingBackend::default()
    }

    /// Makes `operation` fail; every other operation keeps succeeding.
    pub fn failing_on(mut self, operation: Operation) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Registers a reference that `ensure_local` resolves to `path`.
    pub fn with_local_repo(mut self, reference: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.local_repos.insert(reference.into(), path.into());
        self
    }

    fn fails(&self, operation: Operation) -> bool {
        self.fail_on == Some(operation)
    }

    // ===== Recorded calls =====

    /// `(url, path)` pairs passed to `clone_repo`, in call order.
    pub fn cloned(&self) -> Vec<(String, PathBuf)> {
        lock(&self.cloned).clone()
    }

    /// `(repo, branch, target)` triples passed to `create_worktree`.
    pub fn worktrees(&self) -> Vec<(PathBuf, String, PathBuf)> {
        lock(&self.worktrees).clone()
    }

    /// Repos passed to `fetch`, in call order.
    pub fn fetched(&self) -> Vec<PathBuf> {
        lock(&self.fetched).clone()
    }

    /// `(repo, branch)` pairs passed to `checkout`.
    pub fn checkouts(&self) -> Vec<(PathBuf, String)> {
        lock(&self.checkouts).clone()
    }
}

impl GitBackend for RecordingBackend {
    fn clone_repo(&self, url: &str, path: &Path) -> bool {
        if self.fails(Operation::Clone) {
            return false;
        }
        lock(&self.cloned).push((url.to_string(), path.to_path_buf()));
        true
    }

    fn create_worktree(&self, repo: &Path, branch: &str, target: &Path) -> bool {
        if self.fails(Operation::CreateWorktree) {
            return false;
        }
        lock(&self.worktrees).push((repo.to_path_buf(), branch.to_string(), target.to_path_buf()));
        true
    }

    fn fetch(&self, repo: &Path) -> bool {
        if self.fails(Operation::Fetch) {
            return false;
        }
        lock(&self.fetched).push(repo.to_path_buf());
        true
    }

    fn checkout(&self, repo: &Path, branch: &str) -> bool {
        if self.fails(Operation::Checkout) {
            return false;
        }
        lock(&self.checkouts).push((repo.to_path_buf(), branch.to_string()));
        true
    }

    fn ensure_local(&self, repo: Option<&str>) -> Option<PathBuf> {
        let reference = repo?;
        if self.fails(Operation::EnsureLocal) {
            return None;
        }
        self.local_repos.get(reference).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operations_succeed_by_default() {
        let backend = RecordingBackend::new();
        assert!(backend.clone_repo("https://example.com/a.git", Path::new("/tmp/a")));
        assert!(backend.create_worktree(Path::new("/tmp/a"), "feat", Path::new("/tmp/wt")));
        assert!(backend.fetch(Path::new("/tmp/a")));
        assert!(backend.checkout(Path::new("/tmp/a"), "main"));
    }

    #[test]
    fn test_records_calls_in_order() {
        let backend = RecordingBackend::new();
        backend.clone_repo("https://example.com/a.git", Path::new("/tmp/a"));
        backend.clone_repo("https://example.com/b.git", Path::new("/tmp/b"));
        backend.fetch(Path::new("/tmp/a"));
        backend.checkout(Path::new("/tmp/a"), "main");
        backend.create_worktree(Path::new("/tmp/a"), "feat", Path::new("/tmp/wt"));

        assert_eq!(
            backend.cloned(),
            vec![
                ("https://example.com/a.git".to_string(), PathBuf::from("/tmp/a")),
                ("https://example.com/b.git".to_string(), PathBuf::from("/tmp/b")),
            ]
        );
        assert_eq!(backend.fetched(), vec![PathBuf::from("/tmp/a")]);
        assert_eq!(
            backend.checkouts(),
            vec![(PathBuf::from("/tmp/a"), "main".to_string())]
        );
        assert_eq!(
            backend.worktrees(),
            vec![(
                PathBuf::from("/tmp/a"),
                "feat".to_string(),
                PathBuf::from("/tmp/wt"),
            )]
        );
    }

    #[test]
    fn test_failure_switch_blocks_only_that_operation() {
        let backend = RecordingBackend::new().failing_on(Operation::Fetch);

        assert!(backend.clone_repo("https://example.com/a.git", Path::new("/tmp/a")));
        assert!(!backend.fetch(Path::new("/tmp/a")));
        assert!(backend.checkout(Path::new("/tmp/a"), "main"));

        assert_eq!(backend.cloned().len(), 1);
        assert!(backend.fetched().is_empty());
        assert_eq!(backend.checkouts().len(), 1);
    }

    #[test]
    fn test_failed_calls_are_not_recorded() {
        let backend = RecordingBackend::new().failing_on(Operation::Clone);
        assert!(!backend.clone_repo("https://example.com/a.git", Path::new("/tmp/a")));
        assert!(backend.cloned().is_empty());
    }

    #[test]
    fn test_each_operation_can_fail() {
        let ops = [
            Operation::Clone,
            Operation::CreateWorktree,
            Operation::Fetch,
            Operation::Checkout,
        ];
        for op in ops {
            let backend = RecordingBackend::new().failing_on(op);
            let results = [
                (
                    Operation::Clone,
                    backend.clone_repo("https://example.com/a.git", Path::new("/tmp/a")),
                ),
                (
                    Operation::CreateWorktree,
                    backend.create_worktree(Path::new("/tmp/a"), "b", Path::new("/tmp/wt")),
                ),
                (Operation::Fetch, backend.fetch(Path::new("/tmp/a"))),
                (
                    Operation::Checkout,
                    backend.checkout(Path::new("/tmp/a"), "b"),
                ),
            ];
            for (ran, ok) in results {
                assert_eq!(ok, ran != op, "failing_on({op}) vs {ran}");
            }
        }
    }

    #[test]
    fn test_ensure_local_resolves_from_the_map() {
        let backend = RecordingBackend::new().with_local_repo("app", "/srv/app");

        assert_eq!(backend.ensure_local(Some("app")), Some(PathBuf::from("/srv/app")));
        assert_eq!(backend.ensure_local(Some("unknown")), None);
        assert_eq!(backend.ensure_local(None), None);
    }

    #[test]
    fn test_ensure_local_failure_switch() {
        let backend = RecordingBackend::new()
            .with_local_repo("app", "/srv/app")
            .failing_on(Operation::EnsureLocal);
        assert_eq!(backend.ensure_local(Some("app")), None);

        // A switch on another operation leaves resolution alone.
        let backend = RecordingBackend::new()
            .with_local_repo("app", "/srv/app")
            .failing_on(Operation::Fetch);
        assert_eq!(backend.ensure_local(Some("app")), Some(PathBuf::from("/srv/app")));
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let backend = Arc::new(RecordingBackend::new());
        let mut handles = Vec::new();
        for i in 0..4 {
            let backend = Arc::clone(&backend);
            handles.push(std::thread::spawn(move || {
                backend.fetch(Path::new(&format!("/tmp/repo-{i}")));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(backend.fetched().len(), 4);
    }
}
