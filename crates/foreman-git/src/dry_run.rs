//! Backend that renders commands without running them.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::backend::GitBackend;

/// Prints what would run instead of running it.
///
/// Every operation succeeds and appends the exact command line it
/// stands for. `ensure_local` cannot consult a real filesystem, so it
/// optimistically treats any given reference as a valid local path and
/// leaves an annotation in the log.
#[derive(Debug, Default)]
pub struct DryRunBackend {
    commands: Mutex<Vec<String>>,
}

impl DryRunBackend {
    pub fn new() -> Self {
        DryRunBackend::default()
    }

    /// The rendered command lines, in call order.
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, command: String) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}

impl GitBackend for DryRunBackend {
    fn clone_repo(&self, url: &str, path: &Path) -> bool {
        self.record(format!("git clone {} {}", url, path.display()));
        true
    }

    fn create_worktree(&self, repo: &Path, branch: &str, target: &Path) -> bool {
        self.record(format!(
            "git -C {} worktree add {} -b {}",
            repo.display(),
            target.display(),
            branch
        ));
        true
    }

    fn fetch(&self, repo: &Path) -> bool {
        self.record(format!("git -C {} fetch --all", repo.display()));
        true
    }

    fn checkout(&self, repo: &Path, branch: &str) -> bool {
        self.record(format!("git -C {} checkout {}", repo.display(), branch));
        true
    }

    fn ensure_local(&self, repo: Option<&str>) -> Option<PathBuf> {
        let reference = repo?;
        self.record(format!("# ensure_local: validate {reference}"));
        Some(PathBuf::from(reference))
    }
}
