//! Backend that shells out to the real git binary.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::backend::GitBackend;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs repository operations as `git` subprocesses.
///
/// Each call blocks until the command finishes. With a timeout set the
/// child is killed at the deadline and the operation reports failure;
/// without one, commands run for as long as git needs.
#[derive(Debug, Clone)]
pub struct LiveBackend {
    binary: String,
    timeout: Option<Duration>,
}

impl LiveBackend {
    pub fn new() -> Self {
        LiveBackend {
            binary: "git".to_string(),
            timeout: None,
        }
    }

    /// Uses `binary` instead of `git` from `PATH`.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Kills commands still running after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn run(&self, mut cmd: Command) -> bool {
        debug!(command = ?cmd, "running git");
        match self.timeout {
            None => match cmd.output() {
                Ok(output) => {
                    if output.status.success() {
                        true
                    } else {
                        let stderr = String::from_utf8_lossy(&output.stderr);
                        warn!(
                            command = ?cmd,
                            code = ?output.status.code(),
                            stderr = %stderr.trim(),
                            "git command failed"
                        );
                        false
                    }
                }
                Err(e) => {
                    warn!(command = ?cmd, error = %e, "failed to spawn git");
                    false
                }
            },
            Some(limit) => self.run_with_deadline(cmd, limit),
        }
    }

    fn run_with_deadline(&self, mut cmd: Command, limit: Duration) -> bool {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(command = ?cmd, error = %e, "failed to spawn git");
                return false;
            }
        };

        // Drain stderr on a separate thread so a chatty child cannot
        // block on a full pipe while we poll for exit.
        let stderr = child.stderr.take();
        let reader = thread::spawn(move || {
            let mut buf = String::new();
            if let Some(mut pipe) = stderr {
                let _ = pipe.read_to_string(&mut buf);
            }
            buf
        });

        let deadline = Instant::now() + limit;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    break None;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    warn!(command = ?cmd, error = %e, "failed to poll git");
                    let _ = child.kill();
                    let _ = child.wait();
                    break None;
                }
            }
        };
        let stderr_text = reader.join().unwrap_or_default();

        match status {
            Some(status) if status.success() => true,
            Some(status) => {
                warn!(
                    command = ?cmd,
                    code = ?status.code(),
                    stderr = %stderr_text.trim(),
                    "git command failed"
                );
                false
            }
            None => {
                warn!(
                    command = ?cmd,
                    timeout_secs = limit.as_secs(),
                    "git command did not finish in time"
                );
                false
            }
        }
    }
}

impl Default for LiveBackend {
    fn default() -> Self {
        LiveBackend::new()
    }
}

impl GitBackend for LiveBackend {
    fn clone_repo(&self, url: &str, path: &Path) -> bool {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("clone").arg(url).arg(path);
        self.run(cmd)
    }

    fn create_worktree(&self, repo: &Path, branch: &str, target: &Path) -> bool {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-C")
            .arg(repo)
            .args(["worktree", "add"])
            .arg(target)
            .args(["-b", branch]);
        self.run(cmd)
    }

    fn fetch(&self, repo: &Path) -> bool {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-C").arg(repo).args(["fetch", "--all"]);
        self.run(cmd)
    }

    fn checkout(&self, repo: &Path, branch: &str) -> bool {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-C").arg(repo).arg("checkout").arg(branch);
        self.run(cmd)
    }

    fn ensure_local(&self, repo: Option<&str>) -> Option<PathBuf> {
        let reference = repo?;
        if looks_like_remote(reference) {
            debug!(reference, "reference is a remote url, not a local path");
            return None;
        }
        let path = PathBuf::from(reference);
        // A `.git` entry may be a directory or, in worktrees and
        // submodules, a file pointing at the real git dir.
        if path.is_dir() && path.join(".git").exists() {
            debug!(?path, "resolved local repository");
            return Some(path);
        }
        debug!(?path, "not a local repository");
        None
    }
}

fn looks_like_remote(reference: &str) -> bool {
    reference.starts_with("https://")
        || reference.starts_with("http://")
        || reference.starts_with("git@")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn init_repo(dir: &Path) {
        let status = Command::new("git")
            .args(["init", "-q", "-b", "main"])
            .arg(dir)
            .status()
            .expect("git should be available");
        assert!(status.success());
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args([
                "-c",
                "user.name=test",
                "-c",
                "user.email=test@example.com",
                "commit",
                "--allow-empty",
                "-q",
                "-m",
                "init",
            ])
            .status()
            .expect("git should be available");
        assert!(status.success());
    }

    #[test]
    fn test_ensure_local_without_reference() {
        assert_eq!(LiveBackend::new().ensure_local(None), None);
        let with_timeout = LiveBackend::new().with_timeout(Duration::from_secs(1));
        assert_eq!(with_timeout.ensure_local(None), None);
    }

    #[test]
    fn test_ensure_local_rejects_remote_urls() {
        let backend = LiveBackend::new();
        assert_eq!(backend.ensure_local(Some("https://example.com/a.git")), None);
        assert_eq!(backend.ensure_local(Some("http://example.com/a.git")), None);
        assert_eq!(backend.ensure_local(Some("git@example.com:a/b.git")), None);
    }

    #[test]
    fn test_ensure_local_rejects_missing_path() {
        let backend = LiveBackend::new();
        assert_eq!(backend.ensure_local(Some("/no/such/directory")), None);
    }

    #[test]
    fn test_ensure_local_rejects_plain_directory() {
        let dir = TempDir::new().unwrap();
        let reference = dir.path().to_string_lossy().to_string();
        assert_eq!(LiveBackend::new().ensure_local(Some(&reference)), None);
    }

    #[test]
    fn test_ensure_local_accepts_git_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let reference = dir.path().to_string_lossy().to_string();
        assert_eq!(
            LiveBackend::new().ensure_local(Some(&reference)),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_ensure_local_accepts_gitlink_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".git"), "gitdir: /elsewhere\n").unwrap();
        let reference = dir.path().to_string_lossy().to_string();
        assert_eq!(
            LiveBackend::new().ensure_local(Some(&reference)),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_fetch_fails_outside_a_repository() {
        let dir = TempDir::new().unwrap();
        assert!(!LiveBackend::new().fetch(dir.path()));
    }

    #[test]
    fn test_fetch_succeeds_in_a_repository() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        // No remotes configured; fetch --all is a successful no-op.
        assert!(LiveBackend::new().fetch(dir.path()));
        assert!(
            LiveBackend::new()
                .with_timeout(Duration::from_secs(30))
                .fetch(dir.path())
        );
    }

    #[test]
    fn test_clone_from_local_source() {
        let source = TempDir::new().unwrap();
        init_repo(source.path());
        let dest = TempDir::new().unwrap();
        let target = dest.path().join("copy");

        let url = source.path().to_string_lossy().to_string();
        assert!(LiveBackend::new().clone_repo(&url, &target));
        assert!(target.join(".git").exists());
    }

    #[test]
    fn test_clone_fails_for_missing_source() {
        let dest = TempDir::new().unwrap();
        let target = dest.path().join("copy");
        assert!(!LiveBackend::new().clone_repo("/no/such/source", &target));
    }

    #[test]
    fn test_create_worktree_and_checkout() {
        let repo = TempDir::new().unwrap();
        init_repo(repo.path());
        let trees = TempDir::new().unwrap();
        let target = trees.path().join("feat");

        let backend = LiveBackend::new();
        assert!(backend.create_worktree(repo.path(), "feat", &target));
        assert!(target.join(".git").exists());
        // The new branch now exists, so a plain checkout of it works.
        assert!(backend.checkout(repo.path(), "main"));
        assert!(!backend.checkout(repo.path(), "no-such-branch"));
    }

    #[test]
    fn test_missing_binary_reports_failure() {
        let dir = TempDir::new().unwrap();
        let backend = LiveBackend::new().with_binary("git-binary-that-does-not-exist");
        assert!(!backend.fetch(dir.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_slow_commands() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("slow-git");
        std::fs::write(&script, "#!/bin/sh\nsleep 10\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let backend = LiveBackend::new()
            .with_binary(script.to_string_lossy().to_string())
            .with_timeout(Duration::from_millis(200));

        let start = Instant::now();
        assert!(!backend.fetch(dir.path()));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
