//! `foreman repo` -- prepare repositories and worktrees for agents.
//!
//! Each subcommand maps onto one [`GitBackend`] operation. With
//! `--dry-run` the commands are rendered instead of executed, which is
//! how an orchestrating agent can preview what foreman would do.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::debug;

use foreman_git::{DryRunBackend, GitBackend, LiveBackend};
use foreman_ui::styles::{render_fail_icon, render_pass_icon};

use crate::cli::{RepoArgs, RepoCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// What running one repo subcommand produced.
enum Outcome {
    /// An operation that either completed or did not.
    Completed {
        op: &'static str,
        ok: bool,
        detail: String,
    },
    /// A `locate` lookup and its answer.
    Resolved {
        reference: Option<String>,
        path: Option<PathBuf>,
    },
}

/// Execute the `foreman repo` command.
pub fn run(ctx: &RuntimeContext, args: &RepoArgs) -> Result<()> {
    let config = ctx.load_config()?;

    if ctx.dry_run {
        let backend = DryRunBackend::new();
        let _ = apply(&backend, &args.command);
        let plan = backend.commands();
        if ctx.json {
            output_json(&serde_json::json!({
                "dry_run": true,
                "commands": plan,
            }));
        } else {
            for line in &plan {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    let mut backend = LiveBackend::new().with_binary(config.git.binary.clone());
    if let Some(timeout) = config.git.timeout() {
        backend = backend.with_timeout(timeout);
    }
    debug!(binary = %config.git.binary, timeout = ?config.git.timeout(), "using live git backend");

    match apply(&backend, &args.command) {
        Outcome::Completed { op, ok, detail } => report(ctx, op, ok, &detail),
        Outcome::Resolved { reference, path } => report_locate(ctx, reference, path),
    }
}

/// Run one subcommand against a backend.
///
/// Takes the backend as a trait object so the dry-run and live paths
/// share this dispatch.
fn apply(backend: &dyn GitBackend, command: &RepoCommands) -> Outcome {
    match command {
        RepoCommands::Clone(a) => Outcome::Completed {
            op: "clone",
            ok: backend.clone_repo(&a.url, Path::new(&a.path)),
            detail: format!("Cloned {} into {}", a.url, a.path),
        },
        RepoCommands::Worktree(a) => Outcome::Completed {
            op: "worktree add",
            ok: backend.create_worktree(Path::new(&a.repo), &a.branch, Path::new(&a.target)),
            detail: format!("Created worktree {} on new branch {}", a.target, a.branch),
        },
        RepoCommands::Fetch(a) => Outcome::Completed {
            op: "fetch",
            ok: backend.fetch(Path::new(&a.repo)),
            detail: format!("Fetched all remotes for {}", a.repo),
        },
        RepoCommands::Checkout(a) => Outcome::Completed {
            op: "checkout",
            ok: backend.checkout(Path::new(&a.repo), &a.branch),
            detail: format!("Checked out {} in {}", a.branch, a.repo),
        },
        RepoCommands::Locate(a) => Outcome::Resolved {
            reference: a.reference.clone(),
            path: backend.ensure_local(a.reference.as_deref()),
        },
    }
}

/// Report a completed operation. Failures exit non-zero; the live
/// backend has already logged the git stderr at warn level.
fn report(ctx: &RuntimeContext, op: &str, ok: bool, detail: &str) -> Result<()> {
    if ctx.json {
        output_json(&serde_json::json!({
            "operation": op,
            "ok": ok,
        }));
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    if !ok {
        eprintln!("{} git {} failed", render_fail_icon(), op);
        std::process::exit(1);
    }
    if !ctx.quiet {
        println!("{} {}", render_pass_icon(), detail);
    }
    Ok(())
}

/// Report a `locate` answer. The bare path on stdout keeps the command
/// usable from shell scripts.
fn report_locate(
    ctx: &RuntimeContext,
    reference: Option<String>,
    path: Option<PathBuf>,
) -> Result<()> {
    if ctx.json {
        output_json(&serde_json::json!({
            "reference": reference,
            "path": path.as_ref().map(|p| p.display().to_string()),
        }));
        if path.is_none() {
            std::process::exit(1);
        }
        return Ok(());
    }

    match path {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => match reference {
            Some(reference) => bail!("not a local repository: {}", reference),
            None => bail!("no repository reference given"),
        },
    }
}
