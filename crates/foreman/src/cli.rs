//! Clap CLI definitions for the `foreman` command.
//!
//! This module defines the complete CLI structure using clap 4 derive macros.
//! Task commands are flat (`foreman add`, `foreman ready`, ...); repository
//! operations live under `foreman repo`.

use clap::{Args, Parser, Subcommand};

/// foreman -- task dispatch for coding agents.
///
/// Tracks tasks with dependencies, hands each one to exactly one agent,
/// and prepares git clones and worktrees for them to work in.
#[derive(Parser, Debug)]
#[command(
    name = "foreman",
    about = "Task dispatch for coding agents",
    long_about = "Tracks tasks with dependencies, hands each one to exactly one agent, and prepares git clones and worktrees for them to work in.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Database file path (default: auto-discover .foreman/foreman.db).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Actor name recorded as the claiming agent (default: $FOREMAN_ACTOR, git user.name, $USER).
    #[arg(long, global = true, env = "FOREMAN_ACTOR")]
    pub actor: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Print git commands instead of running them.
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // ===== Working With Tasks =====
    /// Add a new task.
    #[command(alias = "create")]
    Add(AddArgs),

    /// Show task details.
    #[command(alias = "view")]
    Show(ShowArgs),

    /// List tasks.
    List(ListArgs),

    /// Show ready work (pending, unclaimed, no unfinished dependencies).
    Ready(ReadyArgs),

    /// Claim a task for an agent.
    Claim(ClaimArgs),

    /// Get or set task status.
    #[command(name = "status")]
    StatusCmd(StatusCmdArgs),

    /// Manage dependencies between tasks.
    Dep(DepArgs),

    // ===== Repositories =====
    /// Prepare git repositories and worktrees for agents.
    Repo(RepoArgs),

    // ===== Setup & Configuration =====
    /// Initialize foreman in the current directory.
    Init(InitArgs),

    /// Print version information.
    Version,
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

/// Arguments for `foreman add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title.
    pub title: String,

    /// Task description.
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Priority (0-4 or P0-P4, lower is more urgent).
    #[arg(short = 'p', long, default_value = "2")]
    pub priority: String,

    /// Task ids this task depends on (comma-separated, repeatable).
    #[arg(long = "dep", num_args = 1..)]
    pub deps: Vec<String>,

    /// Explicit task ID (e.g. 'fm-a3f2dd').
    #[arg(long)]
    pub id: Option<String>,

    /// Output only the task ID (for scripting).
    #[arg(long)]
    pub silent: bool,
}

// ---------------------------------------------------------------------------
// Show
// ---------------------------------------------------------------------------

/// Arguments for `foreman show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Task ID.
    pub id: String,
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// Arguments for `foreman list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status (pending, in_progress, done, failed).
    #[arg(short = 's', long)]
    pub status: Option<String>,

    /// Filter by claiming agent.
    #[arg(short = 'a', long)]
    pub agent: Option<String>,
}

// ---------------------------------------------------------------------------
// Ready
// ---------------------------------------------------------------------------

/// Arguments for `foreman ready`.
#[derive(Args, Debug)]
pub struct ReadyArgs {
    /// Maximum tasks to show (0 for unlimited).
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,
}

// ---------------------------------------------------------------------------
// Claim
// ---------------------------------------------------------------------------

/// Arguments for `foreman claim`.
#[derive(Args, Debug)]
pub struct ClaimArgs {
    /// Task ID.
    pub id: String,

    /// Agent to claim for (default: the resolved actor).
    #[arg(short = 'a', long)]
    pub agent: Option<String>,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Arguments for `foreman status`.
#[derive(Args, Debug)]
pub struct StatusCmdArgs {
    /// Task ID.
    pub id: String,
    /// New status (if provided, sets the status; otherwise prints current status).
    pub new_status: Option<String>,
}

// ---------------------------------------------------------------------------
// Dep (subcommands)
// ---------------------------------------------------------------------------

/// Arguments for `foreman dep`.
#[derive(Args, Debug)]
pub struct DepArgs {
    #[command(subcommand)]
    pub command: DepCommands,
}

/// Dep subcommands.
#[derive(Subcommand, Debug)]
pub enum DepCommands {
    /// Add a dependency: the first task waits for the second.
    Add(DepAddArgs),
    /// List what a task depends on.
    List(DepListArgs),
}

/// Arguments for `foreman dep add`.
#[derive(Args, Debug)]
pub struct DepAddArgs {
    /// Task that has to wait.
    pub task_id: String,
    /// Task it waits for.
    pub depends_on_id: String,
}

/// Arguments for `foreman dep list`.
#[derive(Args, Debug)]
pub struct DepListArgs {
    /// Task ID.
    pub task_id: String,
}

// ---------------------------------------------------------------------------
// Repo (subcommands)
// ---------------------------------------------------------------------------

/// Arguments for `foreman repo`.
#[derive(Args, Debug)]
pub struct RepoArgs {
    #[command(subcommand)]
    pub command: RepoCommands,
}

/// Repo subcommands.
#[derive(Subcommand, Debug)]
pub enum RepoCommands {
    /// Clone a repository.
    Clone(RepoCloneArgs),
    /// Create a worktree on a new branch.
    Worktree(RepoWorktreeArgs),
    /// Fetch from all remotes.
    Fetch(RepoFetchArgs),
    /// Check out a branch.
    Checkout(RepoCheckoutArgs),
    /// Resolve a reference to a local repository path.
    Locate(RepoLocateArgs),
}

/// Arguments for `foreman repo clone`.
#[derive(Args, Debug)]
pub struct RepoCloneArgs {
    /// Repository URL or local path.
    pub url: String,
    /// Destination path.
    pub path: String,
}

/// Arguments for `foreman repo worktree`.
#[derive(Args, Debug)]
pub struct RepoWorktreeArgs {
    /// Path to the repository.
    pub repo: String,
    /// Branch to create.
    pub branch: String,
    /// Path for the new worktree.
    pub target: String,
}

/// Arguments for `foreman repo fetch`.
#[derive(Args, Debug)]
pub struct RepoFetchArgs {
    /// Path to the repository.
    pub repo: String,
}

/// Arguments for `foreman repo checkout`.
#[derive(Args, Debug)]
pub struct RepoCheckoutArgs {
    /// Path to the repository.
    pub repo: String,
    /// Branch to check out.
    pub branch: String,
}

/// Arguments for `foreman repo locate`.
#[derive(Args, Debug)]
pub struct RepoLocateArgs {
    /// Repository reference (path or URL). Omit to report "no reference".
    pub reference: Option<String>,
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Arguments for `foreman init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if data already exists.
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_version() {
        // Verify the parser doesn't panic for basic invocations
        let cli = Cli::try_parse_from(["foreman", "version"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn cli_parses_add() {
        let cli = Cli::try_parse_from(["foreman", "add", "Test task"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.title, "Test task");
                assert_eq!(args.priority, "2");
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn cli_global_flags() {
        let cli = Cli::try_parse_from(["foreman", "--json", "--verbose", "list"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert!(cli.global.json);
        assert!(cli.global.verbose);
    }

    #[test]
    fn cli_parses_dep_add() {
        let cli = Cli::try_parse_from(["foreman", "dep", "add", "fm-abc", "fm-def"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn cli_parses_repo_worktree() {
        let cli = Cli::try_parse_from(["foreman", "repo", "worktree", "/r", "feat", "/t"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        match cli.command {
            Some(Commands::Repo(args)) => match args.command {
                RepoCommands::Worktree(wt) => {
                    assert_eq!(wt.repo, "/r");
                    assert_eq!(wt.branch, "feat");
                    assert_eq!(wt.target, "/t");
                }
                _ => panic!("Expected Worktree subcommand"),
            },
            _ => panic!("Expected Repo command"),
        }
    }

    #[test]
    fn cli_dry_run_is_global() {
        let cli = Cli::try_parse_from(["foreman", "repo", "fetch", "/r", "--dry-run"]);
        assert!(cli.is_ok());
        assert!(cli.unwrap().global.dry_run);
    }

    #[test]
    fn cli_status_with_and_without_value() {
        let cli = Cli::try_parse_from(["foreman", "status", "fm-abc"]).unwrap();
        match cli.command {
            Some(Commands::StatusCmd(args)) => assert!(args.new_status.is_none()),
            _ => panic!("Expected StatusCmd"),
        }
        let cli = Cli::try_parse_from(["foreman", "status", "fm-abc", "done"]).unwrap();
        match cli.command {
            Some(Commands::StatusCmd(args)) => {
                assert_eq!(args.new_status.as_deref(), Some("done"));
            }
            _ => panic!("Expected StatusCmd"),
        }
    }
}
