//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the state every command handler needs:
//! resolved actor name, effective global flags, and helpers for finding
//! the project directory and opening the task database.

use std::env;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};

use foreman_config::config::{self, ForemanConfig};
use foreman_config::foreman_dir;
use foreman_sources::SqliteSource;

use crate::cli::GlobalArgs;

/// Name of the task database file inside `.foreman/`.
pub const DB_FILE_NAME: &str = "foreman.db";

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
/// The `json` and `dry_run` fields are already merged with the project
/// config, so handlers read them directly.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Database file override from `--db`.
    pub db_path: Option<PathBuf>,

    /// Actor name used as the default claiming agent.
    pub actor: String,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Render repository commands instead of running them.
    pub dry_run: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// Project config supplies defaults for flags the user did not pass.
    /// Config errors are ignored here; commands that genuinely need the
    /// config reload it through [`RuntimeContext::load_config`] and report
    /// them properly.
    pub fn from_global_args(global: &GlobalArgs) -> Self {
        let config = find_foreman_dir_here()
            .and_then(|dir| config::load_config(&dir).ok())
            .unwrap_or_default();

        let actor = resolve_actor(global.actor.as_deref(), config.actor.as_deref());

        Self {
            db_path: global.db.as_ref().map(PathBuf::from),
            actor,
            json: global.json || config.json,
            dry_run: global.dry_run || config.dry_run,
            verbose: global.verbose,
            quiet: global.quiet,
        }
    }

    /// Load the project configuration, or defaults outside a project.
    pub fn load_config(&self) -> Result<ForemanConfig> {
        match find_foreman_dir_here() {
            Some(dir) => config::load_config(&dir)
                .with_context(|| format!("failed to load config from {}", dir.display())),
            None => Ok(ForemanConfig::default()),
        }
    }

    /// Returns the resolved database file path.
    ///
    /// Priority: `--db` flag > `db` key in config > `.foreman/foreman.db`.
    pub fn resolve_db_file(&self, config: &ForemanConfig) -> Result<PathBuf> {
        if let Some(ref p) = self.db_path {
            return Ok(p.clone());
        }

        let dir = find_foreman_dir_here()
            .context("no foreman project found. Run 'foreman init' to create one.")?;

        match &config.db {
            Some(db) => {
                let p = PathBuf::from(db);
                // Relative config paths resolve against the .foreman directory.
                if p.is_absolute() {
                    Ok(p)
                } else {
                    Ok(dir.join(p))
                }
            }
            None => Ok(dir.join(DB_FILE_NAME)),
        }
    }

    /// Open the project task database.
    pub fn open_source(&self) -> Result<SqliteSource> {
        let config = self.load_config()?;
        let db_file = self.resolve_db_file(&config)?;

        if !db_file.exists() {
            bail!(
                "no task database found at {}\nHint: run 'foreman init' to create a database",
                db_file.display()
            );
        }

        Ok(SqliteSource::open(&db_file)?)
    }
}

/// Discover the `.foreman` directory by walking up from the current directory.
fn find_foreman_dir_here() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    foreman_dir::find_foreman_dir(&cwd)
}

/// Resolves the actor name using the priority chain.
///
/// Priority: explicit flag (clap also feeds `$FOREMAN_ACTOR` into it) >
/// `actor` key in config > git config user.name > USER env > "unknown".
fn resolve_actor(flag_value: Option<&str>, config_value: Option<&str>) -> String {
    // 1. Explicit flag value
    if let Some(actor) = flag_value {
        if !actor.is_empty() {
            return actor.to_string();
        }
    }

    // 2. Config file
    if let Some(actor) = config_value {
        if !actor.is_empty() {
            return actor.to_string();
        }
    }

    // 3. git config user.name
    if let Ok(output) = Command::new("git").args(["config", "user.name"]).output() {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
    }

    // 4. USER env (Unix) or USERNAME env (Windows)
    if let Ok(user) = env::var("USER").or_else(|_| env::var("USERNAME")) {
        if !user.is_empty() {
            return user;
        }
    }

    // 5. Fallback
    "unknown".to_string()
}
