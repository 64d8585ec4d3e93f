//! `foreman init` -- initialize a foreman project in the current directory.

use std::env;
use std::fs;

use anyhow::{bail, Context, Result};

use foreman_config::config::{save_config, ForemanConfig};
use foreman_config::foreman_dir::ensure_foreman_dir;
use foreman_core::ID_PREFIX;
use foreman_sources::SqliteSource;
use foreman_ui::styles::render_pass_icon;

use crate::cli::InitArgs;
use crate::context::{RuntimeContext, DB_FILE_NAME};

/// Default gitignore content for the `.foreman` directory.
const GITIGNORE_CONTENT: &str = r#"# Foreman database files
*.db
*.db-journal
*.db-wal
*.db-shm
"#;

/// Execute the `foreman init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;

    let foreman_dir = cwd.join(".foreman");

    // Safety guard: check for existing data unless --force
    if !args.force && foreman_dir.is_dir() {
        let db_path = foreman_dir.join(DB_FILE_NAME);
        if db_path.exists() {
            bail!(
                "Found existing database in {}\n\n\
                This workspace is already initialized.\n\n\
                To use the existing database:\n  \
                Just run foreman commands normally (e.g., foreman list)\n\n\
                To completely reinitialize (data loss warning):\n  \
                rm -rf {} && foreman init\n\n\
                Or use --force to re-initialize.",
                foreman_dir.display(),
                foreman_dir.display()
            );
        }
    }

    let foreman_dir = ensure_foreman_dir(&cwd)
        .with_context(|| format!("failed to create directory: {}", foreman_dir.display()))?;

    // Create .gitignore
    let gitignore_path = foreman_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(&gitignore_path, GITIGNORE_CONTENT).with_context(|| {
            format!("failed to create .gitignore: {}", gitignore_path.display())
        })?;
    }

    // Write a config file with the defaults spelled out, unless one exists
    let config_path = foreman_dir.join("config.yaml");
    if !config_path.exists() {
        save_config(&foreman_dir, &ForemanConfig::default())
            .with_context(|| format!("failed to create config: {}", config_path.display()))?;
    }

    // Opening the database creates it and applies the schema
    let db_path = foreman_dir.join(DB_FILE_NAME);
    SqliteSource::open(&db_path)
        .with_context(|| format!("failed to create database: {}", db_path.display()))?;

    if !ctx.quiet {
        println!();
        println!("{} foreman initialized", render_pass_icon());
        println!();
        println!("  Database: {}", db_path.display());
        println!("  Config:   {}", config_path.display());
        println!(
            "  Tasks will be named: {}-<hash> (e.g., {}-a3f2dd)",
            ID_PREFIX, ID_PREFIX
        );
        println!();
        println!("Run `foreman add \"My first task\"` to get started.");
        println!();
    }

    Ok(())
}
