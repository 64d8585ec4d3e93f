//! `foreman` -- hand tasks to coding agents.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn main() {
    // First Ctrl+C exits cleanly; a second one forces the exit code.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();
    let ctx = RuntimeContext::from_global_args(&cli.global);

    // Warnings always reach stderr; -v turns on debug detail for the
    // whole workspace, not just this crate.
    let filter = if ctx.verbose {
        "foreman=debug,foreman_git=debug,foreman_sources=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        // ===== Working With Tasks =====
        Some(Commands::Add(args)) => commands::task::run_add(&ctx, &args),
        Some(Commands::Show(args)) => commands::task::run_show(&ctx, &args),
        Some(Commands::List(args)) => commands::task::run_list(&ctx, &args),
        Some(Commands::Ready(args)) => commands::task::run_ready(&ctx, &args),
        Some(Commands::Claim(args)) => commands::task::run_claim(&ctx, &args),
        Some(Commands::StatusCmd(args)) => commands::task::run_status(&ctx, &args),
        Some(Commands::Dep(args)) => commands::task::run_dep(&ctx, &args),

        // ===== Repositories =====
        Some(Commands::Repo(args)) => commands::repo::run(&ctx, &args),

        // ===== Setup & Configuration =====
        Some(Commands::Init(args)) => commands::init::run(&ctx, &args),
        Some(Commands::Version) => commands::version::run(&ctx),

        None => {
            let _ = Cli::command().print_help();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        if ctx.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(rendered) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", rendered);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
