//! Task commands -- `add`, `show`, `list`, `ready`, `claim`, `status`, `dep`.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use foreman_core::{generate_task_id, TaskBuilder, TaskStatus, ID_PREFIX};
use foreman_sources::{SqliteSource, TaskSource};
use foreman_ui::styles::{
    render_pass_icon, render_priority_compact, render_task_compact, render_warn_icon,
};

use crate::cli::{
    AddArgs, ClaimArgs, DepAddArgs, DepArgs, DepCommands, DepListArgs, ListArgs, ReadyArgs,
    ShowArgs, StatusCmdArgs,
};
use crate::context::RuntimeContext;
use crate::output::{format_task_detail, format_task_row, output_json, output_table, TaskView};

/// Statuses foreman assigns itself. Anything else is allowed but warned about.
const KNOWN_STATUSES: &[&str] = &["pending", "in_progress", "done", "failed"];

/// Execute the `foreman add` command.
pub fn run_add(ctx: &RuntimeContext, args: &AddArgs) -> Result<()> {
    let source = ctx.open_source()?;
    let priority = parse_priority(&args.priority)?;
    let deps = collect_deps(&args.deps);
    let now = Utc::now();

    let task_id = match &args.id {
        Some(explicit) => {
            let id = explicit.trim().to_string();
            if id.is_empty() {
                bail!("task id must not be empty");
            }
            id
        }
        None => pick_task_id(&source, &args.title, &ctx.actor, now)?,
    };

    let mut builder = TaskBuilder::new(args.title.clone())
        .id(task_id.clone())
        .priority(priority)
        .depends_on(deps.clone())
        .created_at(now);
    if let Some(ref description) = args.description {
        builder = builder.description(description.clone());
    }
    let task = builder.build();

    source.insert_task(&task)?;
    debug!(task_id = %task.id, priority, "created task");

    if ctx.json {
        output_json(&TaskView::from_task(&task));
    } else if args.silent {
        println!("{}", task_id);
    } else if !ctx.quiet {
        println!("Created task: {}", task_id);
        println!("  Title: {}", args.title);
        println!("  Priority: P{}", priority);
        if !deps.is_empty() {
            println!("  Depends on: {}", deps.join(", "));
        }
    }

    Ok(())
}

/// Execute the `foreman show` command.
pub fn run_show(ctx: &RuntimeContext, args: &ShowArgs) -> Result<()> {
    let source = ctx.open_source()?;
    let task = source.get_task(&args.id)?;

    if ctx.json {
        output_json(&TaskView::from_task(&task));
    } else {
        println!("{}", format_task_detail(&task));
    }
    Ok(())
}

/// Execute the `foreman list` command.
pub fn run_list(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let source = ctx.open_source()?;
    let mut tasks = source.get_tasks()?;

    if let Some(ref status) = args.status {
        let want = TaskStatus::from(status.as_str());
        tasks.retain(|t| t.status == want);
    }
    if let Some(ref agent) = args.agent {
        tasks.retain(|t| t.agent.as_deref() == Some(agent.as_str()));
    }

    if ctx.json {
        let views: Vec<TaskView> = tasks.iter().map(TaskView::from_task).collect();
        output_json(&views);
        return Ok(());
    }

    if tasks.is_empty() {
        if !ctx.quiet {
            println!("No tasks found");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tasks.iter().map(format_task_row).collect();
    output_table(&["ID", "PRI", "STATUS", "TITLE", "AGENT", "DEPS"], &rows);
    Ok(())
}

/// Execute the `foreman ready` command.
pub fn run_ready(ctx: &RuntimeContext, args: &ReadyArgs) -> Result<()> {
    let source = ctx.open_source()?;
    let mut tasks = source.get_ready_tasks()?;
    if args.limit > 0 && tasks.len() > args.limit {
        tasks.truncate(args.limit);
    }

    if ctx.json {
        let views: Vec<TaskView> = tasks.iter().map(TaskView::from_task).collect();
        output_json(&views);
        return Ok(());
    }

    if tasks.is_empty() {
        println!();
        println!("No ready work found");
        println!();
        return Ok(());
    }

    println!();
    println!("Ready work ({} unblocked, unclaimed):", tasks.len());
    println!();
    for (i, task) in tasks.iter().enumerate() {
        println!(
            "{}. [{}] {}: {}",
            i + 1,
            render_priority_compact(task.priority),
            task.id,
            task.title
        );
    }
    println!();
    Ok(())
}

/// Execute the `foreman claim` command.
pub fn run_claim(ctx: &RuntimeContext, args: &ClaimArgs) -> Result<()> {
    let source = ctx.open_source()?;
    let agent = args.agent.clone().unwrap_or_else(|| ctx.actor.clone());
    debug!(task_id = %args.id, agent = %agent, "attempting claim");

    let claimed = source.claim_task(&args.id, &agent)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "id": args.id,
            "agent": agent,
            "claimed": claimed,
        }));
        if !claimed {
            std::process::exit(1);
        }
        return Ok(());
    }

    if !claimed {
        let task = source.get_task(&args.id)?;
        let holder = task.agent.as_deref().unwrap_or("unknown");
        bail!("task {} is already claimed by {}", args.id, holder);
    }

    if !ctx.quiet {
        println!("{} Claimed {} for {}", render_pass_icon(), args.id, agent);
    }
    Ok(())
}

/// Execute the `foreman status` command.
///
/// Without a new status, prints the current one. With a new status,
/// transitions the task and reports the change.
pub fn run_status(ctx: &RuntimeContext, args: &StatusCmdArgs) -> Result<()> {
    let source = ctx.open_source()?;
    let current = source.get_task(&args.id)?;

    let Some(ref new_status) = args.new_status else {
        if ctx.json {
            output_json(&serde_json::json!({
                "id": args.id,
                "status": current.status.as_str(),
            }));
        } else {
            println!("{}", current.status);
        }
        return Ok(());
    };

    if !KNOWN_STATUSES.contains(&new_status.as_str()) {
        eprintln!(
            "{} '{}' is not a standard status ({})",
            render_warn_icon(),
            new_status,
            KNOWN_STATUSES.join(", ")
        );
    }

    let status = TaskStatus::from(new_status.as_str());
    if status == current.status {
        if !ctx.quiet {
            println!("Task {} is already '{}'", args.id, current.status);
        }
        return Ok(());
    }

    source.update_status(&args.id, status.clone())?;
    debug!(task_id = %args.id, from = %current.status, to = %status, "status changed");

    if ctx.json {
        let task = source.get_task(&args.id)?;
        output_json(&TaskView::from_task(&task));
    } else if !ctx.quiet {
        println!("Status of {}: {} -> {}", args.id, current.status, status);
    }
    Ok(())
}

/// Execute the `foreman dep` command.
pub fn run_dep(ctx: &RuntimeContext, args: &DepArgs) -> Result<()> {
    match &args.command {
        DepCommands::Add(a) => run_dep_add(ctx, a),
        DepCommands::List(a) => run_dep_list(ctx, a),
    }
}

fn run_dep_add(ctx: &RuntimeContext, args: &DepAddArgs) -> Result<()> {
    let source = ctx.open_source()?;
    if args.task_id == args.depends_on_id {
        bail!("a task cannot depend on itself");
    }
    source.add_dependency(&args.task_id, &args.depends_on_id)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "task_id": args.task_id,
            "depends_on_id": args.depends_on_id,
        }));
    } else if !ctx.quiet {
        println!("{} now waits for {}", args.task_id, args.depends_on_id);
    }
    Ok(())
}

fn run_dep_list(ctx: &RuntimeContext, args: &DepListArgs) -> Result<()> {
    let source = ctx.open_source()?;
    let task = source.get_task(&args.task_id)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "task_id": task.id,
            "depends_on": task.depends_on,
        }));
        return Ok(());
    }

    if task.depends_on.is_empty() {
        println!("{} has no dependencies", task.id);
        return Ok(());
    }

    println!("Depends on:");
    for dep_id in &task.depends_on {
        match source.get_task(dep_id) {
            Ok(dep) => println!("  {}", render_task_compact(&dep)),
            // Dependencies may reference tasks that do not exist yet.
            Err(e) if e.is_not_found() => println!("  {} (not created yet)", dep_id),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a priority argument. Accepts both bare digits ("2") and the
/// prefixed form ("P2" or "p2").
fn parse_priority(value: &str) -> Result<i32> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix('P')
        .or_else(|| trimmed.strip_prefix('p'))
        .unwrap_or(trimmed);
    let priority: i32 = digits
        .parse()
        .with_context(|| format!("invalid priority: '{}'", value))?;
    if !(0..=4).contains(&priority) {
        bail!("priority must be between 0 and 4, got {}", priority);
    }
    Ok(priority)
}

/// Flatten `--dep` values, splitting any comma-separated lists.
fn collect_deps(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Generate a content-hash id, retrying with a new nonce on collision.
fn pick_task_id(
    source: &SqliteSource,
    title: &str,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    for nonce in 0..10 {
        let candidate = generate_task_id(ID_PREFIX, title, actor, now, nonce);
        match source.get_task(&candidate) {
            Ok(_) => continue,
            Err(e) if e.is_not_found() => return Ok(candidate),
            Err(e) => return Err(e.into()),
        }
    }
    bail!("failed to generate a unique task id after 10 attempts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_priority_accepts_bare_and_prefixed() {
        assert_eq!(parse_priority("2").unwrap(), 2);
        assert_eq!(parse_priority("P0").unwrap(), 0);
        assert_eq!(parse_priority("p4").unwrap(), 4);
        assert_eq!(parse_priority(" 1 ").unwrap(), 1);
    }

    #[test]
    fn parse_priority_rejects_out_of_range() {
        assert!(parse_priority("5").is_err());
        assert!(parse_priority("-1").is_err());
        assert!(parse_priority("P9").is_err());
    }

    #[test]
    fn parse_priority_rejects_garbage() {
        assert!(parse_priority("high").is_err());
        assert!(parse_priority("").is_err());
        assert!(parse_priority("P").is_err());
    }

    #[test]
    fn collect_deps_splits_commas() {
        let deps = collect_deps(&[
            "fm-a,fm-b".to_string(),
            "fm-c".to_string(),
            " fm-d , ".to_string(),
        ]);
        assert_eq!(deps, vec!["fm-a", "fm-b", "fm-c", "fm-d"]);
    }

    #[test]
    fn collect_deps_empty_input() {
        assert!(collect_deps(&[]).is_empty());
        assert!(collect_deps(&["".to_string()]).is_empty());
    }
}
