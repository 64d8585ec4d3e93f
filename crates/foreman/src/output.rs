//! Output formatting helpers for the `foreman` CLI.
//!
//! Provides JSON output, table formatting, and human-readable task display.
//! Every command that honors `--json` goes through [`TaskView`] so that the
//! machine-readable output keeps a stable field set.

use foreman_core::Task;
use foreman_ui::styles::{render_priority, render_status};
use serde::Serialize;
use std::io::{self, Write};

/// A view model for JSON output.
///
/// The internal `Task` serialization omits default fields to keep stored
/// records small; this view is for tools driving foreman from the outside,
/// so everything except `description` is always present:
/// - `status` as lowercase string
/// - `created_at` / `updated_at` as ISO 8601 strings
/// - `agent` as `null` while unclaimed
/// - `description` omitted when empty
#[derive(Serialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub status: String,
    pub priority: i32,
    pub agent: Option<String>,
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskView {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            status: task.status.as_str().to_string(),
            priority: task.priority,
            agent: task.agent.clone(),
            depends_on: task.depends_on.clone(),
            description: if task.description.is_empty() {
                None
            } else {
                Some(task.description.clone())
            },
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a simple table with headers and rows.
///
/// Each row is a `Vec<String>` with columns matching the headers.
/// Column widths are computed from the data for alignment, so cells
/// must be plain text without escape sequences.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    // Compute column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    // Print header
    for (i, header) in headers.iter().enumerate() {
        if i > 0 {
            let _ = write!(handle, "  ");
        }
        let _ = write!(handle, "{:<width$}", header, width = widths[i]);
    }
    let _ = writeln!(handle);

    // Print separator
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            let _ = write!(handle, "  ");
        }
        let _ = write!(handle, "{}", "-".repeat(*width));
    }
    let _ = writeln!(handle);

    // Print rows
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                let _ = write!(handle, "  ");
            }
            if i < widths.len() {
                let _ = write!(handle, "{:<width$}", cell, width = widths[i]);
            } else {
                let _ = write!(handle, "{}", cell);
            }
        }
        let _ = writeln!(handle);
    }
}

/// Format a task as a compact row for list output.
///
/// Returns a vector of column values suitable for [`output_table`].
pub fn format_task_row(task: &Task) -> Vec<String> {
    vec![
        task.id.clone(),
        format!("P{}", task.priority),
        task.status.to_string(),
        task.title.clone(),
        task.agent.clone().unwrap_or_default(),
        task.depends_on.join(","),
    ]
}

/// Format a task in detailed multi-line view.
///
/// Shows all populated fields with section headers.
pub fn format_task_detail(task: &Task) -> String {
    let mut lines = Vec::new();

    // Header line
    lines.push(format!(
        "{} {} {}",
        task.id,
        render_priority(task.priority),
        task.title
    ));

    // Status and assignment
    lines.push(format!("Status: {}", render_status(&task.status)));
    if let Some(ref agent) = task.agent {
        lines.push(format!("Agent: {}", agent));
    }

    // Timestamps
    lines.push(format!(
        "Created: {}",
        task.created_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "Updated: {}",
        task.updated_at.format("%Y-%m-%d %H:%M")
    ));

    // Content sections
    if !task.depends_on.is_empty() {
        lines.push(String::new());
        lines.push(format!("Depends on: {}", task.depends_on.join(", ")));
    }
    if !task.description.is_empty() {
        lines.push(String::new());
        lines.push("DESCRIPTION".to_string());
        lines.push(task.description.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_core::TaskBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn view_has_stable_fields() {
        let task = TaskBuilder::new("Fix the bug")
            .id("fm-abc123")
            .priority(1)
            .build();
        let json = serde_json::to_value(TaskView::from_task(&task)).unwrap();
        // Fields that tooling relies on must be present even at defaults.
        assert_eq!(json["id"], "fm-abc123");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["priority"], 1);
        assert!(json["agent"].is_null());
        assert!(json.get("description").is_none());
        assert!(json["created_at"].is_string());
    }

    #[test]
    fn detail_format_includes_sections() {
        let task = TaskBuilder::new("Fix the bug")
            .id("fm-abc123")
            .description("A detailed description")
            .priority(1)
            .agent("alice")
            .build();
        let formatted = format_task_detail(&task);
        assert!(formatted.contains("DESCRIPTION"));
        assert!(formatted.contains("A detailed description"));
        assert!(formatted.contains("Agent: alice"));
    }

    #[test]
    fn detail_format_lists_dependencies() {
        let task = TaskBuilder::new("Ship it")
            .id("fm-xyz")
            .depends_on(vec!["fm-a".to_string(), "fm-b".to_string()])
            .build();
        let formatted = format_task_detail(&task);
        assert!(formatted.contains("Depends on: fm-a, fm-b"));
    }

    #[test]
    fn row_format_columns() {
        let task = TaskBuilder::new("Test")
            .id("fm-xyz")
            .priority(2)
            .agent("bob")
            .build();
        let row = format_task_row(&task);
        assert_eq!(row[0], "fm-xyz");
        assert_eq!(row[1], "P2");
        assert_eq!(row[2], "pending");
        assert_eq!(row[4], "bob");
    }

    #[test]
    fn table_output_smoke() {
        // Just ensure it doesn't panic
        let headers = &["ID", "PRI", "TITLE"];
        let rows = vec![
            vec!["fm-1".into(), "P0".into(), "Critical bug".into()],
            vec!["fm-2".into(), "P2".into(), "Nice to have".into()],
        ];
        output_table(headers, &rows);
    }
}
