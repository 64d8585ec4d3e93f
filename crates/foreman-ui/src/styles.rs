//! Ayu color theme and styling functions for foreman CLI output.
//!
//! Uses the Ayu Dark color palette for consistent terminal styling.
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Design principles:
//! - Only actionable states get color (pending tasks use standard text)
//! - P0/P1 get color (they need attention); P2 gets muted gold; the rest
//!   are neutral
//! - Small Unicode symbols for icons, NOT emoji blobs

use foreman_core::{Task, TaskStatus};
use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

// Core semantic colors
const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue

// Status colors
const STATUS_IN_PROGRESS: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - yellow
const STATUS_DONE: (u8, u8, u8) = (0x80, 0x90, 0xa0); // #8090a0 - dimmed
const STATUS_FAILED: (u8, u8, u8) = (0xf2, 0x6d, 0x78); // #f26d78 - red

// Priority colors
const PRIORITY_P0: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const PRIORITY_P1: (u8, u8, u8) = (0xff, 0x8f, 0x40); // #ff8f40 - orange
const PRIORITY_P2: (u8, u8, u8) = (0xe6, 0xb4, 0x50); // #e6b450 - muted gold

// ---------------------------------------------------------------------------
// Status icons -- consistent semantic indicators
// ---------------------------------------------------------------------------

/// Pending status icon (hollow circle -- available to work).
pub const STATUS_ICON_PENDING: &str = "\u{25CB}"; // ○
/// In-progress status icon (half-filled circle -- active work).
pub const STATUS_ICON_IN_PROGRESS: &str = "\u{25D0}"; // ◐
/// Done status icon (checkmark -- completed).
pub const STATUS_ICON_DONE: &str = "\u{2713}"; // ✓
/// Failed status icon (cross -- needs attention).
pub const STATUS_ICON_FAILED: &str = "\u{2716}"; // ✖

/// Priority icon -- small filled circle, colored by priority level.
pub const PRIORITY_ICON: &str = "\u{25CF}"; // ●

// General icons
pub const ICON_PASS: &str = "\u{2713}"; // ✓
pub const ICON_WARN: &str = "\u{26A0}"; // ⚠
pub const ICON_FAIL: &str = "\u{2716}"; // ✖

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

/// Applies truecolor foreground to a string, falling back to plain text
/// when color is not supported.
fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

/// Applies truecolor foreground + bold to a string.
fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

/// Renders text with pass (green) styling.
pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

/// Renders text with warning (yellow) styling.
pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

/// Renders text with fail (red) styling.
pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

/// Renders text with muted (gray) styling.
pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

/// Renders text with accent (blue) styling.
pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

/// Renders text in bold.
pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Icon renderers
// ---------------------------------------------------------------------------

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

pub fn render_warn_icon() -> String {
    color_str(ICON_WARN, WARN)
}

pub fn render_fail_icon() -> String {
    color_str(ICON_FAIL, FAIL)
}

// ---------------------------------------------------------------------------
// Status rendering
// ---------------------------------------------------------------------------

/// Returns the appropriate icon for a status.
/// This is the canonical source for status icon rendering.
pub fn render_status_icon(status: &TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => STATUS_ICON_PENDING,
        TaskStatus::InProgress => STATUS_ICON_IN_PROGRESS,
        TaskStatus::Done => STATUS_ICON_DONE,
        TaskStatus::Failed => STATUS_ICON_FAILED,
        TaskStatus::Other(_) => "?",
    }
}

/// Returns the colored status icon string.
pub fn render_status_icon_colored(status: &TaskStatus) -> String {
    let icon = render_status_icon(status);
    match status {
        TaskStatus::Pending => icon.to_string(), // no color
        TaskStatus::InProgress => color_str(icon, STATUS_IN_PROGRESS),
        TaskStatus::Done => color_str(icon, STATUS_DONE),
        TaskStatus::Failed => color_str(icon, STATUS_FAILED),
        TaskStatus::Other(_) => "?".to_string(),
    }
}

/// Renders a status string with semantic coloring.
/// in_progress/failed get color; pending uses standard text; done is dimmed.
pub fn render_status(status: &TaskStatus) -> String {
    let s = status.as_str();
    match status {
        TaskStatus::InProgress => color_str(s, STATUS_IN_PROGRESS),
        TaskStatus::Failed => color_str(s, STATUS_FAILED),
        TaskStatus::Done => color_str(s, STATUS_DONE),
        _ => s.to_string(), // pending and others -- standard text
    }
}

// ---------------------------------------------------------------------------
// Priority rendering
// ---------------------------------------------------------------------------

/// Renders a priority level with semantic styling.
/// Format: `● P{n}` (icon + label).
/// P0 is bold red, P1 is orange, P2 is muted gold, the rest are neutral.
pub fn render_priority(priority: i32) -> String {
    let label = format!("{} P{}", PRIORITY_ICON, priority);
    match priority {
        0 => color_bold_str(&label, PRIORITY_P0),
        1 => color_str(&label, PRIORITY_P1),
        2 => color_str(&label, PRIORITY_P2),
        _ => label, // P3 and beyond -- no color
    }
}

/// Renders just the priority label without icon (e.g. `P2`).
/// Use when space is constrained.
pub fn render_priority_compact(priority: i32) -> String {
    let label = format!("P{}", priority);
    match priority {
        0 => color_bold_str(&label, PRIORITY_P0),
        1 => color_str(&label, PRIORITY_P1),
        2 => color_str(&label, PRIORITY_P2),
        _ => label,
    }
}

// ---------------------------------------------------------------------------
// Compact task rendering
// ---------------------------------------------------------------------------

/// Renders a compact one-line task summary with colors.
/// Format: `ID [Priority] Status - Title`
///
/// When status is "done", the entire line is dimmed.
pub fn render_task_compact(task: &Task) -> String {
    if task.status == TaskStatus::Done {
        // Entire line is dimmed -- visually shows "done"
        let line = format!(
            "{} [P{}] {} - {}",
            task.id,
            task.priority,
            task.status.as_str(),
            task.title,
        );
        color_str(&line, STATUS_DONE)
    } else {
        format!(
            "{} [{}] {} - {}",
            &task.id,
            render_priority_compact(task.priority),
            render_status(&task.status),
            task.title,
        )
    }
}
