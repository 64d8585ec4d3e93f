//! Terminal styling for the foreman CLI.
//!
//! Detection of TTY status and color support, plus the render helpers
//! command output is built from.

pub mod styles;
pub mod terminal;
