//! Command handlers for the `foreman` CLI.
//!
//! Each module exposes one or more `run` functions taking the shared
//! [`RuntimeContext`](crate::context::RuntimeContext) and the parsed
//! arguments for that command.

pub mod init;
pub mod repo;
pub mod task;
pub mod version;
