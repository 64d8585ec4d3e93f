//! Core types for foreman.
//!
//! This crate defines the [`Task`] record shared by every task source,
//! the open [`TaskStatus`] enum, and content-hash based task id
//! generation. It carries no storage or subprocess code so it can be
//! depended on from anywhere in the workspace.

pub mod idgen;
pub mod status;
pub mod task;

pub use idgen::{generate_task_id, ID_PREFIX};
pub use status::TaskStatus;
pub use task::{Task, TaskBuilder};
