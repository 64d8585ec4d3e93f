//! Configuration management for foreman.
//!
//! This crate handles loading and saving `.foreman/config.yaml` files,
//! discovering `.foreman/` directories in the filesystem, and providing
//! typed access to foreman configuration values.

pub mod config;
pub mod foreman_dir;
