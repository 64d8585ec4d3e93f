//! Pluggable git backends.
//!
//! Everything that touches a repository goes through the [`GitBackend`]
//! trait: code that prepares workspaces holds a `&dyn GitBackend` and
//! never learns which implementation is behind it. Three are provided:
//!
//! - [`LiveBackend`] shells out to the real `git` binary.
//! - [`RecordingBackend`] records calls for assertions in tests.
//! - [`DryRunBackend`] renders the commands it would have run.
//!
//! Operations report plain success or failure. A `false` (or `None`
//! from [`GitBackend::ensure_local`]) is an ordinary answer, not an
//! error to propagate; callers decide what failure means for them.

pub mod backend;
pub mod dry_run;
pub mod live;
pub mod recording;

pub use backend::{GitBackend, Operation};
pub use dry_run::DryRunBackend;
pub use live::LiveBackend;
pub use recording::RecordingBackend;
