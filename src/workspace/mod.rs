//! Test-case workspace.
//!
//! Owns the authoritative collection of test cases for one session together
//! with its selection and edit state, and exposes the named transitions a
//! front end drives:
//! - create, generate, begin/save/cancel edit
//! - toggle/select all, delete selected
//! - request automation (a point-in-time snapshot)
//!
//! Every transition either returns a [`Transition`] or fails with a
//! [`WorkspaceError`] and leaves the workspace untouched.

mod manager;
mod types;

// Re-exports
pub use manager::Workspace;
pub use types::{AutomationSelection, Change, Transition, WorkspaceError};
