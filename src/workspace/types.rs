//! Workspace types.
//!
//! States, change descriptions and errors returned by the transition
//! functions on [`Workspace`](super::Workspace).

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Priority, RequiredField, TestCase};

/// State of the workspace as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkspaceState {
    /// No edit in progress
    Idle,
    /// Exactly one test case is open for modification
    Editing { id: String },
}

/// What a transition changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum Change {
    Created {
        id: String,
    },
    /// Cases appended by a generation call. `failure` is set when the
    /// collaborator failed and nothing was appended.
    Generated {
        ids: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        failure: Option<String>,
    },
    EditStarted {
        id: String,
    },
    Updated {
        id: String,
    },
    EditCancelled {
        id: String,
    },
    SelectionChanged {
        ids: Vec<String>,
    },
    Deleted {
        ids: Vec<String>,
    },
    AutomationRequested {
        ids: Vec<String>,
    },
}

/// Result of a successful transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub state: WorkspaceState,
    #[serde(flatten)]
    pub change: Change,
}

/// Which cases a request-automation snapshot captures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationSelection {
    /// Every case whose `selected` flag is set
    Selected,
    /// Exactly this one case, regardless of its flag
    Single(String),
}

/// Workspace statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceStats {
    pub total: usize,
    pub selected: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl WorkspaceStats {
    pub fn from_cases(cases: &[TestCase]) -> Self {
        cases.iter().fold(Self::default(), |mut stats, case| {
            stats.total += 1;
            if case.selected {
                stats.selected += 1;
            }
            match case.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
            stats
        })
    }
}

/// Errors from workspace transitions. Every error leaves the workspace
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("Please fill all required fields: {}", join_fields(.0))]
    Validation(Vec<RequiredField>),

    #[error("Test case not found: {0}")]
    NotFound(String),

    #[error("Test case {0} is being edited; save or cancel the edit first")]
    EditInProgress(String),

    #[error("No edit in progress")]
    NotEditing,

    #[error("Number of test cases must be between 1 and {max}, got {requested}")]
    InvalidCount { requested: u32, max: u32 },

    #[error("Please provide requirements or fill in the form before generating")]
    EmptyPrompt,
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
