//! Per-connection session state.
//!
//! A [`Session`] is created for every CLI invocation and every MCP
//! connection and passed explicitly to whatever drives it. Nothing here is
//! process-wide.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::automation::{generate_automation, AutomationMode, AutomationRun};
use crate::domain::TestCase;
use crate::generation::Generator;
use crate::workspace::Workspace;

/// One user's workspace plus the last automation run.
#[derive(Debug, Default)]
pub struct Session {
    pub workspace: Workspace,
    last_run: Option<AutomationRun>,
}

/// Shared session type for async handlers
pub type SharedSession = Arc<Mutex<Session>>;

/// Create a shared session
pub fn create_shared_session(session: Session) -> SharedSession {
    Arc::new(Mutex::new(session))
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously exported cases.
    pub fn restore(cases: Vec<TestCase>) -> Self {
        Self {
            workspace: Workspace::restore(cases),
            last_run: None,
        }
    }

    pub fn last_run(&self) -> Option<&AutomationRun> {
        self.last_run.as_ref()
    }

    /// Generate automation code for the current automation snapshot and
    /// keep the run for export.
    pub async fn generate_automation<G>(
        &mut self,
        generator: &G,
        mode: AutomationMode,
    ) -> &AutomationRun
    where
        G: Generator + ?Sized,
    {
        let cases = self.workspace.selected_for_automation().to_vec();
        info!(
            "Generating automation for {} cases ({:?})",
            cases.len(),
            mode
        );
        let run = generate_automation(generator, &cases, mode).await;
        self.last_run.insert(run)
    }
}
