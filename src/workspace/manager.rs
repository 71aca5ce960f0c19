//! The test-case workspace and its transitions.

use tracing::{debug, info, warn};

use super::types::{
    AutomationSelection, Change, Transition, WorkspaceError, WorkspaceState, WorkspaceStats,
};
use crate::domain::{
    format_test_case_id, parse_test_case_seq, Priority, TestCase, TestCaseDraft, TestCaseForm,
};
use crate::generation::{Generator, PromptContext, PromptSource, MAX_GENERATED_CASES};

/// The open edit: the case as it was when the edit began, and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    index: usize,
    snapshot: TestCase,
}

impl EditSession {
    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn snapshot(&self) -> &TestCase {
        &self.snapshot
    }
}

/// In-memory owner of every test case in one session.
///
/// Insertion order is display order and automation order. Ids come from a
/// counter that only moves forward, so an id is never handed out twice even
/// after deletions.
#[derive(Debug, Clone)]
pub struct Workspace {
    cases: Vec<TestCase>,
    next_seq: u32,
    selected_for_automation: Vec<TestCase>,
    editing: Option<EditSession>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            next_seq: 1,
            selected_for_automation: Vec::new(),
            editing: None,
        }
    }

    /// Rebuild a workspace from previously exported cases. Numbering
    /// continues after the highest `TC_NNN` id present.
    pub fn restore(cases: Vec<TestCase>) -> Self {
        let next_seq = cases
            .iter()
            .filter_map(|c| parse_test_case_seq(&c.id))
            .max()
            .map_or(1, |max| max.saturating_add(1));

        debug!(
            "Restored workspace with {} cases, next id {}",
            cases.len(),
            format_test_case_id(next_seq)
        );

        Self {
            cases,
            next_seq,
            ..Self::new()
        }
    }

    pub fn state(&self) -> WorkspaceState {
        match &self.editing {
            None => WorkspaceState::Idle,
            Some(session) => WorkspaceState::Editing {
                id: session.snapshot.id.clone(),
            },
        }
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn get(&self, id: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Snapshot captured by the last [`request_automation`](Self::request_automation).
    pub fn selected_for_automation(&self) -> &[TestCase] {
        &self.selected_for_automation
    }

    pub fn stats(&self) -> WorkspaceStats {
        WorkspaceStats::from_cases(&self.cases)
    }

    fn index_of(&self, id: &str) -> Result<usize, WorkspaceError> {
        self.cases
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))
    }

    fn ensure_idle(&self) -> Result<(), WorkspaceError> {
        match &self.editing {
            None => Ok(()),
            Some(session) => Err(WorkspaceError::EditInProgress(session.snapshot.id.clone())),
        }
    }

    fn assign_id(&mut self) -> String {
        let id = format_test_case_id(self.next_seq);
        self.next_seq = self.next_seq.saturating_add(1);
        id
    }

    fn idle(change: Change) -> Transition {
        Transition {
            state: WorkspaceState::Idle,
            change,
        }
    }

    /// Validate the form and append a new case.
    pub fn create_manual(&mut self, form: TestCaseForm) -> Result<Transition, WorkspaceError> {
        self.ensure_idle()?;
        let valid = form.validate().map_err(WorkspaceError::Validation)?;

        let id = self.assign_id();
        self.cases.push(TestCase {
            id: id.clone(),
            area: valid.area,
            module: valid.module,
            submodule: valid.submodule,
            title: valid.title,
            priority: valid.priority,
            preconditions: valid.preconditions,
            test_data: valid.test_data,
            test_steps: valid.test_steps,
            expected_results: valid.expected_results,
            attachments: form.attachments,
            selected: false,
        });

        info!("Created test case {}", id);
        Ok(Self::idle(Change::Created { id }))
    }

    /// Ask the generator for cases and append every usable one.
    ///
    /// A generator error is not an error here: the workspace is left
    /// untouched and the failure is reported in the change.
    pub async fn generate_from_prompt<G>(
        &mut self,
        generator: &G,
        source: &PromptSource,
        count: u32,
        default_priority: Priority,
    ) -> Result<Transition, WorkspaceError>
    where
        G: Generator + ?Sized,
    {
        self.ensure_idle()?;
        if count == 0 || count > MAX_GENERATED_CASES {
            return Err(WorkspaceError::InvalidCount {
                requested: count,
                max: MAX_GENERATED_CASES,
            });
        }
        if source.is_blank() {
            return Err(WorkspaceError::EmptyPrompt);
        }

        let prompt = source.prompt_text(count);
        let drafts = match generator
            .generate_test_cases(&prompt, count, default_priority)
            .await
        {
            Ok(drafts) => drafts,
            Err(e) => {
                warn!("Test case generation failed: {:#}", e);
                return Ok(Self::idle(Change::Generated {
                    ids: Vec::new(),
                    failure: Some(format!("{:#}", e)),
                }));
            }
        };

        let inherited = source.inherited_context();
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let Some(case) = self.case_from_draft(draft, inherited, default_priority) else {
                continue;
            };
            ids.push(case.id.clone());
            self.cases.push(case);
        }

        info!("Generated {} test cases", ids.len());
        Ok(Self::idle(Change::Generated { ids, failure: None }))
    }

    fn case_from_draft(
        &mut self,
        draft: TestCaseDraft,
        inherited: Option<&PromptContext>,
        default_priority: Priority,
    ) -> Option<TestCase> {
        let title = draft.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            warn!("Dropping generated test case without a title");
            return None;
        }
        let title = title.to_string();
        let priority = draft.priority_or(default_priority);

        let area = inherit(draft.area, inherited.map(|ctx| ctx.area.as_str()));
        let module = inherit(draft.module, inherited.map(|ctx| ctx.module.as_str()));
        let submodule = inherit(draft.submodule, inherited.map(|ctx| ctx.submodule.as_str()));

        Some(TestCase {
            id: self.assign_id(),
            area,
            module,
            submodule,
            title,
            priority,
            preconditions: clean_lines(draft.preconditions),
            test_data: clean_lines(draft.test_data),
            test_steps: clean_lines(draft.test_steps),
            expected_results: clean_lines(draft.expected_results),
            attachments: Vec::new(),
            selected: false,
        })
    }

    /// Open `id` for editing.
    pub fn begin_edit(&mut self, id: &str) -> Result<Transition, WorkspaceError> {
        self.ensure_idle()?;
        let index = self.index_of(id)?;

        self.editing = Some(EditSession {
            index,
            snapshot: self.cases[index].clone(),
        });

        debug!("Editing {} at index {}", id, index);
        Ok(Transition {
            state: WorkspaceState::Editing { id: id.to_string() },
            change: Change::EditStarted { id: id.to_string() },
        })
    }

    /// Replace the case being edited. On validation failure the session
    /// stays open.
    pub fn save_edit(&mut self, form: TestCaseForm) -> Result<Transition, WorkspaceError> {
        let session = self.editing.as_ref().ok_or(WorkspaceError::NotEditing)?;
        let valid = form.validate().map_err(WorkspaceError::Validation)?;
        let index = session.index;

        let current = &self.cases[index];
        let updated = TestCase {
            id: current.id.clone(),
            area: valid.area,
            module: valid.module,
            submodule: valid.submodule,
            title: valid.title,
            priority: valid.priority,
            preconditions: valid.preconditions,
            test_data: valid.test_data,
            test_steps: valid.test_steps,
            expected_results: valid.expected_results,
            attachments: current.attachments.clone(),
            selected: current.selected,
        };
        let id = updated.id.clone();
        self.cases[index] = updated;
        self.editing = None;

        info!("Updated test case {}", id);
        Ok(Self::idle(Change::Updated { id }))
    }

    /// Close the open edit without touching the collection.
    pub fn cancel_edit(&mut self) -> Result<Transition, WorkspaceError> {
        let session = self.editing.take().ok_or(WorkspaceError::NotEditing)?;
        Ok(Self::idle(Change::EditCancelled {
            id: session.snapshot.id,
        }))
    }

    pub fn toggle_select(&mut self, id: &str) -> Result<Transition, WorkspaceError> {
        self.ensure_idle()?;
        let index = self.index_of(id)?;
        let case = &mut self.cases[index];
        case.selected = !case.selected;

        Ok(Self::idle(Change::SelectionChanged {
            ids: vec![id.to_string()],
        }))
    }

    pub fn select_all(&mut self, selected: bool) -> Result<Transition, WorkspaceError> {
        self.ensure_idle()?;
        for case in &mut self.cases {
            case.selected = selected;
        }

        Ok(Self::idle(Change::SelectionChanged {
            ids: self.cases.iter().map(|c| c.id.clone()).collect(),
        }))
    }

    /// Remove every selected case. A no-op when nothing is selected.
    pub fn delete_selected(&mut self) -> Result<Transition, WorkspaceError> {
        self.ensure_idle()?;
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.cases)
            .into_iter()
            .partition(|c| c.selected);
        self.cases = kept;

        let ids: Vec<String> = removed.into_iter().map(|c| c.id).collect();
        if !ids.is_empty() {
            info!("Deleted {} test cases", ids.len());
        }
        Ok(Self::idle(Change::Deleted { ids }))
    }

    /// Capture a point-in-time copy of the cases to automate. An empty
    /// snapshot is legal and means there is nothing to automate.
    pub fn request_automation(
        &mut self,
        selection: AutomationSelection,
    ) -> Result<Transition, WorkspaceError> {
        self.ensure_idle()?;
        let snapshot: Vec<TestCase> = match &selection {
            AutomationSelection::Selected => {
                self.cases.iter().filter(|c| c.selected).cloned().collect()
            }
            AutomationSelection::Single(id) => vec![self.cases[self.index_of(id)?].clone()],
        };

        let ids = snapshot.iter().map(|c| c.id.clone()).collect();
        self.selected_for_automation = snapshot;
        Ok(Self::idle(Change::AutomationRequested { ids }))
    }
}

/// A draft's own classification wins unless it is blank.
fn inherit(own: Option<String>, fallback: Option<&str>) -> String {
    own.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| fallback.map(|v| v.trim().to_string()))
        .unwrap_or_default()
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
