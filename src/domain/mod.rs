//! Domain types shared across modules.
//!
//! Test cases, their attachments and the form input used to create or edit
//! them. The workspace, the generation collaborator, the exporters and the
//! MCP tools all speak in these types.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix of every test case id (`TC_001`, `TC_002`, ...).
pub const TEST_CASE_ID_PREFIX: &str = "TC_";

/// Format the id for the n-th test case ever created in a workspace.
pub fn format_test_case_id(seq: u32) -> String {
    format!("{}{:03}", TEST_CASE_ID_PREFIX, seq)
}

/// Parse the sequence number back out of a `TC_NNN` id.
pub fn parse_test_case_seq(id: &str) -> Option<u32> {
    id.strip_prefix(TEST_CASE_ID_PREFIX)?.parse().ok()
}

/// Split multi-line form input into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Test case priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

/// File attached to a test case. The content is kept base64-encoded and is
/// never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub content: String,
}

impl Attachment {
    /// Build an attachment from raw file bytes.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// A single authored or generated test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub submodule: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub test_data: Vec<String>,
    #[serde(default)]
    pub test_steps: Vec<String>,
    #[serde(default)]
    pub expected_results: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub selected: bool,
}

impl TestCase {
    /// `area > module > submodule`, skipping empty parts.
    pub fn breadcrumb(&self) -> String {
        [&self.area, &self.module, &self.submodule]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

/// Raw form input for manual creation and editing.
///
/// Multi-line fields are split with [`split_lines`] when the case is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TestCaseForm {
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub submodule: String,
    /// Test scenario title (required)
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub preconditions: String,
    #[serde(default)]
    pub test_data: String,
    /// One step per line (required)
    #[serde(default)]
    pub steps: String,
    /// One expected result per line (required)
    #[serde(default)]
    pub expected: String,
    /// Attachments, only honoured on creation
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A required form field that was left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Steps,
    Expected,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::Title => f.write_str("Test Scenario"),
            RequiredField::Steps => f.write_str("Test Steps"),
            RequiredField::Expected => f.write_str("Expected Results"),
        }
    }
}

/// Form fields after splitting and trimming, ready to become a test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub area: String,
    pub module: String,
    pub submodule: String,
    pub title: String,
    pub priority: Priority,
    pub preconditions: Vec<String>,
    pub test_data: Vec<String>,
    pub test_steps: Vec<String>,
    pub expected_results: Vec<String>,
}

impl TestCaseForm {
    /// Split the multi-line fields and check the required ones.
    pub fn validate(&self) -> Result<ValidatedForm, Vec<RequiredField>> {
        let title = self.title.trim().to_string();
        let test_steps = split_lines(&self.steps);
        let expected_results = split_lines(&self.expected);

        let mut missing = Vec::new();
        if title.is_empty() {
            missing.push(RequiredField::Title);
        }
        if test_steps.is_empty() {
            missing.push(RequiredField::Steps);
        }
        if expected_results.is_empty() {
            missing.push(RequiredField::Expected);
        }
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(ValidatedForm {
            area: self.area.trim().to_string(),
            module: self.module.trim().to_string(),
            submodule: self.submodule.trim().to_string(),
            title,
            priority: self.priority,
            preconditions: split_lines(&self.preconditions),
            test_data: split_lines(&self.test_data),
            test_steps,
            expected_results,
        })
    }
}

impl From<&TestCase> for TestCaseForm {
    /// Prefill an edit form from an existing case.
    fn from(case: &TestCase) -> Self {
        Self {
            area: case.area.clone(),
            module: case.module.clone(),
            submodule: case.submodule.clone(),
            title: case.title.clone(),
            priority: case.priority,
            preconditions: case.preconditions.join("\n"),
            test_data: case.test_data.join("\n"),
            steps: case.test_steps.join("\n"),
            expected: case.expected_results.join("\n"),
            attachments: Vec::new(),
        }
    }
}

/// Accept a list of strings, a single string or `null` for a list field.
fn lenient_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lines {
        Many(Vec<Option<String>>),
        One(String),
    }

    Ok(match Option::<Lines>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Lines::Many(items)) => items.into_iter().flatten().collect(),
        Some(Lines::One(text)) => split_lines(&text),
    })
}

/// A test case as returned by the generation service: shaped like
/// [`TestCase`] but without a trusted id, selection flag or attachments, and
/// with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TestCaseDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub submodule: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub preconditions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub test_data: Vec<String>,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub test_steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub expected_results: Vec<String>,
}

impl TestCaseDraft {
    /// Resolve the draft priority, falling back when it is missing or unknown.
    pub fn priority_or(&self, fallback: Priority) -> Priority {
        self.priority
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse_id() {
        assert_eq!(format_test_case_id(1), "TC_001");
        assert_eq!(format_test_case_id(42), "TC_042");
        assert_eq!(format_test_case_id(1234), "TC_1234");
        assert_eq!(parse_test_case_seq("TC_007"), Some(7));
        assert_eq!(parse_test_case_seq("case-7"), None);
    }

    #[test]
    fn test_split_lines_drops_blanks() {
        let lines = split_lines("1. Open app\n\n   \n2. Enter creds\r\n3. Submit  ");
        assert_eq!(lines, vec!["1. Open app", "2. Enter creds", "3. Submit"]);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("High/Medium/Low".parse::<Priority>().is_err());
    }

    #[test]
    fn test_form_validation_reports_every_missing_field() {
        let form = TestCaseForm {
            steps: "  \n ".to_string(),
            ..Default::default()
        };
        let missing = form.validate().unwrap_err();
        assert_eq!(
            missing,
            vec![
                RequiredField::Title,
                RequiredField::Steps,
                RequiredField::Expected
            ]
        );
    }

    #[test]
    fn test_draft_priority_fallback() {
        let draft = TestCaseDraft {
            priority: Some("High/Medium/Low".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.priority_or(Priority::Low), Priority::Low);

        let draft = TestCaseDraft {
            priority: Some("high".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.priority_or(Priority::Low), Priority::High);
    }

    #[test]
    fn test_attachment_is_base64() {
        let attachment = Attachment::from_bytes("note.txt", "text/plain", b"hello");
        assert_eq!(attachment.content, "aGVsbG8=");
    }

    #[test]
    fn test_breadcrumb_skips_empty_parts() {
        let case = TestCase {
            id: "TC_001".to_string(),
            area: "UI/UX".to_string(),
            module: String::new(),
            submodule: "Login".to_string(),
            title: "t".to_string(),
            priority: Priority::Medium,
            preconditions: vec![],
            test_data: vec![],
            test_steps: vec![],
            expected_results: vec![],
            attachments: vec![],
            selected: false,
        };
        assert_eq!(case.breadcrumb(), "UI/UX > Login");
    }
}
