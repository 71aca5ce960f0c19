use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::TestCaseDraft;

#[derive(Debug, Deserialize)]
struct TestCaseReply {
    #[serde(default)]
    test_cases: Vec<Value>,
}

fn json_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"))
}

/// Pull the `test_cases` array out of a model reply.
///
/// The reply may wrap the JSON in prose or code fences; the span from the
/// first `{` to the last `}` is parsed. Anything unparseable yields no
/// drafts, and an entry that does not look like a test case is skipped
/// without losing the rest.
pub fn parse_test_case_reply(text: &str) -> Vec<TestCaseDraft> {
    let Some(m) = json_object_re().find(text) else {
        debug!("No JSON object found in generation reply");
        return Vec::new();
    };

    match serde_json::from_str::<TestCaseReply>(m.as_str()) {
        Ok(reply) => reply
            .test_cases
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value(entry) {
                Ok(draft) => Some(draft),
                Err(e) => {
                    warn!("Skipping generated test case #{}: {}", i + 1, e);
                    None
                }
            })
            .collect(),
        Err(e) => {
            warn!("Failed to parse generated test cases: {}", e);
            Vec::new()
        }
    }
}
