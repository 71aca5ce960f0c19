//! Scripted generator for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::Generator;
use crate::domain::{Priority, TestCase, TestCaseDraft};

/// Replies come from the fields; every call is recorded.
#[derive(Default)]
pub struct FakeGenerator {
    pub drafts: Vec<TestCaseDraft>,
    pub fail_test_cases: bool,
    /// Automation replies keyed by case id, or `"combined"` for the
    /// many-cases call. A missing key is a failed call.
    pub automation: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn with_drafts(drafts: Vec<TestCaseDraft>) -> Self {
        Self {
            drafts,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_test_cases: true,
            ..Default::default()
        }
    }

    pub fn reply(mut self, key: &str, text: &str) -> Self {
        self.automation.insert(key.to_string(), text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate_test_cases(
        &self,
        prompt: &str,
        count: u32,
        default_priority: Priority,
    ) -> Result<Vec<TestCaseDraft>> {
        self.record(format!("cases:{}:{}:{}", count, default_priority, prompt));
        if self.fail_test_cases {
            bail!("service unavailable");
        }
        Ok(self.drafts.clone())
    }

    async fn generate_automation_for_one(&self, case: &TestCase) -> Result<String> {
        self.record(format!("one:{}", case.id));
        match self.automation.get(&case.id) {
            Some(text) => Ok(text.clone()),
            None => bail!("no reply for {}", case.id),
        }
    }

    async fn generate_automation_for_many(&self, cases: &[TestCase]) -> Result<String> {
        self.record(format!("many:{}", cases.len()));
        match self.automation.get("combined") {
            Some(text) => Ok(text.clone()),
            None => bail!("no combined reply"),
        }
    }
}

/// A titled draft with one step and one expected result.
pub fn draft(title: &str) -> TestCaseDraft {
    TestCaseDraft {
        title: Some(title.to_string()),
        test_steps: vec!["Open app".to_string()],
        expected_results: vec!["It works".to_string()],
        ..Default::default()
    }
}
