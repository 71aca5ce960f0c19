//! Generation collaborator.
//!
//! The workspace and the automation orchestration only see the
//! [`Generator`] trait. [`GeminiGenerator`] is the production
//! implementation; tests script their own.

mod gemini;
mod parse;
pub mod prompts;
#[cfg(test)]
pub(crate) mod testing;

pub use gemini::GeminiGenerator;
pub use parse::parse_test_case_reply;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{Priority, TestCase, TestCaseDraft};

/// Upper bound on cases requested in one generation call.
pub const MAX_GENERATED_CASES: u32 = 50;

/// The three calls the core makes to a text-generation service.
///
/// Implementations report failures as errors; callers in the core turn any
/// error into an empty result.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate up to `count` test cases for the given prompt text.
    async fn generate_test_cases(
        &self,
        prompt: &str,
        count: u32,
        default_priority: Priority,
    ) -> Result<Vec<TestCaseDraft>>;

    /// Generate automation code for a single test case.
    async fn generate_automation_for_one(&self, case: &TestCase) -> Result<String>;

    /// Generate one combined suite covering every given test case.
    async fn generate_automation_for_many(&self, cases: &[TestCase]) -> Result<String>;
}

/// The fields of the manual creation form, used as a prompt seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct PromptContext {
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub submodule: String,
    /// Scenario title
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub expected: String,
}

/// Where the generation prompt comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// Free-text requirements or a user story.
    Requirements(String),
    /// The current contents of the manual creation form.
    Context(PromptContext),
}

impl PromptSource {
    /// True when there is nothing to generate from.
    pub fn is_blank(&self) -> bool {
        match self {
            PromptSource::Requirements(text) => text.trim().is_empty(),
            PromptSource::Context(ctx) => [
                &ctx.area,
                &ctx.module,
                &ctx.submodule,
                &ctx.title,
                &ctx.steps,
                &ctx.expected,
            ]
            .iter()
            .all(|field| field.trim().is_empty()),
        }
    }

    /// Prompt text handed to [`Generator::generate_test_cases`].
    pub fn prompt_text(&self, count: u32) -> String {
        match self {
            PromptSource::Requirements(text) => text.trim().to_string(),
            PromptSource::Context(ctx) => prompts::context_prompt(ctx, count),
        }
    }

    /// Classification inherited by generated cases that lack their own.
    pub fn inherited_context(&self) -> Option<&PromptContext> {
        match self {
            PromptSource::Requirements(_) => None,
            PromptSource::Context(ctx) => Some(ctx),
        }
    }
}
