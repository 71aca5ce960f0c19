use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use super::{parse_test_case_reply, prompts, Generator};
use crate::api::ApiClient;
use crate::domain::{Priority, TestCase, TestCaseDraft};

/// [`Generator`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiGenerator {
    client: ApiClient,
}

impl GeminiGenerator {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate_test_cases(
        &self,
        prompt: &str,
        count: u32,
        default_priority: Priority,
    ) -> Result<Vec<TestCaseDraft>> {
        info!(
            "Generating {} test cases with {}",
            count,
            self.client.model()
        );
        let full_prompt = prompts::test_cases_prompt(prompt, count, default_priority);
        let reply = self.client.generate_content(&full_prompt).await?;
        let drafts = parse_test_case_reply(&reply);
        debug!("Parsed {} drafts from reply", drafts.len());
        Ok(drafts)
    }

    async fn generate_automation_for_one(&self, case: &TestCase) -> Result<String> {
        info!("Generating automation for {}", case.id);
        self.client
            .generate_content(&prompts::automation_prompt_for_one(case))
            .await
    }

    async fn generate_automation_for_many(&self, cases: &[TestCase]) -> Result<String> {
        info!("Generating combined automation for {} cases", cases.len());
        self.client
            .generate_content(&prompts::automation_prompt_for_many(cases))
            .await
    }
}
