use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use super::types::{ApiError, GenerateContentRequest, GenerateContentResponse};
use crate::config::ProviderConfig;

/// Default request timeout in seconds. Generation of a full automation
/// suite routinely takes minutes.
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Running mode, reported in the User-Agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Mcp,
    Command,
}

impl CliMode {
    fn as_str(&self) -> &'static str {
        match self {
            CliMode::Mcp => "mcp",
            CliMode::Command => "command",
        }
    }
}

fn build_user_agent(mode: CliMode) -> String {
    format!("qe-suite/{}/{}", DEFAULT_VERSION, mode.as_str())
}

/// API client for the Generative Language service
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    user_agent: String,
    session_id: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ProviderConfig, mode: CliMode) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            user_agent: build_user_agent(mode),
            session_id: Uuid::new_v4().to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_url(base_url: &str, model: &str) -> Result<Url> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base =
            Url::parse(&normalized).with_context(|| format!("Invalid base URL: {}", base_url))?;
        let endpoint = format!("v1beta/models/{}:generateContent", model);
        base.join(&endpoint)
            .with_context(|| format!("Failed to build URL for endpoint: {}", endpoint))
    }

    /// Send a single-turn prompt and return the reply text.
    ///
    /// A reply with no candidate text is an error.
    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = Self::build_url(&self.base_url, &self.model)?;
        let request_id = Uuid::new_v4().to_string();
        let body = GenerateContentRequest::user_text(prompt);

        debug!("=== API Request ===");
        debug!("URL: {}", url);
        debug!("Model: {}", self.model);
        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .header("User-Agent", &self.user_agent)
            .header("x-goog-api-key", &self.api_key)
            .header("x-request-id", &request_id)
            .header("x-request-session-id", &self.session_id)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        debug!("=== API Response ===");
        debug!("Status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let api_error =
                ApiError::from_http_response(status.as_u16(), &error_text, Some(request_id));

            if api_error.is_fatal() {
                error!("❌ {}", api_error.message);
                error!("   {}", api_error.user_hint());
            } else {
                error!("API request failed: {}", api_error.message);
            }

            anyhow::bail!(api_error);
        }

        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_text).context("Failed to parse API response")?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Tokens: prompt={}, reply={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().with_context(|| {
            let reason = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            format!("Generation returned no text ({})", reason)
        })
    }
}
