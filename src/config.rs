//! Credential storage for the generation service.
//!
//! The API key and model are read from the environment first and then from
//! `~/.qe-suite/credentials.json` (or a custom config directory).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Page where users create an API key
pub const API_KEY_PAGE: &str = "https://aistudio.google.com/app/apikey";

/// Contents of credentials.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Where the resolved API key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    File,
}

/// Fully resolved settings for talking to the generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub source: CredentialSource,
}

/// Credential store
///
/// Manages credentials.json under ~/.qe-suite (or a custom config directory).
pub struct CredentialStore {
    credentials_path: PathBuf,
}

impl CredentialStore {
    /// Create a new credential store
    ///
    /// # Arguments
    /// * `config_dir` - Optional custom config directory. Defaults to ~/.qe-suite
    pub fn new(config_dir: Option<String>) -> Result<Self> {
        let base_dir = match config_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".qe-suite"),
        };

        std::fs::create_dir_all(&base_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", base_dir))?;

        Ok(Self {
            credentials_path: base_dir.join("credentials.json"),
        })
    }

    pub fn credentials_path(&self) -> &PathBuf {
        &self.credentials_path
    }

    fn parse_credentials(raw: &str) -> Option<Credentials> {
        match serde_json::from_str::<Credentials>(raw) {
            Ok(creds) if creds.api_key.trim().is_empty() => {
                warn!("Credentials file has an empty API key");
                None
            }
            Ok(creds) => Some(creds),
            Err(e) => {
                warn!("Failed to parse credentials JSON: {}", e);
                None
            }
        }
    }

    /// Load the saved credentials file, ignoring the environment.
    pub fn load(&self) -> Result<Option<Credentials>> {
        if !self.credentials_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.credentials_path).with_context(|| {
            format!(
                "Failed to read credentials file: {:?}",
                self.credentials_path
            )
        })?;

        Ok(Self::parse_credentials(&content))
    }

    /// Resolve the provider settings from the process environment.
    ///
    /// Priority:
    /// 1. GEMINI_API_KEY (with GEMINI_MODEL / GEMINI_BASE_URL)
    /// 2. credentials.json
    ///
    /// `model_override` wins over both when given.
    pub fn resolve(&self, model_override: Option<&str>) -> Result<Option<ProviderConfig>> {
        self.resolve_with(model_override, |key| std::env::var(key).ok())
    }

    /// Same as [`resolve`](Self::resolve) with a custom environment lookup.
    pub fn resolve_with<F>(
        &self,
        model_override: Option<&str>,
        env: F,
    ) -> Result<Option<ProviderConfig>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let model_override = model_override
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        if let Some(api_key) = env(API_KEY_ENV) {
            debug!("Using API key from {}", API_KEY_ENV);
            return Ok(Some(ProviderConfig {
                api_key,
                model: model_override
                    .or_else(|| env(MODEL_ENV))
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: env(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                source: CredentialSource::Environment,
            }));
        }

        let Some(creds) = self.load()? else {
            return Ok(None);
        };

        Ok(Some(ProviderConfig {
            api_key: creds.api_key,
            model: model_override
                .or_else(|| env(MODEL_ENV))
                .or(creds.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: env(BASE_URL_ENV)
                .or(creds.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            source: CredentialSource::File,
        }))
    }

    /// Save an API key (and optional model) to credentials.json
    pub fn save(&self, api_key: &str, model: Option<&str>) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            anyhow::bail!("API key cannot be empty");
        }

        let creds = Credentials {
            api_key: api_key.to_string(),
            model: model.map(str::to_string),
            base_url: None,
            saved_at: Some(Utc::now()),
        };

        let content =
            serde_json::to_string_pretty(&creds).context("Failed to serialize credentials")?;

        std::fs::write(&self.credentials_path, content).with_context(|| {
            format!(
                "Failed to write credentials file: {:?}",
                self.credentials_path
            )
        })?;

        info!("Credentials saved successfully");
        debug!("Credentials saved to {:?}", self.credentials_path);

        Ok(())
    }

    /// Remove the saved credentials
    pub fn remove(&self) -> Result<()> {
        if self.credentials_path.exists() {
            std::fs::remove_file(&self.credentials_path).with_context(|| {
                format!(
                    "Failed to remove credentials file: {:?}",
                    self.credentials_path
                )
            })?;
        }

        info!("Credentials removed successfully");

        Ok(())
    }
}

/// Mask an API key for display, keeping the last four characters.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
