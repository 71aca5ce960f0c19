//! Automation-code generation orchestration.
//!
//! Turns an automation snapshot into one [`GeneratedFileSet`] per result key
//! by calling the generator and splitting each reply.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::TestCase;
use crate::generation::Generator;
use crate::splitter::{split_generated_code, GeneratedFileSet};

/// Result key used in combined mode
pub const COMBINED_KEY: &str = "combined";

/// How automation code is generated for a snapshot
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AutomationMode {
    /// One suite covering every case
    #[default]
    Combined,
    /// One class per case
    Separate,
}

/// What one generation call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationOutcome {
    Files(GeneratedFileSet),
    Failed(String),
}

/// Outcome for one result key (`"combined"` or a case id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationResult {
    pub key: String,
    pub outcome: AutomationOutcome,
}

impl AutomationResult {
    pub fn files(&self) -> Option<&GeneratedFileSet> {
        match &self.outcome {
            AutomationOutcome::Files(files) => Some(files),
            AutomationOutcome::Failed(_) => None,
        }
    }
}

/// All results of one automation request, in snapshot order
#[derive(Debug, Clone)]
pub struct AutomationRun {
    pub mode: AutomationMode,
    pub results: Vec<AutomationResult>,
    pub generated_at: DateTime<Utc>,
}

impl AutomationRun {
    /// True when the snapshot was empty.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&AutomationResult> {
        self.results.iter().find(|r| r.key == key)
    }

    pub fn failures(&self) -> impl Iterator<Item = &AutomationResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, AutomationOutcome::Failed(_)))
    }
}

async fn run_one<F>(key: String, call: F) -> AutomationResult
where
    F: std::future::Future<Output = anyhow::Result<String>>,
{
    let outcome = match call.await {
        Ok(text) if text.trim().is_empty() => {
            warn!("Automation generation for {} returned nothing", key);
            AutomationOutcome::Failed("Generation returned an empty reply".to_string())
        }
        Ok(text) => {
            let files = split_generated_code(&text);
            if files.is_empty() {
                warn!("Automation reply for {} has no file markers", key);
            }
            info!("{}: {} generated files", key, files.usable_count());
            AutomationOutcome::Files(files)
        }
        Err(e) => {
            warn!("Automation generation for {} failed: {:#}", key, e);
            AutomationOutcome::Failed(format!("{:#}", e))
        }
    };
    AutomationResult { key, outcome }
}

/// Generate automation code for `cases`.
///
/// In separate mode every case is attempted even when earlier ones fail.
/// An empty slice gives an empty run.
pub async fn generate_automation<G>(
    generator: &G,
    cases: &[TestCase],
    mode: AutomationMode,
) -> AutomationRun
where
    G: Generator + ?Sized,
{
    let mut results = Vec::new();

    if !cases.is_empty() {
        match mode {
            AutomationMode::Combined => {
                results.push(
                    run_one(
                        COMBINED_KEY.to_string(),
                        generator.generate_automation_for_many(cases),
                    )
                    .await,
                );
            }
            AutomationMode::Separate => {
                for case in cases {
                    results.push(
                        run_one(case.id.clone(), generator.generate_automation_for_one(case))
                            .await,
                    );
                }
            }
        }
    }

    AutomationRun {
        mode,
        results,
        generated_at: Utc::now(),
    }
}
