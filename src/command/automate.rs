use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::api::CliMode;
use crate::automation::{AutomationMode, AutomationOutcome, AutomationRun};
use crate::cli::load_cases;
use crate::export::{archive_name, write_archive};
use crate::generation::Generator;
use crate::session::Session;
use crate::workspace::AutomationSelection;

use super::build_generator;

/// Which cases to automate
pub enum Target {
    /// Cases already marked selected in the case file
    Selected,
    All,
    Ids(Vec<String>),
}

impl Target {
    pub fn new(ids: Vec<String>, all: bool) -> Self {
        match (ids.is_empty(), all) {
            (_, true) => Target::All,
            (false, false) => Target::Ids(ids),
            (true, false) => Target::Selected,
        }
    }
}

/// Apply the target to the session's selection and take the snapshot.
fn request(session: &mut Session, target: Target) -> Result<()> {
    let workspace = &mut session.workspace;
    match target {
        Target::Selected => {}
        Target::All => {
            workspace.select_all(true)?;
        }
        Target::Ids(ids) => {
            workspace.select_all(false)?;
            for id in &ids {
                if workspace.get(id).is_some_and(|case| case.selected) {
                    continue;
                }
                workspace.toggle_select(id)?;
            }
        }
    }
    workspace.request_automation(AutomationSelection::Selected)?;
    Ok(())
}

/// Write one archive per successful result and report failures.
/// Returns the number of archives written.
fn write_archives(run: &AutomationRun, out_dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = 0;
    for result in &run.results {
        match &result.outcome {
            AutomationOutcome::Failed(reason) => {
                println!("❌ {}: {}", result.key, reason);
            }
            AutomationOutcome::Files(files) => match write_archive(files) {
                Ok(bytes) => {
                    let path = out_dir.join(archive_name(&result.key));
                    std::fs::write(&path, bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "✅ {}: {} files -> {}",
                        result.key,
                        files.usable_count(),
                        path.display()
                    );
                    written += 1;
                }
                Err(e) => println!("⚠️  {}: {}", result.key, e),
            },
        }
    }
    Ok(written)
}

async fn automate_with<G>(
    generator: &G,
    session: &mut Session,
    mode: AutomationMode,
    out_dir: &Path,
) -> Result<usize>
where
    G: Generator + ?Sized,
{
    let run = session.generate_automation(generator, mode).await;
    debug!("Automation run finished at {}", run.generated_at);
    write_archives(run, out_dir)
}

pub async fn run_automate(
    cases_path: &Path,
    target: Target,
    mode: AutomationMode,
    out_dir: &Path,
    config_dir: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let mut session = Session::restore(load_cases(cases_path)?);
    request(&mut session, target)?;

    let count = session.workspace.selected_for_automation().len();
    if count == 0 {
        println!("Nothing to automate. Mark cases as selected, or pass --id or --all.");
        return Ok(());
    }

    let generator = build_generator(config_dir, model.as_deref(), CliMode::Command)?;
    println!("🤖 Generating automation code for {} test cases...", count);
    let written = automate_with(&generator, &mut session, mode, out_dir).await?;

    if written == 0 {
        anyhow::bail!("No automation code was generated");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::COMBINED_KEY;
    use crate::domain::TestCaseForm;
    use crate::generation::testing::FakeGenerator;
    use tempfile::tempdir;

    fn session(n: usize) -> Session {
        let mut session = Session::new();
        for i in 0..n {
            session
                .workspace
                .create_manual(TestCaseForm {
                    title: format!("case {}", i),
                    steps: "Open app".to_string(),
                    expected: "It works".to_string(),
                    ..Default::default()
                })
                .unwrap();
        }
        session
    }

    #[test]
    fn test_target_selection() {
        let mut s = session(3);
        request(&mut s, Target::new(vec!["TC_002".to_string()], false)).unwrap();
        let ids: Vec<&str> = s
            .workspace
            .selected_for_automation()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["TC_002"]);

        request(&mut s, Target::new(vec![], true)).unwrap();
        assert_eq!(s.workspace.selected_for_automation().len(), 3);

        let mut s = session(2);
        request(&mut s, Target::new(vec![], false)).unwrap();
        assert!(s.workspace.selected_for_automation().is_empty());

        assert!(request(&mut s, Target::Ids(vec!["TC_404".to_string()])).is_err());
    }

    #[test]
    fn test_repeated_id_stays_selected() {
        let mut s = session(2);
        let ids = vec!["TC_001".to_string(), "TC_001".to_string()];
        request(&mut s, Target::new(ids, false)).unwrap();

        let snapshot = s.workspace.selected_for_automation();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "TC_001");
    }

    #[tokio::test]
    async fn test_separate_mode_writes_successful_archives() {
        let tmp = tempdir().unwrap();
        let mut s = session(2);
        request(&mut s, Target::All).unwrap();

        let generator =
            FakeGenerator::default().reply("TC_001", "// FILE: OneTest.java\nclass OneTest{}");
        let written = automate_with(&generator, &mut s, AutomationMode::Separate, tmp.path())
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert!(tmp.path().join("TC_001_automation.zip").exists());
        assert!(!tmp.path().join("TC_002_automation.zip").exists());
    }

    #[tokio::test]
    async fn test_combined_mode_archive_name() {
        let tmp = tempdir().unwrap();
        let mut s = session(2);
        request(&mut s, Target::All).unwrap();

        let generator = FakeGenerator::default()
            .reply(COMBINED_KEY, "// FILE: pom.xml\n<project/>\n// FILE: SuiteTest.java\nclass S{}");
        automate_with(&generator, &mut s, AutomationMode::Combined, tmp.path())
            .await
            .unwrap();
        assert!(tmp.path().join("CombinedTestSuite.zip").exists());
    }
}
