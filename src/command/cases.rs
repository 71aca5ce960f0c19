use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::api::CliMode;
use crate::cli::{load_cases, save_cases};
use crate::domain::{Attachment, Priority, TestCaseForm};
use crate::export::write_spreadsheet;
use crate::extract::{extract_text_or_empty, guess_mime_type};
use crate::generation::PromptSource;
use crate::session::Session;
use crate::workspace::Change;

use super::build_generator;

const OCTET_STREAM: &str = "application/octet-stream";

pub async fn run_list(cases_path: &Path) -> Result<()> {
    let session = Session::restore(load_cases(cases_path)?);
    let workspace = &session.workspace;

    if workspace.cases().is_empty() {
        println!("No test cases in {}", cases_path.display());
        return Ok(());
    }

    for case in workspace.cases() {
        let mark = if case.selected { "x" } else { " " };
        let breadcrumb = case.breadcrumb();
        if breadcrumb.is_empty() {
            println!("[{}] {} {:<6} {}", mark, case.id, case.priority, case.title);
        } else {
            println!(
                "[{}] {} {:<6} {} ({})",
                mark, case.id, case.priority, case.title, breadcrumb
            );
        }
    }

    let stats = workspace.stats();
    println!(
        "\n{} test cases, {} selected (High {}, Medium {}, Low {})",
        stats.total, stats.selected, stats.high, stats.medium, stats.low
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn run_generate(
    cases_path: &Path,
    requirements: Option<PathBuf>,
    text: Option<String>,
    mime: Option<String>,
    count: u32,
    priority: Priority,
    config_dir: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let prompt = match (text, requirements) {
        (Some(text), _) => text,
        (None, Some(path)) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mime = mime
                .or_else(|| guess_mime_type(&path).map(str::to_string))
                .unwrap_or_else(|| OCTET_STREAM.to_string());
            extract_text_or_empty(&mime, &bytes)
        }
        (None, None) => bail!("Provide --text or --requirements"),
    };

    let generator = build_generator(config_dir, model.as_deref(), CliMode::Command)?;
    let mut session = Session::restore(load_cases(cases_path)?);

    println!("🤖 Generating {} test cases...", count);
    let transition = session
        .workspace
        .generate_from_prompt(
            &generator,
            &PromptSource::Requirements(prompt),
            count,
            priority,
        )
        .await?;

    match transition.change {
        Change::Generated {
            failure: Some(reason),
            ..
        } => {
            println!("❌ Generation failed, no test cases were added.");
            println!("   {}", reason);
        }
        Change::Generated { ids, .. } if ids.is_empty() => {
            println!("⚠️  The model returned no usable test cases.");
        }
        Change::Generated { ids, .. } => {
            save_cases(cases_path, session.workspace.cases())?;
            println!(
                "✅ Generated {} test cases: {}",
                ids.len(),
                ids.join(", ")
            );
        }
        other => warn!("Unexpected change: {:?}", other),
    }

    Ok(())
}

pub async fn run_add(
    cases_path: &Path,
    mut form: TestCaseForm,
    attachments: Vec<PathBuf>,
) -> Result<()> {
    for path in attachments {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read attachment {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime = guess_mime_type(&path).unwrap_or(OCTET_STREAM);
        form.attachments
            .push(Attachment::from_bytes(name, mime, &bytes));
    }

    let mut session = Session::restore(load_cases(cases_path)?);
    let transition = session.workspace.create_manual(form)?;
    save_cases(cases_path, session.workspace.cases())?;

    if let Change::Created { id } = transition.change {
        println!("✅ Created {}", id);
    }
    Ok(())
}

pub async fn run_export(cases_path: &Path, out: &Path) -> Result<()> {
    let cases = load_cases(cases_path)?;
    let bytes = write_spreadsheet(&cases)?;
    std::fs::write(out, bytes).with_context(|| format!("Failed to write {}", out.display()))?;

    println!("✅ Exported {} test cases to {}", cases.len(), out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_add_then_export() {
        let tmp = tempdir().unwrap();
        let cases_path = tmp.path().join("cases.json");
        let attachment = tmp.path().join("note.txt");
        std::fs::write(&attachment, "hello").unwrap();

        let form = TestCaseForm {
            title: "User login with valid credentials".to_string(),
            steps: "1. Open app\n2. Enter creds\n3. Submit".to_string(),
            expected: "Dashboard shown".to_string(),
            ..Default::default()
        };
        run_add(&cases_path, form, vec![attachment]).await.unwrap();

        let cases = load_cases(&cases_path).unwrap();
        assert_eq!(cases[0].id, "TC_001");
        assert_eq!(cases[0].attachments[0].name, "note.txt");
        assert_eq!(cases[0].attachments[0].mime_type, "text/plain");

        let out = tmp.path().join("cases.xlsx");
        run_export(&cases_path, &out).await.unwrap();
        assert!(out.exists());
    }

    #[tokio::test]
    async fn test_add_rejects_missing_fields() {
        let tmp = tempdir().unwrap();
        let cases_path = tmp.path().join("cases.json");

        let err = run_add(&cases_path, TestCaseForm::default(), vec![])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("required fields"));
        assert!(!cases_path.exists());
    }
}
