use std::path::Path;

use anyhow::{Context, Result};

use crate::extract::{extract_text, guess_mime_type};

pub async fn run_extract(file: &Path, mime: Option<String>) -> Result<()> {
    let mime = match mime {
        Some(mime) => mime,
        None => guess_mime_type(file)
            .with_context(|| {
                format!(
                    "Cannot tell the type of {}; pass --mime",
                    file.display()
                )
            })?
            .to_string(),
    };

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let text = extract_text(&mime, &bytes)?;
    println!("{}", text);
    Ok(())
}
