mod automate;
mod cases;
mod extract;
mod login;
mod logout;
mod status;

pub use automate::{run_automate, Target};
pub use cases::{run_add, run_export, run_generate, run_list};
pub use extract::run_extract;
pub use login::run_login;
pub use logout::run_logout;
pub use status::run_status;

use anyhow::{Context, Result};

use crate::api::{ApiClient, CliMode};
use crate::config::CredentialStore;
use crate::generation::GeminiGenerator;

/// Build the Gemini generator from stored or environment credentials.
pub fn build_generator(
    config_dir: Option<String>,
    model: Option<&str>,
    mode: CliMode,
) -> Result<GeminiGenerator> {
    let store = CredentialStore::new(config_dir)?;
    let config = store.resolve(model)?.context(
        "No API key configured. Run 'qe-suite login' or set GEMINI_API_KEY.",
    )?;
    let client = ApiClient::new(&config, mode)?;
    Ok(GeminiGenerator::new(client))
}
