use anyhow::Result;

use crate::config::CredentialStore;

pub async fn run_logout(config_dir: Option<String>) -> Result<()> {
    let store = CredentialStore::new(config_dir)?;

    if store.load()?.is_none() {
        println!("No API key is stored.");
        return Ok(());
    }

    store.remove()?;
    println!("✅ Stored API key removed.");

    Ok(())
}
