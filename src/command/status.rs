use anyhow::Result;

use crate::config::{mask_key, CredentialSource, CredentialStore, API_KEY_ENV};

pub async fn run_status(config_dir: Option<String>, model: Option<String>) -> Result<()> {
    let store = CredentialStore::new(config_dir)?;

    match store.resolve(model.as_deref())? {
        Some(config) => {
            println!("✅ API key configured: {}", mask_key(&config.api_key));
            match config.source {
                CredentialSource::Environment => println!("   Source: {}", API_KEY_ENV),
                CredentialSource::File => {
                    println!("   Source: {}", store.credentials_path().display())
                }
            }
            println!("   Model: {}", config.model);
            println!("   Endpoint: {}", config.base_url);
        }
        None => {
            println!("❌ No API key configured");
            println!("   Run 'qe-suite login' or set {}.", API_KEY_ENV);
        }
    }

    Ok(())
}
