use std::io::{self, Write};

use anyhow::Result;

use crate::config::{mask_key, CredentialStore, API_KEY_PAGE};

pub async fn run_login(
    api_key: Option<String>,
    model: Option<String>,
    config_dir: Option<String>,
) -> Result<()> {
    let store = CredentialStore::new(config_dir)?;

    // Check if a key is already stored
    if store.load()?.is_some() {
        println!("⚠️  An API key is already stored.");
        print!("Do you want to replace it? [y/N]: ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();

        if answer != "y" && answer != "yes" {
            println!("Login cancelled. Your existing key remains active.");
            return Ok(());
        }
    }

    let api_key = match api_key {
        Some(key) => key,
        None => {
            print!("Open the API key page in browser? [Y/n]: ");
            io::stdout().flush()?;

            let mut answer = String::new();
            io::stdin().read_line(&mut answer)?;
            let answer = answer.trim().to_lowercase();

            // Default to yes if user just presses Enter
            if answer.is_empty() || answer == "y" || answer == "yes" {
                println!("🌐 Opening {} in your browser...", API_KEY_PAGE);
                if open::that(API_KEY_PAGE).is_err() {
                    println!("⚠️  Could not open browser automatically.");
                }
            } else {
                println!("Create a key at {}", API_KEY_PAGE);
            }

            print!("\nPaste your API key here: ");
            io::stdout().flush()?;

            let mut pasted = String::new();
            io::stdin().read_line(&mut pasted)?;
            pasted.trim().to_string()
        }
    };

    store.save(&api_key, model.as_deref())?;

    println!("\n✅ API key {} saved.", mask_key(api_key.trim()));
    println!("   {}", store.credentials_path().display());

    Ok(())
}
