use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod automation;
mod cli;
mod command;
mod config;
mod domain;
mod export;
mod extract;
mod generation;
mod mcp;
mod session;
mod splitter;
mod workspace;

use cli::{Cli, Commands};
use domain::TestCaseForm;
use generation::Generator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // If --mcp flag is set, run as MCP server
    if cli.mcp {
        let generator: Option<Arc<dyn Generator>> =
            match command::build_generator(cli.config_dir, cli.model.as_deref(), api::CliMode::Mcp)
            {
                Ok(generator) => Some(Arc::new(generator)),
                Err(e) => {
                    warn!("{:#}", e);
                    None
                }
            };
        return mcp::run_mcp_server(generator).await;
    }

    let config_dir = cli.config_dir;
    let model = cli.model;

    // Otherwise, handle subcommands
    match cli.command {
        Some(Commands::Login { api_key }) => {
            command::run_login(api_key, model, config_dir).await?;
        }
        Some(Commands::Logout) => {
            command::run_logout(config_dir).await?;
        }
        Some(Commands::Status) => {
            command::run_status(config_dir, model).await?;
        }
        Some(Commands::List { cases }) => {
            command::run_list(&cases).await?;
        }
        Some(Commands::Generate {
            cases,
            requirements,
            text,
            mime,
            count,
            priority,
        }) => {
            command::run_generate(
                &cases,
                requirements,
                text,
                mime,
                count,
                priority,
                config_dir,
                model,
            )
            .await?;
        }
        Some(Commands::Add {
            cases,
            area,
            module,
            submodule,
            title,
            priority,
            preconditions,
            test_data,
            steps,
            expected,
            attachments,
        }) => {
            let form = TestCaseForm {
                area,
                module,
                submodule,
                title,
                priority,
                preconditions,
                test_data,
                steps,
                expected,
                attachments: Vec::new(),
            };
            command::run_add(&cases, form, attachments).await?;
        }
        Some(Commands::Automate {
            cases,
            ids,
            all,
            mode,
            out_dir,
        }) => {
            command::run_automate(
                &cases,
                command::Target::new(ids, all),
                mode,
                &out_dir,
                config_dir,
                model,
            )
            .await?;
        }
        Some(Commands::Export { cases, out }) => {
            command::run_export(&cases, &out).await?;
        }
        Some(Commands::Extract { file, mime }) => {
            command::run_extract(&file, mime).await?;
        }
        None => {
            // No command specified, show help
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!(
                "Use 'qe-suite login' to store an API key or 'qe-suite --mcp' to start the MCP server."
            );
        }
    }

    Ok(())
}
