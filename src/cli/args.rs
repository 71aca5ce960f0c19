use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::automation::AutomationMode;
use crate::domain::Priority;

/// Default JSON file holding the test cases between invocations
pub const DEFAULT_CASES_FILE: &str = "test_cases.json";

/// QE Suite - AI-assisted test case authoring and Selenium automation
#[derive(Parser)]
#[command(name = "qe-suite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as MCP server over stdio
    #[arg(long)]
    pub mcp: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Select model to use
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Directory holding credentials.json. Defaults to ~/.qe-suite
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a Gemini API key
    Login {
        /// API key (prompted for when absent)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Remove the stored API key
    Logout,
    /// Show which API key and model are in use
    Status,
    /// List the test cases in a case file
    List {
        #[arg(short, long, default_value = DEFAULT_CASES_FILE)]
        cases: PathBuf,
    },
    /// Generate test cases with AI and append them to the case file
    Generate {
        #[arg(short, long, default_value = DEFAULT_CASES_FILE)]
        cases: PathBuf,

        /// Requirements document (txt, pdf, docx, csv, xls, xlsx)
        #[arg(short, long, conflicts_with = "text")]
        requirements: Option<PathBuf>,

        /// Requirements or user story text
        #[arg(short, long)]
        text: Option<String>,

        /// MIME type of the requirements document (guessed from the extension if absent)
        #[arg(long)]
        mime: Option<String>,

        /// Number of test cases to generate (1-50)
        #[arg(short = 'n', long, default_value_t = 5)]
        count: u32,

        /// Priority for cases the model does not classify
        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,
    },
    /// Add a test case by hand
    Add {
        #[arg(short, long, default_value = DEFAULT_CASES_FILE)]
        cases: PathBuf,

        #[arg(long, default_value = "")]
        area: String,

        #[arg(long, default_value = "")]
        module: String,

        #[arg(long, default_value = "")]
        submodule: String,

        /// Test scenario
        #[arg(long, default_value = "")]
        title: String,

        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,

        /// Preconditions, one per line
        #[arg(long, default_value = "")]
        preconditions: String,

        /// Test data, one item per line
        #[arg(long, default_value = "")]
        test_data: String,

        /// Test steps, one per line
        #[arg(long, default_value = "")]
        steps: String,

        /// Expected results, one per line
        #[arg(long, default_value = "")]
        expected: String,

        /// Files to attach
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },
    /// Generate automation code and write one zip archive per result
    Automate {
        #[arg(short, long, default_value = DEFAULT_CASES_FILE)]
        cases: PathBuf,

        /// Test case ids to automate (default: cases marked selected in the file)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Automate every test case
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        #[arg(long, value_enum, default_value_t = AutomationMode::Combined)]
        mode: AutomationMode,

        /// Directory to write the archives to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Export the test cases to an .xlsx workbook
    Export {
        #[arg(short, long, default_value = DEFAULT_CASES_FILE)]
        cases: PathBuf,

        #[arg(short, long, default_value = crate::export::SPREADSHEET_FILE_NAME)]
        out: PathBuf,
    },
    /// Print the text extracted from a document
    Extract {
        file: PathBuf,

        /// Declared MIME type (guessed from the extension if absent)
        #[arg(long)]
        mime: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "qe-suite", "generate", "--text", "As a user", "-n", "3", "-p", "high",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Generate {
                text,
                count,
                priority,
                cases,
                ..
            }) => {
                assert_eq!(text.as_deref(), Some("As a user"));
                assert_eq!(count, 3);
                assert_eq!(priority, Priority::High);
                assert_eq!(cases, PathBuf::from(DEFAULT_CASES_FILE));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_automate() {
        let cli = Cli::try_parse_from([
            "qe-suite", "automate", "--id", "TC_001", "--id", "TC_003", "--mode", "separate",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Automate { ids, mode, all, .. }) => {
                assert_eq!(ids, vec!["TC_001", "TC_003"]);
                assert_eq!(mode, AutomationMode::Separate);
                assert!(!all);
            }
            _ => panic!("expected automate"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qe-suite", "status", "-v", "-m", "gemini-1.5-pro"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.model.as_deref(), Some("gemini-1.5-pro"));
    }
}
