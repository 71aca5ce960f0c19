mod args;
mod case_file;

pub use args::{Cli, Commands};
pub use case_file::{load_cases, save_cases};
