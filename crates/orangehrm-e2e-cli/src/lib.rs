//! hrm-e2e CLI library
//!
//! Command-line runner for the OrangeHRM My Info suite: lists scenarios,
//! runs a selection of them against a live installation, and prints a text
//! or JSON report.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)] // String building is clear and correct
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, FormatArg, ListArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render, render_json, render_text, OutputFormat, ProgressReporter};
pub use runner::{select_scenarios, SuiteRunner};
