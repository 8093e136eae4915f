pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, DetectArgs, GuidelinesArgs, ModulesArgs, OutputFormatArg};
pub use output::{DetectionReport, ModuleSummary, OutputFormat, OutputFormatter};
