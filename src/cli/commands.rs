use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stack detection and guideline generation for AI coding assistants
#[derive(Parser, Debug)]
#[command(
    name = "franken",
    about = "Stack detection and guideline generation for AI coding assistants",
    version,
    long_about = "franken inspects a project's files and manifests, decides which languages, \
                  frameworks and tools are in use, and produces the matching build, test and lint \
                  commands plus a priority-ordered guideline document for coding assistants."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Detect the technologies used by a project",
        long_about = "Runs every enabled module against the project and prints the technologies \
                      that survive exclusion, with confidence, version and evidence.\n\n\
                      Examples:\n  \
                      franken detect\n  \
                      franken detect /path/to/project\n  \
                      franken detect --format json"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Print the merged dev, build, test, lint and install commands",
        long_about = "Detects the stack and prints the commands every surviving module \
                      contributes, merged in registration order.\n\n\
                      Examples:\n  \
                      franken commands\n  \
                      franken commands --format yaml"
    )]
    Commands(DetectArgs),

    #[command(
        about = "Generate the project guideline document",
        long_about = "Detects the stack, collects the guidelines of every surviving module and \
                      writes them into the output file between the FrankenAI markers. Existing \
                      content outside the markers is preserved.\n\n\
                      Examples:\n  \
                      franken guidelines\n  \
                      franken guidelines --stdout\n  \
                      franken guidelines --output AGENTS.md --strict"
    )]
    Guidelines(GuidelinesArgs),

    #[command(about = "List registered modules and whether they are enabled")]
    Modules(ModulesArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[arg(value_name = "PATH", help = "Path to project (defaults to current directory)")]
    pub project_path: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct GuidelinesArgs {
    #[arg(value_name = "PATH", help = "Path to project (defaults to current directory)")]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Document to write, relative to the project (defaults to FRANKENAI_OUTPUT_FILE or CLAUDE.md)"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, conflicts_with = "output", help = "Print the document instead of writing it")]
    pub stdout: bool,

    #[arg(long, help = "Fail when a guideline body cannot be found")]
    pub strict: bool,

    #[arg(long, value_name = "DIR", help = "Read guideline bodies from this directory")]
    pub guidelines_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ModulesArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_detect_args() {
        let args = CliArgs::parse_from(["franken", "detect"]);
        match args.command {
            Commands::Detect(detect_args) => {
                assert_eq!(detect_args.format, OutputFormatArg::Human);
                assert!(detect_args.project_path.is_none());
            }
            _ => panic!("Expected Detect command"),
        }
        assert!(!args.verbose);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_commands_with_path_and_format() {
        let args = CliArgs::parse_from(["franken", "commands", "/tmp/app", "--format", "json"]);
        match args.command {
            Commands::Commands(detect_args) => {
                assert_eq!(detect_args.project_path, Some(PathBuf::from("/tmp/app")));
                assert_eq!(detect_args.format, OutputFormatArg::Json);
            }
            _ => panic!("Expected Commands command"),
        }
    }

    #[test]
    fn test_guidelines_flags() {
        let args = CliArgs::parse_from([
            "franken",
            "guidelines",
            "--strict",
            "--guidelines-dir",
            "/opt/guides",
            "-q",
        ]);
        assert!(args.quiet);
        match args.command {
            Commands::Guidelines(g) => {
                assert!(g.strict);
                assert!(!g.stdout);
                assert_eq!(g.guidelines_dir, Some(PathBuf::from("/opt/guides")));
            }
            _ => panic!("Expected Guidelines command"),
        }
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        let result = CliArgs::try_parse_from([
            "franken",
            "guidelines",
            "--stdout",
            "--output",
            "AGENTS.md",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["franken", "modules", "-v", "-q"]).is_err());
    }
}
