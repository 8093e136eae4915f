use franken_ai::cli::commands::{CliArgs, Commands};
use franken_ai::cli::handlers::{handle_commands, handle_detect, handle_guidelines, handle_modules};
use franken_ai::util::logging::{init_logging, parse_level, LoggingConfig, LOG_JSON_ENV, LOG_LEVEL_ENV};
use franken_ai::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("franken v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args).await,
        Commands::Commands(detect_args) => handle_commands(detect_args).await,
        Commands::Guidelines(guidelines_args) => handle_guidelines(guidelines_args, args.quiet).await,
        Commands::Modules(modules_args) => handle_modules(modules_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    let use_json = env::var(LOG_JSON_ENV)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        ..LoggingConfig::with_level(level)
    });
}
