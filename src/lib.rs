//! franken-ai - stack detection and guideline generation for AI coding assistants
//!
//! The library inspects a project directory, decides which languages, frameworks
//! and tools it uses, and turns that verdict into two artifacts: the shell
//! commands that develop, build, test and lint the project, and a Markdown
//! guideline document ordered from the most specific technology down to the
//! styling layer.
//!
//! # Core Concepts
//!
//! - **Modules**: one [`modules::Module`] per technology. Each detects itself
//!   from a shared [`DetectionContext`], may exclude others (Statamic excludes
//!   Laravel), and names its guideline documents.
//! - **Detection**: [`ModuleManager`] runs every enabled module independently,
//!   then applies exclusions in a second pass.
//! - **Guidelines**: [`GuidelineManager`] collects, deduplicates and orders the
//!   guideline references of the surviving modules and loads their bodies from a
//!   [`guidelines::DocumentStore`].
//!
//! # Example Usage
//!
//! ```no_run
//! use franken_ai::{GuidelineManager, ModuleManager, ModuleRegistry, ProjectScanner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let ctx = ProjectScanner::new("/path/to/project")?.scan()?;
//! let manager = ModuleManager::from_registry(&ModuleRegistry::with_defaults()).await;
//! let outcome = manager.detect(&ctx).await;
//!
//! let guidelines = GuidelineManager::embedded();
//! let resolved = guidelines.resolve(&guidelines.collect(&outcome))?;
//! println!("{}", franken_ai::guidelines::render_document(&resolved));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod fs;
pub mod guidelines;
pub mod modules;
pub mod scanner;
pub mod util;

pub use config::{ConfigError, FrankenConfig};
pub use detection::{DetectionContext, DetectionResult, Evidence};
pub use error::{GuidelineError, ModuleError, ScanError};
pub use guidelines::{GuidelineEntry, GuidelineManager, ResolvedGuideline};
pub use modules::{
    DetectionOutcome, Module, ModuleContext, ModuleId, ModuleManager, ModuleRegistry, ModuleType,
    PriorityType, StackCommands,
};
pub use scanner::{ProjectScanner, ScanConfig};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
