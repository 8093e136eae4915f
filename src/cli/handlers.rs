//! Subcommand handlers. Each returns the process exit code.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::commands::{DetectArgs, GuidelinesArgs, ModulesArgs};
use super::output::{DetectionReport, ModuleSummary, OutputFormatter};
use crate::config::FrankenConfig;
use crate::detection::DetectionContext;
use crate::fs::{FileSystem, RealFileSystem};
use crate::guidelines::{
    inject_guidelines, render_document, DocumentStore, EmbeddedDocumentStore, FsDocumentStore,
    GuidelineManager,
};
use crate::modules::{DetectionOutcome, ModuleManager, ModuleRegistry};
use crate::scanner::{ProjectScanner, ScanConfig};

pub async fn handle_detect(args: &DetectArgs) -> i32 {
    match run_detect(args).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Detection failed: {:#}", e);
            1
        }
    }
}

pub async fn handle_commands(args: &DetectArgs) -> i32 {
    match run_commands(args).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Command generation failed: {:#}", e);
            1
        }
    }
}

pub async fn handle_guidelines(args: &GuidelinesArgs, quiet: bool) -> i32 {
    match run_guidelines(args, quiet).await {
        Ok(()) => 0,
        Err(e) => {
            error!("Guideline generation failed: {:#}", e);
            1
        }
    }
}

pub async fn handle_modules(args: &ModulesArgs) -> i32 {
    match run_modules(args) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to list modules: {:#}", e);
            1
        }
    }
}

async fn run_detect(args: &DetectArgs) -> Result<String> {
    let config = load_config()?;
    let (ctx, outcome) = detect_project(args.project_path.as_deref(), &config).await?;

    let report = DetectionReport::from_outcome(ctx.project_root.clone(), &outcome);
    OutputFormatter::new(args.format.into()).format_detection(&report)
}

async fn run_commands(args: &DetectArgs) -> Result<String> {
    let config = load_config()?;
    let (ctx, outcome) = detect_project(args.project_path.as_deref(), &config).await?;

    let module_ctx = ModuleManager::module_context(&outcome, &ctx);
    let commands = ModuleManager::generate_commands(&outcome, &module_ctx);
    OutputFormatter::new(args.format.into()).format_commands(&commands)
}

async fn run_guidelines(args: &GuidelinesArgs, quiet: bool) -> Result<()> {
    let config = load_config()?;
    let (ctx, outcome) = detect_project(args.project_path.as_deref(), &config).await?;

    let store: Arc<dyn DocumentStore> = match args.guidelines_dir.as_ref().or(config.guidelines_dir.as_ref()) {
        Some(dir) => {
            debug!(dir = %dir.display(), "Reading guidelines from directory");
            Arc::new(FsDocumentStore::new(dir.clone()))
        }
        None => Arc::new(EmbeddedDocumentStore::new()),
    };
    let manager = GuidelineManager::new(store);
    let entries = manager.collect(&outcome);

    let resolved = if args.strict {
        manager
            .resolve(&entries)
            .context("Guideline body missing in strict mode")?
    } else {
        let (resolved, missing) = manager.resolve_available(&entries);
        if !missing.is_empty() {
            warn!(missing = missing.len(), "Some guidelines were skipped");
        }
        resolved
    };

    if args.stdout {
        print!("{}", render_document(&resolved));
        return Ok(());
    }

    let output = args.output.as_ref().unwrap_or(&config.output_file);
    let target = resolve_output_path(&ctx.project_root, output);

    let fs = RealFileSystem::new();
    let existing = fs.read_optional(&target)?.unwrap_or_default();
    fs.write(&target, &inject_guidelines(&existing, &resolved))?;

    info!(
        path = %target.display(),
        guidelines = resolved.len(),
        "Guideline document updated"
    );
    if !quiet {
        println!("Guidelines written to {}", target.display());
    }
    Ok(())
}

fn run_modules(args: &ModulesArgs) -> Result<String> {
    let config = load_config()?;
    let registry = build_registry(&config);
    OutputFormatter::new(args.format.into()).format_modules(&ModuleSummary::from_registry(&registry))
}

fn load_config() -> Result<FrankenConfig> {
    let config = FrankenConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);
    Ok(config)
}

/// Default registry with every module named in the configuration disabled.
pub fn build_registry(config: &FrankenConfig) -> ModuleRegistry {
    let mut registry = ModuleRegistry::with_defaults();
    for id in &config.disabled_modules {
        if !registry.disable(id) {
            warn!(module = %id, "Cannot disable unknown module");
        }
    }
    registry
}

async fn detect_project(
    path: Option<&Path>,
    config: &FrankenConfig,
) -> Result<(DetectionContext, DetectionOutcome)> {
    let start = Instant::now();
    let root = match path {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().context("Failed to determine current directory")?,
    };

    let scanner = ProjectScanner::new(&root)?.with_config(ScanConfig {
        max_files: config.max_files,
        ..Default::default()
    });
    let ctx = scanner.scan()?;

    let registry = build_registry(config);
    let manager = ModuleManager::from_registry(&registry)
        .await
        .with_timeout(config.detect_timeout());
    let outcome = manager.detect(&ctx).await;

    debug!(
        root = %ctx.project_root.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Project detection finished"
    );
    Ok((ctx, outcome))
}

fn resolve_output_path(project_root: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        project_root.join(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ModuleId;

    #[test]
    fn test_build_registry_disables_configured_modules() {
        let config = FrankenConfig {
            disabled_modules: vec![ModuleId::Vue, ModuleId::Custom("symfony".to_string())],
            ..Default::default()
        };
        let registry = build_registry(&config);

        assert!(!registry.is_enabled(&ModuleId::Vue));
        assert!(registry.is_enabled(&ModuleId::React));
        assert!(!registry.contains(&ModuleId::Custom("symfony".to_string())));
    }

    #[test]
    fn test_relative_output_resolves_against_project() {
        let root = Path::new("/work/app");
        assert_eq!(
            resolve_output_path(root, Path::new("CLAUDE.md")),
            PathBuf::from("/work/app/CLAUDE.md")
        );
        assert_eq!(
            resolve_output_path(root, Path::new("/tmp/out.md")),
            PathBuf::from("/tmp/out.md")
        );
    }
}
