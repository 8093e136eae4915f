//! Error types shared across the detection engine

use crate::modules::ModuleId;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a single module or by module registration.
///
/// Detection-time variants never escape [`crate::modules::ModuleManager`]; they
/// are logged and the offending module is treated as not detected.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Module {module} failed during detection: {message}")]
    Detection { module: ModuleId, message: String },

    #[error("Module {module} timed out after {seconds} seconds")]
    Timeout { module: ModuleId, seconds: u64 },

    #[error("Module {module} panicked")]
    Panicked { module: ModuleId },

    #[error("Failed to instantiate module {module}: {message}")]
    Factory { module: ModuleId, message: String },

    #[error("Module {0} is already registered")]
    DuplicateRegistration(ModuleId),
}

impl ModuleError {
    pub fn detection(module: ModuleId, message: impl Into<String>) -> Self {
        ModuleError::Detection {
            module,
            message: message.into(),
        }
    }
}

/// Guideline body lookup failures
#[derive(Debug, Error)]
pub enum GuidelineError {
    #[error("No guideline document found for {path}")]
    NotFound { path: String },

    #[error("Failed to read guideline {path}: {message}")]
    Io { path: String, message: String },
}

impl GuidelineError {
    pub fn path(&self) -> &str {
        match self {
            GuidelineError::NotFound { path } | GuidelineError::Io { path, .. } => path,
        }
    }
}

/// Project scanning failures
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Project path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Project path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk project directory: {0}")]
    Walk(String),
}
