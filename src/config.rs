//! Configuration loaded from environment variables
//!
//! # Environment Variables
//!
//! - `FRANKENAI_LOG_LEVEL`: logging level - default: "info"
//! - `FRANKENAI_GUIDELINES_DIR`: read guideline bodies from this directory instead
//!   of the bundled set - default: unset
//! - `FRANKENAI_DETECT_TIMEOUT_SECS`: per-module timeout for detection calls -
//!   default: "30"
//! - `FRANKENAI_DISABLED_MODULES`: comma-separated module ids to skip - default: ""
//! - `FRANKENAI_MAX_FILES`: scan limit - default: "20000"
//! - `FRANKENAI_OUTPUT_FILE`: document written by `franken guidelines` -
//!   default: "CLAUDE.md"
//!
//! # Example
//!
//! ```no_run
//! use franken_ai::FrankenConfig;
//!
//! # fn example() -> Result<(), franken_ai::ConfigError> {
//! let config = FrankenConfig::from_env()?;
//! config.validate()?;
//! println!("{}", config);
//! # Ok(())
//! # }
//! ```

use crate::modules::ModuleId;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const LOG_LEVEL_ENV: &str = "FRANKENAI_LOG_LEVEL";
pub const GUIDELINES_DIR_ENV: &str = "FRANKENAI_GUIDELINES_DIR";
pub const DETECT_TIMEOUT_ENV: &str = "FRANKENAI_DETECT_TIMEOUT_SECS";
pub const DISABLED_MODULES_ENV: &str = "FRANKENAI_DISABLED_MODULES";
pub const MAX_FILES_ENV: &str = "FRANKENAI_MAX_FILES";
pub const OUTPUT_FILE_ENV: &str = "FRANKENAI_OUTPUT_FILE";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DETECT_TIMEOUT_SECS: u64 = 30;
const MAX_DETECT_TIMEOUT_SECS: u64 = 600;
const DEFAULT_MAX_FILES: usize = 20_000;
const DEFAULT_OUTPUT_FILE: &str = "CLAUDE.md";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrankenConfig {
    pub log_level: String,

    /// Directory of guideline bodies overriding the bundled set
    pub guidelines_dir: Option<PathBuf>,

    pub detect_timeout_secs: u64,

    pub disabled_modules: Vec<ModuleId>,

    pub max_files: usize,

    /// Relative paths resolve against the scanned project root
    pub output_file: PathBuf,
}

impl Default for FrankenConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            guidelines_dir: None,
            detect_timeout_secs: DEFAULT_DETECT_TIMEOUT_SECS,
            disabled_modules: Vec::new(),
            max_files: DEFAULT_MAX_FILES,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl FrankenConfig {
    /// Defaults overridden by any `FRANKENAI_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let log_level = env::var(LOG_LEVEL_ENV)
            .map(|v| v.trim().to_lowercase())
            .unwrap_or(defaults.log_level);

        let guidelines_dir = non_empty_var(GUIDELINES_DIR_ENV).map(PathBuf::from);

        let detect_timeout_secs =
            parse_var(DETECT_TIMEOUT_ENV)?.unwrap_or(defaults.detect_timeout_secs);

        let disabled_modules = non_empty_var(DISABLED_MODULES_ENV)
            .map(|v| parse_module_list(&v))
            .unwrap_or_default();

        let max_files = parse_var(MAX_FILES_ENV)?.unwrap_or(defaults.max_files);

        let output_file = non_empty_var(OUTPUT_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.output_file);

        Ok(Self {
            log_level,
            guidelines_dir,
            detect_timeout_secs,
            disabled_modules,
            max_files,
            output_file,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detect_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Detection timeout must be at least 1 second".to_string(),
            ));
        }
        if self.detect_timeout_secs > MAX_DETECT_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Detection timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.max_files == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max files must be at least 1".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if self.output_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Output file cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn detect_timeout(&self) -> Duration {
        Duration::from_secs(self.detect_timeout_secs)
    }

    pub fn is_disabled(&self, id: &ModuleId) -> bool {
        self.disabled_modules.contains(id)
    }
}

impl fmt::Display for FrankenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FrankenAI Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        match &self.guidelines_dir {
            Some(dir) => writeln!(f, "  Guidelines: {}", dir.display())?,
            None => writeln!(f, "  Guidelines: bundled")?,
        }
        writeln!(f, "  Detect Timeout: {}s", self.detect_timeout_secs)?;
        if !self.disabled_modules.is_empty() {
            let ids: Vec<&str> = self.disabled_modules.iter().map(ModuleId::key).collect();
            writeln!(f, "  Disabled Modules: {}", ids.join(", "))?;
        }
        writeln!(f, "  Max Files: {}", self.max_files)?;
        writeln!(f, "  Output File: {}", self.output_file.display())?;
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    non_empty_var(key)
        .map(|v| {
            v.parse::<T>().map_err(|e| ConfigError::ParseError {
                field: key.to_string(),
                error: e.to_string(),
            })
        })
        .transpose()
}

/// Comma-separated ids; blanks are skipped and duplicates collapsed.
pub fn parse_module_list(value: &str) -> Vec<ModuleId> {
    let mut ids: Vec<ModuleId> = Vec::new();
    for id in value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ModuleId::from_key(&s.to_lowercase()))
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clear_all() -> Vec<EnvGuard> {
        [
            LOG_LEVEL_ENV,
            GUIDELINES_DIR_ENV,
            DETECT_TIMEOUT_ENV,
            DISABLED_MODULES_ENV,
            MAX_FILES_ENV,
            OUTPUT_FILE_ENV,
        ]
        .iter()
        .map(|key| EnvGuard::unset(key))
        .collect()
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clear_all();

        let config = FrankenConfig::from_env().unwrap();

        assert_eq!(config, FrankenConfig::default());
        assert_eq!(config.detect_timeout(), Duration::from_secs(30));
        assert_eq!(config.output_file, PathBuf::from("CLAUDE.md"));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _cleared = clear_all();
        let _guards = vec![
            EnvGuard::set(LOG_LEVEL_ENV, "DEBUG"),
            EnvGuard::set(GUIDELINES_DIR_ENV, "/opt/guidelines"),
            EnvGuard::set(DETECT_TIMEOUT_ENV, "5"),
            EnvGuard::set(DISABLED_MODULES_ENV, "vue, Tailwind,,vue,symfony"),
            EnvGuard::set(MAX_FILES_ENV, "500"),
            EnvGuard::set(OUTPUT_FILE_ENV, "docs/AGENTS.md"),
        ];

        let config = FrankenConfig::from_env().unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.guidelines_dir, Some(PathBuf::from("/opt/guidelines")));
        assert_eq!(config.detect_timeout_secs, 5);
        assert_eq!(
            config.disabled_modules,
            vec![
                ModuleId::Vue,
                ModuleId::Tailwind,
                ModuleId::Custom("symfony".to_string())
            ]
        );
        assert!(config.is_disabled(&ModuleId::Vue));
        assert_eq!(config.max_files, 500);
        assert_eq!(config.output_file, PathBuf::from("docs/AGENTS.md"));
    }

    #[test]
    #[serial]
    fn test_unparseable_number() {
        let _cleared = clear_all();
        let _guard = EnvGuard::set(DETECT_TIMEOUT_ENV, "soon");

        let err = FrankenConfig::from_env().unwrap_err();
        match err {
            ConfigError::ParseError { field, .. } => assert_eq!(field, DETECT_TIMEOUT_ENV),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validation_bounds() {
        let config = FrankenConfig {
            detect_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FrankenConfig {
            detect_timeout_secs: 601,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FrankenConfig {
            max_files: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FrankenConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_display_summary() {
        let config = FrankenConfig {
            disabled_modules: vec![ModuleId::Pest],
            ..Default::default()
        };
        let summary = config.to_string();
        assert!(summary.contains("Guidelines: bundled"));
        assert!(summary.contains("Disabled Modules: pest"));
        assert!(summary.contains("Output File: CLAUDE.md"));
    }
}
