//! Pluggable per-technology modules and the engine that drives them
//!
//! Every technology is a [`Module`]: a stateless detector that also knows which
//! guideline documents describe it and which shell commands build, test and lint
//! it. Modules are registered by factory in a [`ModuleRegistry`] and driven by a
//! [`ModuleManager`], which runs detection in two passes:
//!
//! 1. **Independent detection**: every enabled module inspects the same
//!    [`DetectionContext`] without seeing any other module's verdict.
//! 2. **Exclusion resolution**: ids listed in the `excludes` of a detected
//!    module are removed from the result set. Exclusion is one level deep.
//!
//! # Example
//!
//! ```no_run
//! use franken_ai::detection::DetectionContext;
//! use franken_ai::modules::{ModuleManager, ModuleRegistry};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut registry = ModuleRegistry::new();
//! registry.discover_modules();
//!
//! let manager = ModuleManager::from_registry(&registry).await;
//! let ctx = DetectionContext::new("/path/to/project");
//! let outcome = manager.detect(&ctx).await;
//!
//! for detected in outcome.modules() {
//!     println!("{} ({:.2})", detected.id(), detected.result.confidence);
//! }
//! # Ok(())
//! # }
//! ```

#[macro_use]
pub mod id_enum_macro;

pub mod common;
pub mod framework;
pub mod id;
pub mod language;
pub mod manager;
pub mod registry;
pub mod tool;

pub use id::{ModuleId, PriorityType};
pub use manager::{resolve_exclusions, DetectedModule, DetectionOutcome, ModuleManager, Resolution};
pub use registry::{ModuleFactory, ModuleRegistration, ModuleRegistry};

use crate::detection::{DetectionContext, DetectionResult};
use crate::error::ModuleError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Broad category of a technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Language,
    Framework,
    Library,
    Tool,
}

/// Reference to a guideline document in a [`crate::guidelines::DocumentStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelinePath {
    pub path: String,
    pub priority: PriorityType,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl GuidelinePath {
    pub fn new(path: impl Into<String>, priority: PriorityType, category: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            priority,
            category: category.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Shell commands grouped by purpose
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackCommands {
    pub dev: Vec<String>,
    pub build: Vec<String>,
    pub test: Vec<String>,
    pub lint: Vec<String>,
    pub install: Vec<String>,
}

impl StackCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.dev.is_empty()
            && self.build.is_empty()
            && self.test.is_empty()
            && self.lint.is_empty()
            && self.install.is_empty()
    }

    /// Appends `other`'s commands after ours. Identical strings are kept.
    pub fn merge(&mut self, other: StackCommands) {
        self.dev.extend(other.dev);
        self.build.extend(other.build);
        self.test.extend(other.test);
        self.lint.extend(other.lint);
        self.install.extend(other.install);
    }
}

/// Merged view of every technology that survived exclusion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedStack {
    pub frameworks: Vec<String>,
    pub languages: Vec<String>,
    pub runtime: String,
    pub package_managers: Vec<String>,
    pub config_files: Vec<String>,
    pub dependencies: Vec<String>,
}

impl DetectedStack {
    pub fn has_package_manager(&self, name: &str) -> bool {
        self.package_managers.iter().any(|m| m == name)
    }

    pub fn has_config_file(&self, name: &str) -> bool {
        self.config_files
            .iter()
            .any(|c| c == name || c.rsplit('/').next() == Some(name))
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }

    pub fn has_framework(&self, id: &ModuleId) -> bool {
        self.frameworks.iter().any(|f| f == id.key())
    }

    pub fn has_language(&self, id: &ModuleId) -> bool {
        self.languages.iter().any(|l| l == id.key())
    }
}

/// Input to [`Module::generate_commands`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleContext {
    pub detected_stack: DetectedStack,
}

/// One technology's detector, guideline provider and command generator.
///
/// Implementations must be stateless: any version information is passed back
/// in explicitly through [`Module::guideline_paths`].
#[async_trait]
pub trait Module: Send + Sync {
    fn id(&self) -> ModuleId;

    fn module_type(&self) -> ModuleType;

    fn priority_type(&self) -> PriorityType;

    /// Runtime this technology executes on, e.g. `"php"` or `"node"`.
    fn runtime(&self) -> Option<&'static str> {
        None
    }

    /// Inspects `ctx`. Absence of evidence is a low-confidence result, not an error.
    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError>;

    /// Major version from lock files or manifest constraints. Safe to call when
    /// `detect` reported nothing.
    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError>;

    /// Core guideline first, then the version-specific one when `version` is given.
    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath>;

    fn generate_commands(&self, ctx: &ModuleContext) -> StackCommands;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_commands_merge_preserves_order_and_duplicates() {
        let mut commands = StackCommands {
            dev: vec!["a".to_string()],
            ..Default::default()
        };
        commands.merge(StackCommands {
            dev: vec!["b".to_string(), "a".to_string()],
            test: vec!["t".to_string()],
            ..Default::default()
        });

        assert_eq!(commands.dev, vec!["a", "b", "a"]);
        assert_eq!(commands.test, vec!["t"]);
        assert!(commands.build.is_empty());
    }

    #[test]
    fn test_module_type_serialization() {
        assert_eq!(
            serde_json::to_string(&ModuleType::Language).unwrap(),
            "\"language\""
        );
    }

    #[test]
    fn test_detected_stack_lookups() {
        let stack = DetectedStack {
            frameworks: vec!["laravel".to_string()],
            languages: vec!["php".to_string()],
            runtime: "php".to_string(),
            package_managers: vec!["composer".to_string()],
            config_files: vec!["config/phpstan.neon".to_string()],
            dependencies: vec!["laravel/pint".to_string()],
        };

        assert!(stack.has_framework(&ModuleId::Laravel));
        assert!(stack.has_language(&ModuleId::Php));
        assert!(stack.has_package_manager("composer"));
        assert!(stack.has_config_file("phpstan.neon"));
        assert!(stack.has_dependency("laravel/pint"));
        assert!(!stack.has_framework(&ModuleId::Vue));
    }
}
