//! JavaScript language

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{js_commands, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptModule;

#[async_trait]
impl Module for JavaScriptModule {
    fn id(&self) -> ModuleId {
        ModuleId::JavaScript
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Language
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::BaseLang
    }

    fn runtime(&self) -> Option<&'static str> {
        Some("node")
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(
                ctx.package_json.is_some() || ctx.has_file("package.json"),
                0.5,
                "package.json present",
            )
            .check(
                ctx.has_file_with_extension(&["js", "mjs", "cjs"]),
                0.4,
                "JavaScript source files found",
            )
            .into_result(THRESHOLD, &[]))
    }

    /// JavaScript itself is unversioned per project; the Node engine is not a language version.
    async fn detect_version(&self, _ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        Ok(None)
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "language", version)
    }

    fn generate_commands(&self, ctx: &ModuleContext) -> StackCommands {
        js_commands(&ctx.detected_stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::DetectedStack;
    use serde_json::json;

    #[tokio::test]
    async fn test_detects_node_project() {
        let ctx = DetectionContext::new("/repo")
            .with_files(["package.json", "index.js"])
            .with_package_json(json!({}));

        let result = JavaScriptModule.detect(&ctx).await.unwrap();
        assert!(result.detected);
        assert_eq!(
            result.evidence,
            vec!["package.json present", "JavaScript source files found"]
        );
    }

    #[tokio::test]
    async fn test_loose_scripts_without_manifest() {
        let ctx = DetectionContext::new("/repo").with_files(["scripts/build.mjs"]);
        let result = JavaScriptModule.detect(&ctx).await.unwrap();
        assert!(result.detected);
        assert_eq!(result.confidence, 0.4);
    }

    #[tokio::test]
    async fn test_node_engine_is_not_a_language_version() {
        let ctx = DetectionContext::new("/repo")
            .with_package_json(json!({ "engines": { "node": ">=20.11" } }));
        assert_eq!(JavaScriptModule.detect_version(&ctx).await.unwrap(), None);
    }

    #[test]
    fn test_core_guideline_path() {
        let paths = JavaScriptModule.guideline_paths(None);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].path, "javascript/guidelines/language.md");
    }

    #[test]
    fn test_commands_use_detected_package_manager() {
        let ctx = ModuleContext {
            detected_stack: DetectedStack {
                package_managers: vec!["yarn".to_string()],
                dependencies: vec!["eslint".to_string(), "vite".to_string()],
                ..Default::default()
            },
        };

        let commands = JavaScriptModule.generate_commands(&ctx);
        assert_eq!(commands.install, vec!["yarn install"]);
        assert_eq!(commands.lint, vec!["yarn lint"]);
        assert_eq!(commands.build, vec!["yarn build"]);
    }
}
