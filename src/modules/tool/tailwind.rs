//! Tailwind CSS

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{resolve_major, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct TailwindModule;

#[async_trait]
impl Module for TailwindModule {
    fn id(&self) -> ModuleId {
        ModuleId::Tailwind
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Library
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::CssFramework
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(
                ctx.has_npm_dependency("tailwindcss"),
                0.6,
                "tailwindcss in package.json",
            )
            .check(
                ctx.has_config_file("tailwind.config.*"),
                0.4,
                "tailwind.config present",
            )
            .into_result(THRESHOLD, &[]))
    }

    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        Ok(resolve_major(
            ctx.npm_locked_version("tailwindcss"),
            ctx.npm_dependency("tailwindcss"),
        ))
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "css-framework", version)
    }

    fn generate_commands(&self, _ctx: &ModuleContext) -> StackCommands {
        StackCommands::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_version_propagation() {
        let ctx = DetectionContext::new("/repo")
            .with_package_json(json!({ "devDependencies": { "tailwindcss": "^4.2.1" } }));

        let result = TailwindModule.detect(&ctx).await.unwrap();
        assert!(result.detected);

        let version = TailwindModule.detect_version(&ctx).await.unwrap();
        assert_eq!(version.as_deref(), Some("4"));

        let paths = TailwindModule.guideline_paths(Some("4.2.1"));
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].path, "tailwind/guidelines/css-framework.md");
        assert_eq!(paths[1].path, "tailwind/guidelines/4/features.md");
    }

    #[tokio::test]
    async fn test_v4_projects_without_config_file() {
        let ctx = DetectionContext::new("/repo")
            .with_package_json(json!({ "dependencies": { "tailwindcss": "4.0.0" } }));
        let result = TailwindModule.detect(&ctx).await.unwrap();
        assert_eq!(result.evidence, vec!["tailwindcss in package.json"]);
        assert!(result.detected);
    }
}
