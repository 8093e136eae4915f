//! Pest testing framework

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{resolve_major, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.5;
const PACKAGE: &str = "pestphp/pest";

#[derive(Debug, Clone, Copy, Default)]
pub struct PestModule;

#[async_trait]
impl Module for PestModule {
    fn id(&self) -> ModuleId {
        ModuleId::Pest
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Tool
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::LaravelTool
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(
                ctx.has_composer_dependency(PACKAGE),
                0.8,
                "pestphp/pest in composer.json",
            )
            .check(ctx.has_file("tests/Pest.php"), 0.2, "tests/Pest.php present")
            .into_result(THRESHOLD, &[]))
    }

    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        Ok(resolve_major(
            ctx.composer_locked_version(PACKAGE),
            ctx.composer_dependency(PACKAGE),
        ))
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "tool", version)
    }

    fn generate_commands(&self, ctx: &ModuleContext) -> StackCommands {
        let mut commands = StackCommands::new();
        commands.test.push("./vendor/bin/pest".to_string());
        if ctx.detected_stack.has_dependency("pestphp/pest-plugin-type-coverage") {
            commands
                .lint
                .push("./vendor/bin/pest --type-coverage".to_string());
        }
        commands
    }
}
