//! Next.js, a React meta-framework

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{js_package_manager, js_run, resolve_major, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct NextJsModule;

#[async_trait]
impl Module for NextJsModule {
    fn id(&self) -> ModuleId {
        ModuleId::NextJs
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Framework
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::MetaFramework
    }

    fn runtime(&self) -> Option<&'static str> {
        Some("node")
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(ctx.has_npm_dependency("next"), 0.6, "next in package.json")
            .check(
                ctx.has_config_file("next.config.*"),
                0.4,
                "next.config present",
            )
            .into_result(THRESHOLD, &[ModuleId::React]))
    }

    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        Ok(resolve_major(ctx.npm_locked_version("next"), ctx.npm_dependency("next")))
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "framework", version)
    }

    fn generate_commands(&self, ctx: &ModuleContext) -> StackCommands {
        let pm = js_package_manager(&ctx.detected_stack);
        StackCommands {
            dev: vec![js_run(pm, "dev")],
            build: vec![js_run(pm, "build")],
            lint: vec![js_run(pm, "lint")],
            ..Default::default()
        }
    }
}
