//! Vue.js

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{
    js_exec, js_package_manager, js_run, resolve_major, standard_guideline_paths,
};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct VueModule;

#[async_trait]
impl Module for VueModule {
    fn id(&self) -> ModuleId {
        ModuleId::Vue
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Framework
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::Framework
    }

    fn runtime(&self) -> Option<&'static str> {
        Some("node")
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(ctx.has_npm_dependency("vue"), 0.7, "vue in package.json")
            .check(
                ctx.has_file_with_extension(&["vue"]),
                0.3,
                "single-file components found",
            )
            .into_result(THRESHOLD, &[]))
    }

    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        Ok(resolve_major(ctx.npm_locked_version("vue"), ctx.npm_dependency("vue")))
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "framework", version)
    }

    fn generate_commands(&self, ctx: &ModuleContext) -> StackCommands {
        let stack = &ctx.detected_stack;
        let pm = js_package_manager(stack);
        let mut commands = StackCommands::new();

        // Inside Laravel the dev server and build belong to the host framework.
        if !stack.has_framework(&ModuleId::Laravel) {
            commands.dev.push(js_run(pm, "dev"));
            commands.build.push(js_run(pm, "build"));
        }
        if stack.has_dependency("vitest") {
            commands.test.push(js_exec(pm, "vitest run"));
        }

        commands
    }
}
