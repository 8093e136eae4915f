//! TypeScript language

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{
    js_commands, js_exec, js_package_manager, resolve_major, standard_guideline_paths,
};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptModule;

#[async_trait]
impl Module for TypeScriptModule {
    fn id(&self) -> ModuleId {
        ModuleId::TypeScript
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Language
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::SpecializedLang
    }

    fn runtime(&self) -> Option<&'static str> {
        Some("node")
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(
                ctx.has_config_file("tsconfig.json") || ctx.has_file("tsconfig.json"),
                0.6,
                "tsconfig.json present",
            )
            .check(
                ctx.has_npm_dependency("typescript"),
                0.3,
                "typescript dependency in package.json",
            )
            .check(
                ctx.has_file_with_extension(&["ts", "tsx", "mts", "cts"]),
                0.2,
                "TypeScript source files found",
            )
            .into_result(THRESHOLD, &[ModuleId::JavaScript]))
    }

    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        Ok(resolve_major(
            ctx.npm_locked_version("typescript"),
            ctx.npm_dependency("typescript"),
        ))
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "language", version)
    }

    /// Owns the Node commands in place of the JavaScript module it excludes.
    fn generate_commands(&self, ctx: &ModuleContext) -> StackCommands {
        let stack = &ctx.detected_stack;
        let mut commands = js_commands(stack);
        commands.lint.push(js_exec(js_package_manager(stack), "tsc --noEmit"));
        commands
    }
}
