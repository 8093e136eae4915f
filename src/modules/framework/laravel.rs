//! Laravel framework for PHP

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{js_package_manager, js_run, resolve_major, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.5;
const PACKAGE: &str = "laravel/framework";

#[derive(Debug, Clone, Copy, Default)]
pub struct LaravelModule;

#[async_trait]
impl Module for LaravelModule {
    fn id(&self) -> ModuleId {
        ModuleId::Laravel
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Framework
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::Framework
    }

    fn runtime(&self) -> Option<&'static str> {
        Some("php")
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(
                ctx.has_composer_dependency(PACKAGE),
                0.6,
                "laravel/framework in composer.json",
            )
            .check(ctx.has_file("artisan"), 0.3, "artisan console present")
            .check(ctx.has_file("config/app.php"), 0.1, "config/app.php present")
            .into_result(THRESHOLD, &[]))
    }

    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        Ok(resolve_major(
            ctx.composer_locked_version(PACKAGE),
            ctx.composer_dependency(PACKAGE),
        ))
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "framework", version)
    }

    fn generate_commands(&self, ctx: &ModuleContext) -> StackCommands {
        let stack = &ctx.detected_stack;
        let mut commands = StackCommands::new();

        commands.dev.push("php artisan serve".to_string());
        if stack.has_config_file("vite.config.js") || stack.has_dependency("vite") {
            commands.dev.push(js_run(js_package_manager(stack), "dev"));
        }
        commands.test.push("php artisan test".to_string());
        commands.build.push("php artisan optimize".to_string());

        commands
    }
}
