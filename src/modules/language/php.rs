//! PHP language

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{resolve_major, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, Default)]
pub struct PhpModule;

#[async_trait]
impl Module for PhpModule {
    fn id(&self) -> ModuleId {
        ModuleId::Php
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Language
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::BaseLang
    }

    fn runtime(&self) -> Option<&'static str> {
        Some("php")
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(
                ctx.composer_json.is_some() || ctx.has_file("composer.json"),
                0.5,
                "composer.json present",
            )
            .check(ctx.has_file_with_extension(&["php"]), 0.4, "PHP source files found")
            .check(
                ctx.has_composer_dependency("php"),
                0.1,
                "PHP version constraint in composer.json",
            )
            .into_result(THRESHOLD, &[]))
    }

    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        let locked = ctx
            .composer_lock
            .as_ref()
            .and_then(|lock| lock.get("platform"))
            .and_then(|platform| platform.get("php"))
            .and_then(|v| v.as_str());
        Ok(resolve_major(locked, ctx.composer_dependency("php")))
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "language", version)
    }

    fn generate_commands(&self, ctx: &ModuleContext) -> StackCommands {
        let stack = &ctx.detected_stack;
        let mut commands = StackCommands::new();

        if stack.has_package_manager("composer") {
            commands.install.push("composer install".to_string());
        }
        if stack.has_config_file("phpstan.neon") || stack.has_config_file("phpstan.neon.dist") {
            commands.lint.push("./vendor/bin/phpstan analyse".to_string());
        }
        if stack.has_config_file("pint.json") || stack.has_dependency("laravel/pint") {
            commands.lint.push("./vendor/bin/pint --test".to_string());
        }
        if stack.has_config_file("phpunit.xml") && !stack.has_dependency("pestphp/pest") {
            commands.test.push("./vendor/bin/phpunit".to_string());
        }

        commands
    }
}
