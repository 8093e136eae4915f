//! Statamic, a CMS meta-framework built on Laravel

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{resolve_major, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.4;
const PACKAGE: &str = "statamic/cms";

#[derive(Debug, Clone, Copy, Default)]
pub struct StatamicModule;

#[async_trait]
impl Module for StatamicModule {
    fn id(&self) -> ModuleId {
        ModuleId::Statamic
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Framework
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::MetaFramework
    }

    fn runtime(&self) -> Option<&'static str> {
        Some("php")
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(
                ctx.has_composer_dependency(PACKAGE),
                0.5,
                "statamic/cms in composer.json",
            )
            .check(
                ctx.has_path_prefix("config/statamic/"),
                0.3,
                "config/statamic directory present",
            )
            .check(ctx.has_file("please"), 0.2, "please console present")
            .into_result(THRESHOLD, &[ModuleId::Laravel]))
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

    fn generate_commands(&self, _ctx: &ModuleContext) -> StackCommands {
        StackCommands {
            dev: vec!["php artisan serve".to_string()],
            build: vec!["php please stache:warm".to_string()],
            test: vec!["php artisan test".to_string()],
            ..Default::default()
        }
    }
}
