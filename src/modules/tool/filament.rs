//! Filament admin panels

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{resolve_major, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.5;
const PACKAGE: &str = "filament/filament";

#[derive(Debug, Clone, Copy, Default)]
pub struct FilamentModule;

#[async_trait]
impl Module for FilamentModule {
    fn id(&self) -> ModuleId {
        ModuleId::Filament
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Library
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::LaravelTool
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        Ok(Evidence::new()
            .check(
                ctx.has_composer_dependency(PACKAGE),
                0.8,
                "filament/filament in composer.json",
            )
            .check(
                ctx.has_path_prefix("app/Filament/"),
                0.2,
                "app/Filament directory present",
            )
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

    fn generate_commands(&self, _ctx: &ModuleContext) -> StackCommands {
        StackCommands {
            build: vec!["php artisan filament:optimize".to_string()],
            ..Default::default()
        }
    }
}
