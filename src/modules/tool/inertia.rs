//! Inertia.js server and client adapters

use crate::detection::{DetectionContext, DetectionResult, Evidence};
use crate::error::ModuleError;
use crate::modules::common::{resolve_major, standard_guideline_paths};
use crate::modules::{
    GuidelinePath, Module, ModuleContext, ModuleId, ModuleType, PriorityType, StackCommands,
};
use async_trait::async_trait;

const THRESHOLD: f64 = 0.5;
const SERVER_PACKAGE: &str = "inertiajs/inertia-laravel";
const CLIENT_ADAPTERS: &[&str] = &["@inertiajs/vue3", "@inertiajs/react", "@inertiajs/svelte"];

#[derive(Debug, Clone, Copy, Default)]
pub struct InertiaModule;

impl InertiaModule {
    fn client_adapter<'a>(ctx: &'a DetectionContext) -> Option<(&'static str, &'a str)> {
        CLIENT_ADAPTERS
            .iter()
            .find_map(|name| ctx.npm_dependency(name).map(|v| (*name, v)))
    }
}

#[async_trait]
impl Module for InertiaModule {
    fn id(&self) -> ModuleId {
        ModuleId::Inertia
    }

    fn module_type(&self) -> ModuleType {
        ModuleType::Library
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::LaravelTool
    }

    async fn detect(&self, ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
        let adapter = Self::client_adapter(ctx);

        let mut result = Evidence::new()
            .check(
                ctx.has_composer_dependency(SERVER_PACKAGE),
                0.6,
                "inertiajs/inertia-laravel in composer.json",
            )
            .check(adapter.is_some(), 0.4, "Inertia client adapter in package.json")
            .into_result(THRESHOLD, &[]);

        if let Some((name, _)) = adapter {
            result = result.with_metadata("client_adapter", name);
        }
        Ok(result)
    }

    async fn detect_version(&self, ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
        let client = Self::client_adapter(ctx);
        Ok(resolve_major(
            ctx.composer_locked_version(SERVER_PACKAGE),
            ctx.composer_dependency(SERVER_PACKAGE),
        )
        .or_else(|| resolve_major(None, client.map(|(_, v)| v))))
    }

    fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
        standard_guideline_paths(&self.id(), self.priority_type(), "tool", version)
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
    async fn test_server_and_client_adapter() {
        let ctx = DetectionContext::new("/repo")
            .with_composer_json(json!({ "require": { "inertiajs/inertia-laravel": "^1.3" } }))
            .with_package_json(json!({ "devDependencies": { "@inertiajs/vue3": "^1.2.0" } }));

        let result = InertiaModule.detect(&ctx).await.unwrap();
        assert!(result.detected);
        assert_eq!(
            result.metadata.get("client_adapter").map(String::as_str),
            Some("@inertiajs/vue3")
        );
        assert_eq!(InertiaModule.detect_version(&ctx).await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_client_adapter_alone_is_not_enough() {
        let ctx = DetectionContext::new("/repo")
            .with_package_json(json!({ "dependencies": { "@inertiajs/react": "^2.0.0" } }));

        let result = InertiaModule.detect(&ctx).await.unwrap();
        assert!(!result.detected);
        assert_eq!(InertiaModule.detect_version(&ctx).await.unwrap().as_deref(), Some("2"));
    }
}
