use super::framework::*;
use super::language::*;
use super::tool::*;
use super::{Module, ModuleId};
use crate::error::ModuleError;
use futures_util::future::BoxFuture;
use std::sync::Arc;

/// Builds one module instance. Called once per registration per run.
pub type ModuleFactory =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn Module>, ModuleError>> + Send + Sync>;

#[derive(Clone)]
pub struct ModuleRegistration {
    pub id: ModuleId,
    pub factory: ModuleFactory,
    pub enabled: bool,
}

impl ModuleRegistration {
    pub fn new(id: ModuleId, factory: ModuleFactory) -> Self {
        Self {
            id,
            factory,
            enabled: true,
        }
    }

    /// Registration for a stateless module that needs no async setup.
    pub fn stateless<M>(id: ModuleId, module: M) -> Self
    where
        M: Module + Clone + 'static,
    {
        let factory: ModuleFactory = Arc::new(move || {
            let module = module.clone();
            Box::pin(async move { Ok(Arc::new(module) as Arc<dyn Module>) })
        });
        Self::new(id, factory)
    }
}

impl std::fmt::Debug for ModuleRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistration")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Catalogue of module factories in registration order.
///
/// Holds no per-run state; instantiation and detection belong to
/// [`super::ModuleManager`].
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    registrations: Vec<ModuleRegistration>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.discover_modules();
        registry
    }

    /// Registers every built-in module. Ids already present are left alone.
    pub fn discover_modules(&mut self) {
        for registration in builtin_registrations() {
            if self.contains(&registration.id) {
                continue;
            }
            self.registrations.push(registration);
        }
    }

    pub fn register(&mut self, registration: ModuleRegistration) -> Result<(), ModuleError> {
        if self.contains(&registration.id) {
            return Err(ModuleError::DuplicateRegistration(registration.id));
        }
        self.registrations.push(registration);
        Ok(())
    }

    /// Returns false when `id` is not registered.
    pub fn enable(&mut self, id: &ModuleId) -> bool {
        self.set_enabled(id, true)
    }

    /// Returns false when `id` is not registered.
    pub fn disable(&mut self, id: &ModuleId) -> bool {
        self.set_enabled(id, false)
    }

    fn set_enabled(&mut self, id: &ModuleId, enabled: bool) -> bool {
        match self.registrations.iter_mut().find(|r| &r.id == id) {
            Some(registration) => {
                registration.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.registrations.iter().any(|r| &r.id == id)
    }

    pub fn is_enabled(&self, id: &ModuleId) -> bool {
        self.registrations
            .iter()
            .any(|r| &r.id == id && r.enabled)
    }

    pub fn registrations(&self) -> &[ModuleRegistration] {
        &self.registrations
    }

    pub fn get_enabled_registrations(&self) -> Vec<&ModuleRegistration> {
        self.registrations.iter().filter(|r| r.enabled).collect()
    }
}

fn builtin_registrations() -> Vec<ModuleRegistration> {
    ModuleId::all_variants()
        .iter()
        .filter_map(|id| {
            let registration = match id {
                ModuleId::Php => ModuleRegistration::stateless(id.clone(), PhpModule),
                ModuleId::JavaScript => ModuleRegistration::stateless(id.clone(), JavaScriptModule),
                ModuleId::TypeScript => ModuleRegistration::stateless(id.clone(), TypeScriptModule),
                ModuleId::Laravel => ModuleRegistration::stateless(id.clone(), LaravelModule),
                ModuleId::Statamic => ModuleRegistration::stateless(id.clone(), StatamicModule),
                ModuleId::Vue => ModuleRegistration::stateless(id.clone(), VueModule),
                ModuleId::React => ModuleRegistration::stateless(id.clone(), ReactModule),
                ModuleId::NextJs => ModuleRegistration::stateless(id.clone(), NextJsModule),
                ModuleId::Nuxt => ModuleRegistration::stateless(id.clone(), NuxtModule),
                ModuleId::Livewire => ModuleRegistration::stateless(id.clone(), LivewireModule),
                ModuleId::Inertia => ModuleRegistration::stateless(id.clone(), InertiaModule),
                ModuleId::Filament => ModuleRegistration::stateless(id.clone(), FilamentModule),
                ModuleId::Pest => ModuleRegistration::stateless(id.clone(), PestModule),
                ModuleId::Tailwind => ModuleRegistration::stateless(id.clone(), TailwindModule),
                ModuleId::Custom(_) => return None,
            };
            Some(registration)
        })
        .collect()
}
