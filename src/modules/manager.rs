use super::{
    DetectedStack, Module, ModuleContext, ModuleId, ModuleRegistry, ModuleType, StackCommands,
};
use crate::detection::{DetectionContext, DetectionResult};
use crate::error::ModuleError;
use futures_util::future::join_all;
use futures_util::FutureExt;
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_DETECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A module that survived exclusion, with the version it reported
#[derive(Clone)]
pub struct DetectedModule {
    pub module: Arc<dyn Module>,
    pub result: DetectionResult,
    pub version: Option<String>,
}

impl DetectedModule {
    pub fn id(&self) -> ModuleId {
        self.module.id()
    }
}

impl std::fmt::Debug for DetectedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectedModule")
            .field("id", &self.module.id())
            .field("result", &self.result)
            .field("version", &self.version)
            .finish()
    }
}

/// Authoritative result set of one detection run
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    modules: Vec<DetectedModule>,
    excluded: Vec<ModuleId>,
}

impl DetectionOutcome {
    /// Surviving modules in registration order.
    pub fn modules(&self) -> &[DetectedModule] {
        &self.modules
    }

    pub fn get(&self, id: &ModuleId) -> Option<&DetectedModule> {
        self.modules.iter().find(|m| &m.id() == id)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<ModuleId> {
        self.modules.iter().map(DetectedModule::id).collect()
    }

    /// Modules that detected but were suppressed by another module.
    pub fn excluded(&self) -> &[ModuleId] {
        &self.excluded
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn to_result_map(&self) -> BTreeMap<String, DetectionResult> {
        self.modules
            .iter()
            .map(|m| (m.id().key().to_string(), m.result.clone()))
            .collect()
    }
}

/// Output of [`resolve_exclusions`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub kept: Vec<(ModuleId, DetectionResult)>,
    pub excluded: Vec<ModuleId>,
}

/// Exclusion verdict for one detected module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// Kept, and its exclusions apply.
    Active,
    /// Removed by an active excluder; its own exclusions are ignored.
    Suppressed,
    /// Part of an exclusion cycle: removed, and its exclusions still apply.
    Cyclic,
}

impl Verdict {
    fn excludes(self) -> bool {
        matches!(self, Verdict::Active | Verdict::Cyclic)
    }

    fn removed(self) -> bool {
        matches!(self, Verdict::Suppressed | Verdict::Cyclic)
    }
}

/// Applies exclusions to pass-one results.
///
/// Only detected modules exclude. A module suppressed by an active excluder
/// loses its own exclusions, so exclusion never chains through it: with
/// a→b→c→d, `b` and `d` go while `a` and `c` stay. Modules on an exclusion
/// cycle (a mutual pair or longer) are all removed and their exclusions
/// still apply. A module never excludes itself. Undetected entries are
/// dropped and input order is kept.
pub fn resolve_exclusions(results: Vec<(ModuleId, DetectionResult)>) -> Resolution {
    let detected: Vec<(&ModuleId, &DetectionResult)> = results
        .iter()
        .filter(|(_, result)| result.detected)
        .map(|(id, result)| (id, result))
        .collect();
    let n = detected.len();

    let mut targets: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, (_, result)) in detected.iter().enumerate() {
        for (j, (id, _)) in detected.iter().enumerate() {
            if i != j && result.excludes.contains(id) {
                targets[i].push(j);
            }
        }
    }

    let mut verdicts: Vec<Option<Verdict>> = (0..n)
        .map(|i| reaches(&targets, i, i).then_some(Verdict::Cyclic))
        .collect();

    // Outside cycles the exclusion graph is acyclic, so every module is
    // decided once all of its excluders are.
    loop {
        let mut progressed = false;
        for i in 0..n {
            if verdicts[i].is_some() {
                continue;
            }
            let excluders: Vec<usize> = (0..n).filter(|&by| targets[by].contains(&i)).collect();
            let verdict = if excluders
                .iter()
                .any(|&by| verdicts[by].map_or(false, Verdict::excludes))
            {
                Some(Verdict::Suppressed)
            } else if excluders.iter().all(|&by| verdicts[by].is_some()) {
                Some(Verdict::Active)
            } else {
                None
            };
            if verdict.is_some() {
                verdicts[i] = verdict;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    let removed: HashSet<ModuleId> = detected
        .iter()
        .zip(&verdicts)
        .filter(|(_, verdict)| verdict.map_or(false, Verdict::removed))
        .map(|((id, _), _)| (*id).clone())
        .collect();

    let mut resolution = Resolution::default();
    for (id, result) in results {
        if !result.detected {
            continue;
        }
        if removed.contains(&id) {
            resolution.excluded.push(id);
        } else {
            resolution.kept.push((id, result));
        }
    }
    resolution
}

/// Whether a path of at least one edge leads from `from` to `to`.
fn reaches(targets: &[Vec<usize>], from: usize, to: usize) -> bool {
    let mut visited = vec![false; targets.len()];
    let mut stack: Vec<usize> = targets[from].clone();
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if !visited[node] {
            visited[node] = true;
            stack.extend(targets[node].iter().copied());
        }
    }
    false
}

/// Runs every module against one context and resolves the survivors
pub struct ModuleManager {
    modules: Vec<Arc<dyn Module>>,
    timeout: Duration,
}

impl ModuleManager {
    /// Instantiates every enabled registration. Failing factories are skipped.
    pub async fn from_registry(registry: &ModuleRegistry) -> Self {
        let mut modules = Vec::new();
        for registration in registry.get_enabled_registrations() {
            match (registration.factory)().await {
                Ok(module) => modules.push(module),
                Err(e) => {
                    warn!(module = %registration.id, error = %e, "Skipping module that failed to initialise")
                }
            }
        }
        debug!(count = modules.len(), "Instantiated modules");
        Self::with_modules(modules)
    }

    pub fn with_modules(modules: Vec<Arc<dyn Module>>) -> Self {
        Self {
            modules,
            timeout: DEFAULT_DETECT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn detect(&self, ctx: &DetectionContext) -> DetectionOutcome {
        let start = Instant::now();

        let results = join_all(self.modules.iter().map(|module| self.detect_one(module.as_ref(), ctx))).await;
        let pass_one = self.modules.iter().map(|m| m.id()).zip(results).collect();

        let Resolution { kept, excluded } = resolve_exclusions(pass_one);
        for id in &excluded {
            debug!(module = %id, "Excluded by another detected module");
        }

        let survivors: Vec<(Arc<dyn Module>, DetectionResult)> = kept
            .into_iter()
            .filter_map(|(id, result)| {
                self.modules
                    .iter()
                    .find(|m| m.id() == id)
                    .map(|m| (Arc::clone(m), result))
            })
            .collect();

        let versions = join_all(
            survivors
                .iter()
                .map(|(module, _)| self.detect_version_one(module.as_ref(), ctx)),
        )
        .await;

        let modules: Vec<DetectedModule> = survivors
            .into_iter()
            .zip(versions)
            .map(|((module, result), version)| DetectedModule {
                module,
                result,
                version,
            })
            .collect();

        info!(
            detected = modules.len(),
            excluded = excluded.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Module detection complete"
        );

        DetectionOutcome { modules, excluded }
    }

    async fn detect_one(&self, module: &dyn Module, ctx: &DetectionContext) -> DetectionResult {
        let id = module.id();
        match self.guard(&id, module.detect(ctx)).await {
            Ok(result) if result.validate() => {
                debug!(module = %id, detected = result.detected, confidence = result.confidence, "Detection finished");
                result
            }
            Ok(result) => {
                warn!(module = %id, confidence = result.confidence, "Module returned an inconsistent result");
                DetectionResult::failed(format!(
                    "inconsistent result: detected={} confidence={}",
                    result.detected, result.confidence
                ))
            }
            Err(e) => {
                warn!(module = %id, error = %e, "Detection failed, treating module as not detected");
                DetectionResult::failed(e.to_string())
            }
        }
    }

    async fn detect_version_one(&self, module: &dyn Module, ctx: &DetectionContext) -> Option<String> {
        let id = module.id();
        match self.guard(&id, module.detect_version(ctx)).await {
            Ok(version) => version,
            Err(e) => {
                warn!(module = %id, error = %e, "Version detection failed");
                None
            }
        }
    }

    async fn guard<T>(
        &self,
        id: &ModuleId,
        call: impl Future<Output = Result<T, ModuleError>>,
    ) -> Result<T, ModuleError> {
        match tokio::time::timeout(self.timeout, AssertUnwindSafe(call).catch_unwind()).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ModuleError::Panicked { module: id.clone() }),
            Err(_) => Err(ModuleError::Timeout {
                module: id.clone(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    /// Merged view of the surviving stack handed to command generation.
    pub fn module_context(outcome: &DetectionOutcome, ctx: &DetectionContext) -> ModuleContext {
        let keys_of = |module_type: ModuleType| -> Vec<String> {
            outcome
                .modules()
                .iter()
                .filter(|m| m.module.module_type() == module_type)
                .map(|m| m.id().key().to_string())
                .collect()
        };

        let runtime = outcome
            .modules()
            .iter()
            .find_map(|m| m.module.runtime())
            .unwrap_or("unknown")
            .to_string();

        ModuleContext {
            detected_stack: DetectedStack {
                frameworks: keys_of(ModuleType::Framework),
                languages: keys_of(ModuleType::Language),
                runtime,
                package_managers: ctx.package_managers(),
                config_files: ctx.config_files.clone(),
                dependencies: ctx.dependencies(),
            },
        }
    }

    /// Concatenates each survivor's commands in registration order.
    pub fn generate_commands(outcome: &DetectionOutcome, module_ctx: &ModuleContext) -> StackCommands {
        outcome
            .modules()
            .iter()
            .fold(StackCommands::new(), |mut commands, detected| {
                commands.merge(detected.module.generate_commands(module_ctx));
                commands
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::standard_guideline_paths;
    use crate::modules::{GuidelinePath, PriorityType};
    use async_trait::async_trait;

    #[derive(Clone, Default)]
    enum Behaviour {
        #[default]
        Normal,
        Panic,
        Hang,
        Error,
    }

    #[derive(Clone)]
    struct StubModule {
        id: ModuleId,
        module_type: ModuleType,
        confidence: f64,
        excludes: Vec<ModuleId>,
        version: Option<String>,
        dev: Vec<String>,
        behaviour: Behaviour,
        version_behaviour: Behaviour,
    }

    impl StubModule {
        fn new(key: &str, confidence: f64) -> Self {
            Self {
                id: ModuleId::from_key(key),
                module_type: ModuleType::Framework,
                confidence,
                excludes: Vec::new(),
                version: None,
                dev: Vec::new(),
                behaviour: Behaviour::Normal,
                version_behaviour: Behaviour::Normal,
            }
        }

        fn excluding(mut self, keys: &[&str]) -> Self {
            self.excludes = keys.iter().map(|k| ModuleId::from_key(k)).collect();
            self
        }

        fn behaving(mut self, behaviour: Behaviour) -> Self {
            self.behaviour = behaviour;
            self
        }

        fn versioning(mut self, version: &str, behaviour: Behaviour) -> Self {
            self.version = Some(version.to_string());
            self.version_behaviour = behaviour;
            self
        }

        fn arc(self) -> Arc<dyn Module> {
            Arc::new(self)
        }
    }

    #[async_trait]
    impl Module for StubModule {
        fn id(&self) -> ModuleId {
            self.id.clone()
        }

        fn module_type(&self) -> ModuleType {
            self.module_type
        }

        fn priority_type(&self) -> PriorityType {
            PriorityType::Framework
        }

        async fn detect(&self, _ctx: &DetectionContext) -> Result<DetectionResult, ModuleError> {
            match self.behaviour {
                Behaviour::Panic => panic!("detector bug"),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
                Behaviour::Error => return Err(ModuleError::detection(self.id.clone(), "boom")),
                Behaviour::Normal => {}
            }
            let detected = self.confidence > 0.5;
            Ok(DetectionResult {
                detected,
                confidence: self.confidence,
                excludes: if detected { self.excludes.clone() } else { Vec::new() },
                ..Default::default()
            })
        }

        async fn detect_version(&self, _ctx: &DetectionContext) -> Result<Option<String>, ModuleError> {
            match self.version_behaviour {
                Behaviour::Panic => panic!("version parser bug"),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
                Behaviour::Error => return Err(ModuleError::detection(self.id.clone(), "bad lock file")),
                Behaviour::Normal => {}
            }
            Ok(self.version.clone())
        }

        fn guideline_paths(&self, version: Option<&str>) -> Vec<GuidelinePath> {
            standard_guideline_paths(&self.id, PriorityType::Framework, "framework", version)
        }

        fn generate_commands(&self, _ctx: &ModuleContext) -> StackCommands {
            StackCommands {
                dev: self.dev.clone(),
                ..Default::default()
            }
        }
    }

    fn detected(excludes: &[&str]) -> DetectionResult {
        DetectionResult {
            detected: true,
            confidence: 0.9,
            excludes: excludes.iter().map(|k| ModuleId::from_key(k)).collect(),
            ..Default::default()
        }
    }

    fn ids(kept: &[(ModuleId, DetectionResult)]) -> Vec<&str> {
        kept.iter().map(|(id, _)| id.key()).collect()
    }

    #[test]
    fn test_exclusion_wins_over_confidence() {
        let mut excluded = detected(&[]);
        excluded.confidence = 1.0;
        let mut excluder = detected(&["b"]);
        excluder.confidence = 0.51;

        let resolution = resolve_exclusions(vec![
            (ModuleId::from_key("b"), excluded),
            (ModuleId::from_key("a"), excluder),
        ]);

        assert_eq!(ids(&resolution.kept), vec!["a"]);
        assert_eq!(resolution.excluded, vec![ModuleId::from_key("b")]);
    }

    #[test]
    fn test_exclusion_is_not_transitive() {
        let resolution = resolve_exclusions(vec![
            (ModuleId::from_key("a"), detected(&["b"])),
            (ModuleId::from_key("b"), detected(&["c"])),
            (ModuleId::from_key("c"), detected(&[])),
        ]);

        assert_eq!(ids(&resolution.kept), vec!["a", "c"]);
        assert_eq!(resolution.excluded, vec![ModuleId::from_key("b")]);
    }

    #[test]
    fn test_surviving_link_of_a_chain_still_excludes() {
        let resolution = resolve_exclusions(vec![
            (ModuleId::from_key("a"), detected(&["b"])),
            (ModuleId::from_key("b"), detected(&["c"])),
            (ModuleId::from_key("c"), detected(&["d"])),
            (ModuleId::from_key("d"), detected(&[])),
        ]);

        assert_eq!(ids(&resolution.kept), vec!["a", "c"]);
        assert_eq!(
            resolution.excluded,
            vec![ModuleId::from_key("b"), ModuleId::from_key("d")]
        );
    }

    #[test]
    fn test_exclusion_cycle_removes_every_member() {
        let resolution = resolve_exclusions(vec![
            (ModuleId::from_key("a"), detected(&["b"])),
            (ModuleId::from_key("b"), detected(&["c"])),
            (ModuleId::from_key("c"), detected(&["a"])),
            (ModuleId::from_key("d"), detected(&[])),
        ]);

        assert_eq!(ids(&resolution.kept), vec!["d"]);
        assert_eq!(resolution.excluded.len(), 3);
    }

    #[test]
    fn test_cycle_members_still_exclude_outsiders() {
        let resolution = resolve_exclusions(vec![
            (ModuleId::from_key("a"), detected(&["b", "e"])),
            (ModuleId::from_key("b"), detected(&["a"])),
            (ModuleId::from_key("e"), detected(&["f"])),
            (ModuleId::from_key("f"), detected(&[])),
        ]);

        assert_eq!(ids(&resolution.kept), vec!["f"]);
        assert_eq!(resolution.excluded.len(), 3);
    }

    #[test]
    fn test_mutual_exclusion_removes_both() {
        let resolution = resolve_exclusions(vec![
            (ModuleId::from_key("a"), detected(&["b"])),
            (ModuleId::from_key("b"), detected(&["a"])),
            (ModuleId::from_key("c"), detected(&[])),
        ]);

        assert_eq!(ids(&resolution.kept), vec!["c"]);
        assert_eq!(resolution.excluded.len(), 2);
    }

    #[test]
    fn test_undetected_excluder_has_no_effect() {
        let mut silent = detected(&["b"]);
        silent.detected = false;

        let resolution = resolve_exclusions(vec![
            (ModuleId::from_key("a"), silent),
            (ModuleId::from_key("b"), detected(&[])),
        ]);

        assert_eq!(ids(&resolution.kept), vec!["b"]);
        assert!(resolution.excluded.is_empty());
    }

    #[test]
    fn test_self_exclusion_is_ignored() {
        let resolution = resolve_exclusions(vec![(ModuleId::from_key("a"), detected(&["a"]))]);
        assert_eq!(ids(&resolution.kept), vec!["a"]);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let manager = ModuleManager::with_modules(vec![
            StubModule::new("panics", 0.9).behaving(Behaviour::Panic).arc(),
            StubModule::new("errors", 0.9).behaving(Behaviour::Error).arc(),
            StubModule::new("ok", 0.9).arc(),
        ]);

        let outcome = manager.detect(&DetectionContext::default()).await;
        assert_eq!(outcome.ids(), vec![ModuleId::from_key("ok")]);
    }

    #[tokio::test]
    async fn test_hanging_module_times_out() {
        let manager = ModuleManager::with_modules(vec![
            StubModule::new("hangs", 0.9).behaving(Behaviour::Hang).arc(),
            StubModule::new("ok", 0.9).arc(),
        ])
        .with_timeout(Duration::from_millis(50));

        let outcome = manager.detect(&DetectionContext::default()).await;
        assert_eq!(outcome.ids(), vec![ModuleId::from_key("ok")]);
    }

    #[tokio::test]
    async fn test_invalid_confidence_is_rejected() {
        let manager = ModuleManager::with_modules(vec![StubModule::new("wild", 1.5).arc()]);
        let outcome = manager.detect(&DetectionContext::default()).await;
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_versions_attach_to_survivors() {
        let mut laravel = StubModule::new("laravel", 0.9);
        laravel.version = Some("11".to_string());
        let manager = ModuleManager::with_modules(vec![laravel.arc()]);

        let outcome = manager.detect(&DetectionContext::default()).await;
        let detected = outcome.get(&ModuleId::Laravel).unwrap();
        assert_eq!(detected.version.as_deref(), Some("11"));
        assert!(outcome.to_result_map().contains_key("laravel"));
    }

    #[tokio::test]
    async fn test_version_failures_fall_back_to_core_guideline() {
        let manager = ModuleManager::with_modules(vec![
            StubModule::new("errors", 0.9).versioning("11", Behaviour::Error).arc(),
            StubModule::new("panics", 0.9).versioning("11", Behaviour::Panic).arc(),
            StubModule::new("hangs", 0.9).versioning("11", Behaviour::Hang).arc(),
            StubModule::new("ok", 0.9).versioning("11", Behaviour::Normal).arc(),
        ])
        .with_timeout(Duration::from_millis(50));

        let outcome = manager.detect(&DetectionContext::default()).await;
        assert_eq!(outcome.len(), 4);

        for key in ["errors", "panics", "hangs"] {
            let detected = outcome.get(&ModuleId::from_key(key)).unwrap();
            assert!(detected.version.is_none(), "{} kept a version", key);
            let paths = detected.module.guideline_paths(detected.version.as_deref());
            assert_eq!(paths.len(), 1);
            assert_eq!(paths[0].path, format!("{}/guidelines/framework.md", key));
        }

        let ok = outcome.get(&ModuleId::from_key("ok")).unwrap();
        assert_eq!(ok.module.guideline_paths(ok.version.as_deref()).len(), 2);
    }

    #[tokio::test]
    async fn test_excluded_modules_are_reported() {
        let manager = ModuleManager::with_modules(vec![
            StubModule::new("statamic", 0.9).excluding(&["laravel"]).arc(),
            StubModule::new("laravel", 1.0).arc(),
        ]);

        let outcome = manager.detect(&DetectionContext::default()).await;
        assert!(outcome.contains(&ModuleId::Statamic));
        assert!(!outcome.contains(&ModuleId::Laravel));
        assert_eq!(outcome.excluded(), &[ModuleId::Laravel]);
    }

    #[tokio::test]
    async fn test_command_merge_follows_registration_order() {
        let mut first = StubModule::new("a", 0.9);
        first.dev = vec!["serve-a".to_string(), "shared".to_string()];
        let mut second = StubModule::new("b", 0.9);
        second.dev = vec!["serve-b".to_string(), "shared".to_string()];

        let manager = ModuleManager::with_modules(vec![first.arc(), second.arc()]);
        let ctx = DetectionContext::default();
        let outcome = manager.detect(&ctx).await;

        let module_ctx = ModuleManager::module_context(&outcome, &ctx);
        let commands = ModuleManager::generate_commands(&outcome, &module_ctx);
        assert_eq!(commands.dev, vec!["serve-a", "shared", "serve-b", "shared"]);
    }

    #[tokio::test]
    async fn test_module_context_reflects_survivors() {
        let mut php = StubModule::new("php", 0.9);
        php.module_type = ModuleType::Language;
        let manager = ModuleManager::with_modules(vec![
            php.arc(),
            StubModule::new("laravel", 0.9).arc(),
            StubModule::new("vue", 0.1).arc(),
        ]);

        let ctx = DetectionContext::new("/repo").with_files(["composer.lock"]);
        let outcome = manager.detect(&ctx).await;
        let stack = ModuleManager::module_context(&outcome, &ctx).detected_stack;

        assert_eq!(stack.frameworks, vec!["laravel"]);
        assert_eq!(stack.languages, vec!["php"]);
        assert_eq!(stack.runtime, "unknown");
        assert!(stack.has_package_manager("composer"));
    }

    #[tokio::test]
    async fn test_from_registry_respects_disabled() {
        let mut registry = ModuleRegistry::with_defaults();
        registry.disable(&ModuleId::Tailwind);

        let manager = ModuleManager::from_registry(&registry).await;
        assert_eq!(manager.modules().len(), 13);
        assert!(manager.modules().iter().all(|m| m.id() != ModuleId::Tailwind));
    }
}
