//! Guideline aggregation for resolved detection results
//!
//! Every surviving module contributes its guideline paths, tagged with its id
//! and priority class. The list is deduplicated by path (first occurrence wins)
//! and stably sorted by [`PriorityType::rank`], so modules of the same class keep
//! registration order and each module keeps its core document ahead of its
//! version document.

pub mod render;
pub mod store;

pub use render::{inject_guidelines, render_document, GUIDELINES_END_MARKER, GUIDELINES_START_MARKER};
pub use store::{DocumentStore, EmbeddedDocumentStore, FsDocumentStore};

use crate::error::GuidelineError;
use crate::modules::{DetectionOutcome, ModuleId, PriorityType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// A guideline reference owned by one detected module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineEntry {
    pub module: ModuleId,
    pub path: String,
    pub priority: PriorityType,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A guideline entry with its Markdown body loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGuideline {
    pub module: ModuleId,
    pub path: String,
    pub priority: PriorityType,
    pub category: String,
    pub content: String,
}

impl ResolvedGuideline {
    fn from_entry(entry: &GuidelineEntry, content: String) -> Self {
        Self {
            module: entry.module.clone(),
            path: entry.path.clone(),
            priority: entry.priority.clone(),
            category: entry.category.clone(),
            content,
        }
    }
}

pub struct GuidelineManager {
    store: Arc<dyn DocumentStore>,
}

impl GuidelineManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn embedded() -> Self {
        Self::new(Arc::new(EmbeddedDocumentStore::new()))
    }

    /// Ordered, deduplicated guideline list for the surviving modules.
    pub fn collect(&self, outcome: &DetectionOutcome) -> Vec<GuidelineEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for detected in outcome.modules() {
            let id = detected.id();
            let priority = detected.module.priority_type();

            for guideline in detected.module.guideline_paths(detected.version.as_deref()) {
                if !seen.insert(guideline.path.clone()) {
                    debug!(module = %id, path = %guideline.path, "Skipping duplicate guideline");
                    continue;
                }
                entries.push(GuidelineEntry {
                    module: id.clone(),
                    path: guideline.path,
                    priority: priority.clone(),
                    category: guideline.category,
                    version: guideline.version,
                });
            }
        }

        entries.sort_by_key(|entry| entry.priority.rank());
        entries
    }

    /// Loads every body, failing on the first missing one.
    pub fn resolve(&self, entries: &[GuidelineEntry]) -> Result<Vec<ResolvedGuideline>, GuidelineError> {
        entries
            .iter()
            .map(|entry| {
                self.store
                    .load(&entry.path)
                    .map(|content| ResolvedGuideline::from_entry(entry, content))
            })
            .collect()
    }

    /// Loads what it can and reports the rest.
    pub fn resolve_available(
        &self,
        entries: &[GuidelineEntry],
    ) -> (Vec<ResolvedGuideline>, Vec<GuidelineError>) {
        let mut resolved = Vec::with_capacity(entries.len());
        let mut missing = Vec::new();

        for entry in entries {
            match self.store.load(&entry.path) {
                Ok(content) => resolved.push(ResolvedGuideline::from_entry(entry, content)),
                Err(e) => {
                    warn!(module = %entry.module, path = %entry.path, error = %e, "Guideline body unavailable");
                    missing.push(e);
                }
            }
        }

        (resolved, missing)
    }
}
