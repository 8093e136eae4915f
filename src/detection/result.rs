//! Detection verdicts and the evidence fold that produces them

use crate::modules::ModuleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one module's `detect` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub detected: bool,
    pub confidence: f64,
    pub evidence: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<ModuleId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl DetectionResult {
    pub fn not_detected() -> Self {
        Self {
            detected: false,
            confidence: 0.0,
            evidence: Vec::new(),
            excludes: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Zero-confidence result recording why the module could not produce a verdict.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::not_detected().with_metadata("error", reason)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence) && (!self.detected || self.confidence > 0.0)
    }
}

impl Default for DetectionResult {
    fn default() -> Self {
        Self::not_detected()
    }
}

/// A heuristic that passed, with the weight it contributes
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCheck {
    pub label: String,
    pub weight: f64,
}

/// Ordered list of passed checks.
///
/// Checks are folded left to right in recording order, so the same context
/// always yields the same confidence and the same evidence listing.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    checks: Vec<WeightedCheck>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `label` with `weight` when `passed` holds; otherwise a no-op.
    pub fn check(mut self, passed: bool, weight: f64, label: impl Into<String>) -> Self {
        if passed {
            self.checks.push(WeightedCheck {
                label: label.into(),
                weight,
            });
        }
        self
    }

    pub fn checks(&self) -> &[WeightedCheck] {
        &self.checks
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn confidence(&self) -> f64 {
        self.checks
            .iter()
            .fold(0.0_f64, |acc, c| acc + c.weight)
            .clamp(0.0, 1.0)
    }

    /// Produces the verdict. `excludes` only survive when the module is detected.
    pub fn into_result(self, threshold: f64, excludes: &[ModuleId]) -> DetectionResult {
        let confidence = self.confidence();
        let detected = confidence > threshold;

        DetectionResult {
            detected,
            confidence,
            evidence: self.checks.into_iter().map(|c| c.label).collect(),
            excludes: if detected { excludes.to_vec() } else { Vec::new() },
            metadata: BTreeMap::new(),
        }
    }
}
