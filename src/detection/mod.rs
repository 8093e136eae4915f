//! Shared data contracts consumed and produced by every module

pub mod context;
pub mod result;

pub use context::DetectionContext;
pub use result::{DetectionResult, Evidence, WeightedCheck};
