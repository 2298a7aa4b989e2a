//! Process capability analysis.
//!
//! The capability layer of the engine: specification limits from a target
//! and tolerances, a sigma estimate tagged with its estimator, and the
//! capability indices.
//!
//! # Indices
//!
//! - **Cp** — Potential capability (spread vs tolerance)
//! - **Cpk** — Actual capability (centering considered)
//! - **Cpm** — Taguchi capability (deviation from target)
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.

mod indices;
mod sigma;
mod spec;

pub use indices::{assess, capability_indices, CapabilityIndices, CapabilityReport};
pub use sigma::{estimate_sigma, SigmaEstimate, SigmaMethod};
pub use spec::{SpecificationLimits, DEFAULT_TARGET, DEFAULT_TOLERANCE};
