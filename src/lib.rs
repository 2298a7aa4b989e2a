//! # u-spc
//!
//! Statistical process control for subgrouped measurement data: X-bar and
//! R control charts and process capability (Cp, Cpk).
//!
//! The engine is a set of pure functions over an immutable
//! [`SubgroupMatrix`](spc::SubgroupMatrix). Nothing is cached between calls
//! and nothing is shared, so independent datasets can be analyzed on as many
//! threads as the caller likes.
//!
//! ## Modules
//!
//! - [`spc`] — Subgroup statistics, control chart factors, X-bar/R limits,
//!   point classification
//! - [`capability`] — Specification limits, sigma estimation, Cp/Cpk/Cpm
//! - [`distribution`] — Histogram bins for the capability view
//! - [`report`] — One-call analysis of a dataset
//! - [`dataset`] — Labeled measurement tables (TOML)
//! - [`config`] — Front-end configuration (TOML)
//!
//! ## Example
//!
//! ```
//! use u_spc::capability::SpecificationLimits;
//! use u_spc::report::{analyze, AnalysisOptions};
//! use u_spc::spc::SubgroupMatrix;
//!
//! let matrix = SubgroupMatrix::new(vec![
//!     vec![10.0, 12.0, 11.0],
//!     vec![9.0, 13.0, 11.0],
//!     vec![10.0, 10.0, 10.0],
//! ]).unwrap();
//!
//! let spec = SpecificationLimits::new(11.0, 4.0, 4.0).unwrap();
//! let report = analyze(&matrix, Some(&spec), AnalysisOptions::default()).unwrap();
//!
//! assert_eq!(report.chart.limits().mean_range, 2.0);
//! assert!(report.chart.is_in_control());
//! ```

pub mod capability;
pub mod config;
pub mod dataset;
pub mod distribution;
pub mod error;
pub mod report;
pub mod spc;

pub use error::{LoadError, SpcError};
