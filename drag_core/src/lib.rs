//! # drag_core - Parasite Drag Build-Up Engine
//!
//! `drag_core` computes the parasite (friction and form) drag of an aircraft
//! from per-surface geometric descriptors and a library of empirical skin
//! friction and form factor correlations, then aggregates the rows with
//! excrescence items into a report. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Explicit context**: the vehicle and geometry snapshot are passed into
//!   every run, never looked up globally
//! - **Rows, not parallel arrays**: one ordered `Vec<Row>` carries every field
//! - **Sentinels, not panics**: degenerate numerics resolve to documented
//!   values; only invalid configuration is an error
//!
//! ## Quick Start
//!
//! ```rust
//! use drag_core::calculations::{DragBuildUp, ExcrescenceKind};
//! use drag_core::geometry::Vehicle;
//! use drag_core::report::DragReport;
//!
//! let vehicle = Vehicle::default();
//! let mut build_up = DragBuildUp::default();
//! build_up.select_components(&vehicle, &vehicle.all_ids()).unwrap();
//! build_up.add_excrescence(Some("Antenna"), ExcrescenceKind::Count, 2.0).unwrap();
//! build_up.calculate_all(&vehicle, None).unwrap();
//!
//! let csv = DragReport::from_build_up(&build_up).to_csv_string().unwrap();
//! assert!(csv.starts_with("Results_Name"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Row builder, derivation pipeline, grouping, excrescences, sorting
//! - [`equations`] - Skin friction and form factor correlations, Newton solver, registry
//! - [`geometry`] - Vehicle components and the degenerate geometry snapshot
//! - [`flow`] - Freestream condition and its derived quantities
//! - [`atmosphere`] - US Standard Atmosphere 1976 and gas relations
//! - [`units`] - Unit enums, conversions and export labels
//! - [`report`] - Report snapshot with CSV and JSON export
//! - [`study`] - Persisted study document
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`errors`] - Structured error types

pub mod atmosphere;
pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod flow;
pub mod geometry;
pub mod report;
pub mod study;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{BuildUpSettings, DragBuildUp, DragTotals, ExcrescenceKind, Row, SortOrder};
pub use errors::{DragError, DragResult};
pub use file_io::{load_json, load_study, save_study, FileLock};
pub use flow::{FlowCondition, FreestreamMode};
pub use geometry::{DegenGeometry, Vehicle};
pub use report::DragReport;
pub use study::{DragStudy, StudyMetadata};
