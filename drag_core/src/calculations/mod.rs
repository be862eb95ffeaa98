//! # Drag Build-Up Calculations
//!
//! The build-up runs as one batch over an ordered list of rows:
//!
//! - [`rows`] - Expands components into rows with copied user inputs
//! - [`pipeline`] - Per-row derivation stages (Swet through Cd)
//! - [`grouping`] - Wetted-area folding, ancestor overwrite, zero line items
//! - [`excrescence`] - Additive drag items and the margin closed form
//! - [`sorting`] - Group-preserving display order
//! - [`build_up`] - [`DragBuildUp`], which owns the state and runs it all
//!
//! All types serialize to JSON. Degenerate numerics resolve to documented
//! sentinels; only invalid configuration returns an error.

pub mod build_up;
pub mod excrescence;
pub mod grouping;
pub mod pipeline;
pub mod rows;
pub mod sorting;

pub use build_up::{select_components, BuildUpSettings, DragBuildUp, DragTotals, ReferenceMode};
pub use excrescence::{Excrescence, ExcrescenceKind, ExcrescenceLedger, LedgerBasis};
pub use rows::{build_rows, FormFactorEquation, Row};
pub use sorting::SortOrder;
