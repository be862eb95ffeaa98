//! # Excrescence Ledger
//!
//! Named additive drag items that the geometric build-up does not capture:
//! antennas, gaps, steps, a manufacturing margin.
//!
//! ## Kinds
//!
//! | Kind | Input | Amount (CD) |
//! |------|-------|-------------|
//! | `Count` | drag counts | input / 10000 |
//! | `Cd` | CD | input |
//! | `PercentGeometry` | % of geometry CD | input / 100 · CD_geom |
//! | `Margin` | % of total CD | S / ((100 - p) / 100) - S |
//! | `DragArea` | D/q | input / Sref |
//!
//! `S` is the subtotal: geometry CD plus every non-margin amount. The
//! margin is defined against a total that includes itself and is resolved
//! in closed form. At most one margin item may exist.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{DragError, DragResult};

/// Drag counts per unit CD
pub const COUNTS_PER_CD: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExcrescenceKind {
    Count,
    Cd,
    PercentGeometry,
    Margin,
    DragArea,
}

impl ExcrescenceKind {
    pub const ALL: [ExcrescenceKind; 5] = [
        ExcrescenceKind::Count,
        ExcrescenceKind::Cd,
        ExcrescenceKind::PercentGeometry,
        ExcrescenceKind::Margin,
        ExcrescenceKind::DragArea,
    ];

    /// Display string used in reports
    pub fn type_string(&self) -> &'static str {
        match self {
            ExcrescenceKind::Count => "Count (10000*CD)",
            ExcrescenceKind::Cd => "CD",
            ExcrescenceKind::PercentGeometry => "% of Cd_Geom",
            ExcrescenceKind::Margin => "Margin",
            ExcrescenceKind::DragArea => "Drag Area (D/q)",
        }
    }

    /// Lower bound, upper bound, and whether the upper bound is inclusive
    pub fn limits(&self) -> (f64, f64, bool) {
        match self {
            ExcrescenceKind::Count => (0.0, 2000.0, true),
            ExcrescenceKind::Cd => (0.0, 0.2, true),
            ExcrescenceKind::PercentGeometry => (0.0, 100.0, true),
            ExcrescenceKind::Margin => (0.0, 100.0, false),
            ExcrescenceKind::DragArea => (0.0, 10.0, true),
        }
    }

    /// Check a raw input against this kind's limits
    pub fn validate(&self, value: f64) -> DragResult<()> {
        let (lower, upper, inclusive) = self.limits();
        let in_range = value >= lower && if inclusive { value <= upper } else { value < upper };
        if !value.is_finite() || !in_range {
            let bracket = if inclusive { "]" } else { ")" };
            return Err(DragError::invalid_input(
                "excrescence_value",
                value.to_string(),
                format!("{} input must be in [{}, {}{}", self.type_string(), lower, upper, bracket),
            ));
        }
        Ok(())
    }

    /// Whether the amount is fixed by the input alone
    pub fn is_direct(&self) -> bool {
        matches!(self, ExcrescenceKind::Count | ExcrescenceKind::Cd)
    }
}

/// One ledger item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excrescence {
    pub label: String,
    pub kind: ExcrescenceKind,
    /// Raw value as entered
    pub input: f64,
    /// Resolved CD
    pub amount: f64,
    /// Drag area, amount · Sref
    pub f: f64,
    pub perc_total_cd: f64,
}

/// Inputs the dependent kinds resolve against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerBasis {
    /// Sum of positive row CD
    pub geometry_cd: f64,
    pub sref: f64,
    /// Whether a geometry snapshot exists
    pub has_geometry: bool,
}

/// Ordered excrescence items plus the item being edited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcrescenceLedger {
    items: Vec<Excrescence>,
    current: Option<usize>,
}

impl ExcrescenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Excrescence] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Excrescence> {
        self.current.and_then(|i| self.items.get(i))
    }

    pub fn has_margin(&self) -> bool {
        self.items.iter().any(|e| e.kind == ExcrescenceKind::Margin)
    }

    /// Append an item and make it current.
    ///
    /// A blank label becomes `EXCRES_<n>`. A second margin item is refused
    /// and `Ok(None)` returned. Dependent kinds resolve on the next
    /// [`recompute`](Self::recompute).
    pub fn add(&mut self, label: Option<&str>, kind: ExcrescenceKind, input: f64, sref: f64) -> DragResult<Option<usize>> {
        if kind == ExcrescenceKind::Margin && self.has_margin() {
            warn!("ledger already holds a margin item; refusing a second");
            return Ok(None);
        }
        kind.validate(input)?;

        let label = match label.map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => format!("EXCRES_{}", self.items.len()),
        };
        let amount = match kind {
            ExcrescenceKind::Count => input / COUNTS_PER_CD,
            ExcrescenceKind::Cd => input,
            _ => 0.0,
        };

        self.items.push(Excrescence {
            label,
            kind,
            input,
            amount,
            f: amount * sref,
            perc_total_cd: 0.0,
        });
        let index = self.items.len() - 1;
        self.current = Some(index);
        debug!(index, kind = kind.type_string(), input, "excrescence added");
        Ok(Some(index))
    }

    /// Make `index` the current item
    pub fn select(&mut self, index: usize) -> DragResult<()> {
        if index >= self.items.len() {
            return Err(DragError::invalid_input(
                "excrescence_index",
                index.to_string(),
                format!("Ledger holds {} items", self.items.len()),
            ));
        }
        self.current = Some(index);
        Ok(())
    }

    /// Remove the current item; item 0 becomes current, or none if empty
    pub fn delete_current(&mut self) {
        if let Some(index) = self.current.filter(|i| *i < self.items.len()) {
            self.items.remove(index);
        }
        self.current = if self.items.is_empty() { None } else { Some(0) };
    }

    /// Remove the item at `index`
    pub fn delete(&mut self, index: usize) -> DragResult<()> {
        self.select(index)?;
        self.delete_current();
        Ok(())
    }

    pub fn set_current_label(&mut self, label: &str) {
        if let Some(item) = self.current.and_then(|i| self.items.get_mut(i)) {
            item.label = label.to_string();
        }
    }

    /// Change the current item's raw input
    pub fn set_current_value(&mut self, input: f64) -> DragResult<()> {
        let Some(item) = self.current.and_then(|i| self.items.get_mut(i)) else {
            return Err(DragError::missing_field("current excrescence"));
        };
        item.kind.validate(input)?;
        item.input = input;
        if item.kind.is_direct() {
            item.amount = match item.kind {
                ExcrescenceKind::Count => input / COUNTS_PER_CD,
                _ => input,
            };
        }
        Ok(())
    }

    /// Sum of every non-margin amount
    pub fn subtotal_cd(&self) -> f64 {
        self.items
            .iter()
            .filter(|e| e.kind != ExcrescenceKind::Margin)
            .map(|e| e.amount)
            .sum()
    }

    /// Sum of every amount
    pub fn total_cd(&self) -> f64 {
        self.items.iter().map(|e| e.amount).sum()
    }

    /// Resolve every amount and drag area against `basis`.
    ///
    /// Non-margin items resolve first; the margin then sees the final
    /// subtotal.
    pub fn recompute(&mut self, basis: &LedgerBasis) {
        for item in self.items.iter_mut().filter(|e| e.kind != ExcrescenceKind::Margin) {
            item.amount = match item.kind {
                ExcrescenceKind::Count => item.input / COUNTS_PER_CD,
                ExcrescenceKind::Cd => item.input,
                ExcrescenceKind::PercentGeometry => percent_of_geometry(item.input, basis),
                ExcrescenceKind::DragArea => drag_area_cd(item.input, basis),
                ExcrescenceKind::Margin => item.amount,
            };
        }

        let subtotal = basis.geometry_cd + self.subtotal_cd();
        for item in self.items.iter_mut().filter(|e| e.kind == ExcrescenceKind::Margin) {
            item.amount = margin_amount(item.input, subtotal, basis.has_geometry);
        }

        // Drag area stays 0 until there is a positive subtotal to scale
        let resolved = basis.has_geometry && subtotal > 0.0;
        for item in self.items.iter_mut() {
            item.f = if resolved { item.amount * basis.sref } else { 0.0 };
        }
    }

    /// Set each item's share of `total_cd` (0 when there is no geometry or
    /// no positive total)
    pub fn update_percentages(&mut self, total_cd: f64, has_geometry: bool) {
        for item in self.items.iter_mut() {
            item.perc_total_cd = if has_geometry && total_cd > 0.0 {
                item.amount / total_cd
            } else {
                0.0
            };
        }
    }
}

/// `val` percent of the geometry CD
pub fn percent_of_geometry(val: f64, basis: &LedgerBasis) -> f64 {
    if basis.has_geometry && basis.geometry_cd > 0.0 {
        val / 100.0 * basis.geometry_cd
    } else {
        0.0
    }
}

/// Margin that makes up `val` percent of the resulting total
pub fn margin_amount(val: f64, subtotal: f64, has_geometry: bool) -> f64 {
    if has_geometry && subtotal > 0.0 {
        subtotal / ((100.0 - val) / 100.0) - subtotal
    } else {
        0.0
    }
}

/// CD of a drag area `D/q`
pub fn drag_area_cd(val: f64, basis: &LedgerBasis) -> f64 {
    if basis.has_geometry && basis.geometry_cd > 0.0 {
        val / basis.sref
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SREF: f64 = 100.0;

    fn basis(geometry_cd: f64) -> LedgerBasis {
        LedgerBasis {
            geometry_cd,
            sref: SREF,
            has_geometry: true,
        }
    }

    #[test]
    fn test_default_labels_use_ledger_size() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::Cd, 0.001, SREF).unwrap();
        ledger.add(Some("  "), ExcrescenceKind::Count, 5.0, SREF).unwrap();
        ledger.add(Some("Antenna"), ExcrescenceKind::Cd, 0.0002, SREF).unwrap();
        let labels: Vec<&str> = ledger.items().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["EXCRES_0", "EXCRES_1", "Antenna"]);
        assert_eq!(ledger.current_index(), Some(2));
    }

    #[test]
    fn test_direct_amounts() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::Count, 12.0, SREF).unwrap();
        ledger.add(None, ExcrescenceKind::Cd, 0.0015, SREF).unwrap();
        assert!((ledger.items()[0].amount - 0.0012).abs() < 1e-15);
        assert!((ledger.items()[1].amount - 0.0015).abs() < 1e-15);
        assert!((ledger.items()[1].f - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_second_margin_is_refused() {
        let mut ledger = ExcrescenceLedger::new();
        assert_eq!(ledger.add(None, ExcrescenceKind::Margin, 5.0, SREF).unwrap(), Some(0));
        assert_eq!(ledger.add(None, ExcrescenceKind::Margin, 8.0, SREF).unwrap(), None);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_out_of_range_input_is_rejected() {
        let mut ledger = ExcrescenceLedger::new();
        assert!(ledger.add(None, ExcrescenceKind::Cd, 0.3, SREF).is_err());
        assert!(ledger.add(None, ExcrescenceKind::Margin, 100.0, SREF).is_err());
        assert!(ledger.add(None, ExcrescenceKind::Count, -1.0, SREF).is_err());
        assert!(ledger.add(None, ExcrescenceKind::DragArea, 10.0, SREF).is_ok());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_percent_of_geometry_tracks_geometry() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::PercentGeometry, 10.0, SREF).unwrap();
        ledger.recompute(&basis(0.02));
        assert!((ledger.items()[0].amount - 0.002).abs() < 1e-15);
        ledger.recompute(&basis(0.03));
        assert!((ledger.items()[0].amount - 0.003).abs() < 1e-15);
    }

    #[test]
    fn test_margin_closed_form() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::Cd, 0.004, SREF).unwrap();
        ledger.add(None, ExcrescenceKind::Margin, 20.0, SREF).unwrap();
        ledger.recompute(&basis(0.016));

        let subtotal = 0.016 + ledger.subtotal_cd();
        let margin = ledger.items()[1].amount;
        assert!((subtotal - 0.02).abs() < 1e-15);
        assert!((margin - 0.005).abs() < 1e-12);
        assert!((subtotal / (subtotal + margin) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_drag_area() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::DragArea, 0.5, SREF).unwrap();
        ledger.recompute(&basis(0.02));
        assert!((ledger.items()[0].amount - 0.005).abs() < 1e-15);
        assert!((ledger.items()[0].f - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dependent_kinds_are_zero_without_geometry() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::PercentGeometry, 10.0, SREF).unwrap();
        ledger.add(None, ExcrescenceKind::Margin, 10.0, SREF).unwrap();
        ledger.add(None, ExcrescenceKind::DragArea, 1.0, SREF).unwrap();
        ledger.recompute(&LedgerBasis {
            geometry_cd: 0.02,
            sref: SREF,
            has_geometry: false,
        });
        assert!(ledger.items().iter().all(|e| e.amount == 0.0));
    }

    #[test]
    fn test_drag_area_needs_geometry() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::Cd, 0.002, SREF).unwrap();
        ledger.add(None, ExcrescenceKind::Count, 10.0, SREF).unwrap();

        ledger.recompute(&LedgerBasis {
            geometry_cd: 0.02,
            sref: SREF,
            has_geometry: false,
        });
        assert!((ledger.items()[0].amount - 0.002).abs() < 1e-15);
        assert!(ledger.items().iter().all(|e| e.f == 0.0));

        ledger.recompute(&basis(0.02));
        assert!((ledger.items()[0].f - 0.2).abs() < 1e-12);
        assert!((ledger.items()[1].f - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_delete_selects_first_item() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(Some("a"), ExcrescenceKind::Cd, 0.001, SREF).unwrap();
        ledger.add(Some("b"), ExcrescenceKind::Cd, 0.001, SREF).unwrap();
        ledger.add(Some("c"), ExcrescenceKind::Cd, 0.001, SREF).unwrap();

        ledger.delete(1).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.current().map(|e| e.label.as_str()), Some("a"));

        ledger.delete_current();
        ledger.delete_current();
        assert!(ledger.is_empty());
        assert_eq!(ledger.current_index(), None);
        assert!(ledger.delete(0).is_err());
    }

    #[test]
    fn test_edit_current_item() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::Count, 10.0, SREF).unwrap();
        ledger.set_current_label("Gaps");
        ledger.set_current_value(20.0).unwrap();
        assert!(ledger.set_current_value(5000.0).is_err());

        let item = &ledger.items()[0];
        assert_eq!(item.label, "Gaps");
        assert!((item.amount - 0.002).abs() < 1e-15);
    }

    #[test]
    fn test_percentages_of_total() {
        let mut ledger = ExcrescenceLedger::new();
        ledger.add(None, ExcrescenceKind::Cd, 0.002, SREF).unwrap();
        ledger.update_percentages(0.02, true);
        assert!((ledger.items()[0].perc_total_cd - 0.1).abs() < 1e-12);
        ledger.update_percentages(0.0, true);
        assert_eq!(ledger.items()[0].perc_total_cd, 0.0);
    }
}
