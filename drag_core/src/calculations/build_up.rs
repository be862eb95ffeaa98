//! # Drag Build-Up
//!
//! [`DragBuildUp`] owns the settings, the flow condition, the excrescence
//! ledger and the last computed rows. A full recomputation is one call:
//!
//! ```rust
//! use drag_core::calculations::build_up::DragBuildUp;
//! use drag_core::geometry::Vehicle;
//!
//! let vehicle = Vehicle::default();
//! let mut build_up = DragBuildUp::default();
//! build_up.select_components(&vehicle, &vehicle.all_ids()).unwrap();
//! build_up.calculate_all(&vehicle, None).unwrap();
//! assert!(build_up.rows().is_empty());
//! ```
//!
//! The vehicle and geometry snapshot are borrowed for the call and never
//! modified. Running twice on unchanged inputs gives identical results.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::excrescence::{ExcrescenceKind, ExcrescenceLedger, LedgerBasis};
use super::pipeline::{self, lref_sig_figs, reynolds_power_divisor, PipelineContext};
use super::rows::{build_rows, Row};
use super::sorting::{sort_rows, SortOrder};
use crate::equations::friction::{LamCfEquation, TurbCfEquation};
use crate::equations::solver::NewtonSettings;
use crate::errors::{DragError, DragResult};
use crate::flow::FlowCondition;
use crate::geometry::{ComponentKind, DegenGeometry, SurfaceShape, Vehicle};
use crate::units::LengthUnit;

/// Where the reference area comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferenceMode {
    #[default]
    Manual,
    /// Total planform area of a wing component
    Component,
}

/// Build-up settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildUpSettings {
    pub ref_mode: ReferenceMode,
    /// Reference area in model length units squared
    pub sref: f64,
    pub ref_component_id: Option<String>,
    pub lam_cf: LamCfEquation,
    pub turb_cf: TurbCfEquation,
    /// Model length unit
    pub length_unit: LengthUnit,
    pub sort_order: SortOrder,
    pub newton: NewtonSettings,
}

impl Default for BuildUpSettings {
    fn default() -> Self {
        BuildUpSettings {
            ref_mode: ReferenceMode::Manual,
            sref: 100.0,
            ref_component_id: None,
            lam_cf: LamCfEquation::Blasius,
            turb_cf: TurbCfEquation::PowerLawBlasius,
            length_unit: LengthUnit::Ft,
            sort_order: SortOrder::None,
            newton: NewtonSettings::default(),
        }
    }
}

impl BuildUpSettings {
    pub fn validate(&self) -> DragResult<()> {
        if !self.sref.is_finite() || self.sref <= 0.0 {
            return Err(DragError::invalid_input(
                "sref",
                self.sref.to_string(),
                "Reference area must be positive",
            ));
        }
        if !self.newton.tolerance.is_finite() || self.newton.tolerance <= 0.0 {
            return Err(DragError::invalid_input(
                "newton.tolerance",
                self.newton.tolerance.to_string(),
                "Tolerance must be positive",
            ));
        }
        if self.newton.max_iterations == 0 {
            return Err(DragError::invalid_input(
                "newton.max_iterations",
                "0",
                "At least one iteration is required",
            ));
        }
        Ok(())
    }
}

/// Aggregate drag of the last run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragTotals {
    pub geometry_f: f64,
    pub geometry_cd: f64,
    pub geometry_percent: f64,
    pub excrescence_f: f64,
    pub excrescence_cd: f64,
    pub excrescence_percent: f64,
    /// Geometry plus non-margin excrescences
    pub subtotal_cd: f64,
    pub total_f: f64,
    pub total_cd: f64,
    pub total_percent: f64,
}

/// Components that can contribute rows: buildable kinds whose first
/// surface is not a disk.
///
/// Unknown ids in `set` are an error.
pub fn select_components(vehicle: &Vehicle, set: &[String]) -> DragResult<Vec<String>> {
    let mut selected = Vec::with_capacity(set.len());
    for id in set {
        let component = vehicle.find(id).ok_or_else(|| DragError::component_not_found(id.as_str()))?;
        let first_is_disk = component.surfaces.first() == Some(&SurfaceShape::Disk);
        if component.kind.is_buildable() && !first_is_disk {
            selected.push(id.clone());
        }
    }
    Ok(selected)
}

/// Rows a component list produces
fn expected_row_count(vehicle: &Vehicle, ids: &[String]) -> usize {
    ids.iter()
        .filter_map(|id| vehicle.find(id))
        .map(|c| c.row_count())
        .sum()
}

/// Drag build-up state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DragBuildUp {
    pub settings: BuildUpSettings,
    pub flow: FlowCondition,
    pub excrescences: ExcrescenceLedger,

    #[serde(skip)]
    component_ids: Vec<String>,
    #[serde(skip)]
    row_count: usize,
    #[serde(skip)]
    rows: Vec<Row>,
    #[serde(skip)]
    has_geometry: bool,
    #[serde(skip)]
    totals: DragTotals,
}

impl DragBuildUp {
    pub fn new(settings: BuildUpSettings, flow: FlowCondition) -> Self {
        DragBuildUp {
            settings,
            flow,
            ..Default::default()
        }
    }

    pub fn component_ids(&self) -> &[String] {
        &self.component_ids
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn totals(&self) -> &DragTotals {
        &self.totals
    }

    pub fn has_geometry(&self) -> bool {
        self.has_geometry
    }

    pub fn reynolds_power_divisor(&self) -> i32 {
        reynolds_power_divisor(&self.rows)
    }

    pub fn lref_sig_figs(&self) -> usize {
        lref_sig_figs(&self.rows)
    }

    /// Choose the components that make up the build-up
    pub fn select_components(&mut self, vehicle: &Vehicle, set: &[String]) -> DragResult<()> {
        self.component_ids = select_components(vehicle, set)?;
        self.row_count = expected_row_count(vehicle, &self.component_ids);
        debug!(
            components = self.component_ids.len(),
            rows = self.row_count,
            "components selected"
        );
        Ok(())
    }

    /// Whether `set` still resolves to the selected components and row count
    pub fn is_same_component_set(&self, vehicle: &Vehicle, set: &[String]) -> bool {
        match select_components(vehicle, set) {
            Ok(ids) => ids == self.component_ids && expected_row_count(vehicle, &ids) == self.row_count,
            Err(_) => false,
        }
    }

    /// Drop stale results and reselect when the component set changed.
    ///
    /// Returns `true` when the state was invalidated.
    pub fn refresh(&mut self, vehicle: &Vehicle, set: &[String]) -> DragResult<bool> {
        if self.is_same_component_set(vehicle, set) {
            return Ok(false);
        }
        self.rows.clear();
        self.has_geometry = false;
        self.totals = DragTotals::default();
        self.select_components(vehicle, set)?;
        info!("component set changed; results invalidated");
        Ok(true)
    }

    /// Pull Sref from the reference wing when in component mode.
    ///
    /// A reference id that no longer resolves is cleared and the mode
    /// falls back to manual.
    pub fn update_reference_area(&mut self, vehicle: &Vehicle) {
        if self.settings.ref_mode != ReferenceMode::Component {
            return;
        }
        let reference = self.settings.ref_component_id.as_deref().and_then(|id| vehicle.find(id));
        match reference {
            Some(component) if component.kind == ComponentKind::Wing => {
                if let Some(area) = component.total_area {
                    self.settings.sref = area;
                }
            }
            Some(_) => {}
            None => {
                warn!(
                    reference = ?self.settings.ref_component_id,
                    "reference component not found; using manual Sref"
                );
                self.settings.ref_component_id = None;
                self.settings.ref_mode = ReferenceMode::Manual;
            }
        }
    }

    /// Run the whole build-up against one geometry snapshot.
    ///
    /// Rows are rebuilt from the selected components; `None` geometry
    /// leaves every derived value at -1.
    pub fn calculate_all(&mut self, vehicle: &Vehicle, geometry: Option<&DegenGeometry>) -> DragResult<()> {
        self.update_reference_area(vehicle);
        self.settings.validate()?;
        self.flow.update(self.settings.length_unit)?;

        let mut rows = build_rows(vehicle, &self.component_ids)?;
        let ctx = PipelineContext {
            flow: &self.flow,
            geometry,
            length_unit: self.settings.length_unit,
            lam_cf: self.settings.lam_cf,
            turb_cf: self.settings.turb_cf,
            newton: self.settings.newton,
            sref: self.settings.sref,
        };
        pipeline::run(&mut rows, &ctx);
        self.has_geometry = ctx.has_geometry();

        let geometry_cd: f64 = rows.iter().map(|r| r.cd).filter(|cd| *cd > 0.0).sum();
        self.excrescences.recompute(&LedgerBasis {
            geometry_cd,
            sref: self.settings.sref,
            has_geometry: self.has_geometry,
        });
        self.totals = self.update_percentages(&mut rows, geometry_cd);

        self.rows = sort_rows(rows, self.settings.sort_order);

        info!(
            rows = self.rows.len(),
            geometry_cd = self.totals.geometry_cd,
            total_cd = self.totals.total_cd,
            "drag build-up complete"
        );
        Ok(())
    }

    /// Recompute ledger amounts and totals without rerunning the rows,
    /// after an excrescence edit
    pub fn update_excrescences(&mut self) {
        let geometry_cd = self.totals.geometry_cd;
        self.excrescences.recompute(&LedgerBasis {
            geometry_cd,
            sref: self.settings.sref,
            has_geometry: self.has_geometry,
        });
        let mut rows = std::mem::take(&mut self.rows);
        self.totals = self.update_percentages(&mut rows, geometry_cd);
        self.rows = rows;
    }

    /// Add an excrescence; see [`ExcrescenceLedger::add`]
    pub fn add_excrescence(&mut self, label: Option<&str>, kind: ExcrescenceKind, input: f64) -> DragResult<Option<usize>> {
        let added = self.excrescences.add(label, kind, input, self.settings.sref)?;
        self.update_excrescences();
        Ok(added)
    }

    pub fn delete_excrescence(&mut self, index: usize) -> DragResult<()> {
        self.excrescences.delete(index)?;
        self.update_excrescences();
        Ok(())
    }

    fn update_percentages(&mut self, rows: &mut [Row], geometry_cd: f64) -> DragTotals {
        let has_geometry = self.has_geometry;
        let subtotal_cd = geometry_cd + self.excrescences.subtotal_cd();
        let total_cd = if self.excrescences.has_margin() {
            geometry_cd + self.excrescences.total_cd()
        } else {
            subtotal_cd
        };

        let mut geometry_f = 0.0;
        let mut geometry_percent = 0.0;
        for row in rows.iter_mut() {
            row.perc_total_cd = if has_geometry && !row.f.is_nan() && total_cd > 0.0 {
                row.cd / total_cd
            } else {
                0.0
            };
            if has_geometry && !row.f.is_nan() {
                geometry_f += row.f;
                geometry_percent += row.perc_total_cd;
            }
        }

        self.excrescences.update_percentages(total_cd, has_geometry);
        let items = self.excrescences.items();
        let excrescence_f: f64 = if has_geometry { items.iter().map(|e| e.f).sum() } else { 0.0 };
        let excrescence_percent: f64 = items.iter().map(|e| e.perc_total_cd).sum();

        DragTotals {
            geometry_f,
            geometry_cd,
            geometry_percent,
            excrescence_f,
            excrescence_cd: self.excrescences.total_cd(),
            excrescence_percent,
            subtotal_cd,
            total_f: geometry_f + excrescence_f,
            total_cd,
            total_percent: geometry_percent + excrescence_percent,
        }
    }
}
