//! # Per-Row Derivation Pipeline
//!
//! Nine stages, each a full pass over the rows and each reading only what
//! earlier stages wrote:
//!
//! 1. Wetted area (tag lookup, then the wetted-area fold)
//! 2. Reference length
//! 3. Reynolds number
//! 4. Skin friction
//! 5. Fineness ratio
//! 6. Form factor
//! 7. Ancestor overwrite
//! 8. Drag area `f = Swet · Q · Cf · FF`
//! 9. Drag coefficient `Cd = f / Sref`
//!
//! Sub-surface rows copy stages 2 through 6 from the row before them.
//! Without a geometry snapshot every derived field is the sentinel -1.

use std::f64::consts::PI;

use tracing::{debug, warn};

use super::grouping::{is_not_zero_line_item, overwrite_from_ancestors, update_wetted_area_totals};
use super::rows::{FormFactorEquation, Row};
use crate::equations::form_factor::{body_ff, wing_ff, BodyFfInputs, WingFfInputs};
use crate::equations::friction::{lam_cf, turb_cf, LamCfEquation, TurbCfEquation, TurbCfInputs};
use crate::equations::solver::NewtonSettings;
use crate::flow::{FlowCondition, FreestreamMode};
use crate::geometry::{DegenGeometry, DegenStick, SurfaceShape};
use crate::units::{convert_length, LengthUnit};

/// Sentinel for derived values when no geometry snapshot exists
pub const NO_GEOMETRY: f64 = -1.0;

/// Reference lengths at or below this are treated as degenerate
pub const MIN_REFERENCE_LENGTH: f64 = 1e-6;

/// Everything the stages read besides the rows
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    pub flow: &'a FlowCondition,
    pub geometry: Option<&'a DegenGeometry>,
    pub length_unit: LengthUnit,
    pub lam_cf: LamCfEquation,
    pub turb_cf: TurbCfEquation,
    pub newton: NewtonSettings,
    pub sref: f64,
}

impl<'a> PipelineContext<'a> {
    pub fn has_geometry(&self) -> bool {
        self.geometry.map_or(false, |g| !g.is_empty())
    }

    fn stick(&self, row: &Row) -> DegenStick {
        let found = self
            .geometry
            .and_then(|g| g.stick(&row.component_id, row.surface_index))
            .cloned();
        found.unwrap_or_else(|| {
            warn!(
                component = %row.component_id,
                surface = row.surface_index,
                "no stick data for surface; using an empty stick"
            );
            DegenStick::default()
        })
    }
}

/// Run all stages in order
pub fn run(rows: &mut [Row], ctx: &PipelineContext) {
    calculate_swet(rows, ctx);
    calculate_lref(rows, ctx);
    calculate_re(rows, ctx);
    calculate_cf(rows, ctx);
    calculate_fineness(rows, ctx);
    calculate_form_factor(rows, ctx);
    overwrite_from_ancestors(rows);
    calculate_f(rows, ctx);
    calculate_cd(rows, ctx);
}

/// Apply `copy` from the row before `i` onto row `i`
fn copy_from_previous(rows: &mut [Row], i: usize, copy: impl Fn(&Row, &mut Row)) {
    let (head, tail) = rows.split_at_mut(i);
    if let (Some(previous), Some(row)) = (head.last(), tail.first_mut()) {
        copy(previous, row);
    }
}

/// Largest element, 0 for an empty slice
fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(None, |acc: Option<f64>, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
    .unwrap_or(0.0)
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

// ============================================================================
// Stage 1: Wetted Area
// ============================================================================

pub fn calculate_swet(rows: &mut [Row], ctx: &PipelineContext) {
    let Some(geometry) = ctx.geometry.filter(|g| !g.is_empty()) else {
        rows.iter_mut().for_each(|r| r.swet = NO_GEOMETRY);
        return;
    };

    for row in rows.iter_mut() {
        let tag = row.wetted_area_tag();
        row.swet = geometry.wetted_area(&tag).unwrap_or_else(|| {
            warn!(tag = %tag, "no wetted area for tag; using 0");
            0.0
        });
    }

    update_wetted_area_totals(rows);
    debug!(rows = rows.len(), "wetted areas resolved");
}

// ============================================================================
// Stage 2: Reference Length
// ============================================================================

/// Distance between the first and last leading-edge points
pub fn body_length(stick: &DegenStick) -> f64 {
    match (stick.xle.first(), stick.xle.last()) {
        (Some(front), Some(back)) => distance(front, back),
        _ => 0.0,
    }
}

/// Chord averaged over stations, weighted by section planform area
pub fn weighted_chord(stick: &DegenStick) -> f64 {
    let sections = stick
        .area_top
        .len()
        .min(stick.xle.len().saturating_sub(1))
        .min(stick.chord.len().saturating_sub(1));

    let mut total_area = 0.0;
    let mut weighted_sum = 0.0;
    for j in 0..sections {
        let span = distance(&stick.xle[j], &stick.xle[j + 1]);
        let section_area = span * 0.5 * (stick.chord[j] + stick.chord[j + 1]);
        total_area += section_area;
        weighted_sum += stick.chord[j] * section_area;
    }
    weighted_sum / total_area
}

/// Reference length for a surface.
///
/// Tries the shape's own method, then the other one, then 1.0.
pub fn reference_length(shape: SurfaceShape, stick: &DegenStick) -> f64 {
    let usable = |l: f64| l.is_finite() && l > MIN_REFERENCE_LENGTH;
    let (primary, alternate): (fn(&DegenStick) -> f64, fn(&DegenStick) -> f64) = match shape {
        SurfaceShape::Wing => (weighted_chord, body_length),
        SurfaceShape::Body | SurfaceShape::Disk => (body_length, weighted_chord),
    };

    [primary(stick), alternate(stick)]
        .into_iter()
        .find(|l| usable(*l))
        .unwrap_or(1.0)
}

pub fn calculate_lref(rows: &mut [Row], ctx: &PipelineContext) {
    let has_geometry = ctx.has_geometry();
    for i in 0..rows.len() {
        if !has_geometry {
            rows[i].lref = NO_GEOMETRY;
        } else if rows[i].is_sub_surface() {
            copy_from_previous(rows, i, |prev, row| row.lref = prev.lref);
        } else {
            let stick = ctx.stick(&rows[i]);
            rows[i].lref = reference_length(rows[i].shape, &stick);
        }
    }
}

// ============================================================================
// Stage 3: Reynolds Number
// ============================================================================

/// Reynolds number on a reference length in model units
pub fn reynolds_number(flow: &FlowCondition, length_unit: LengthUnit, lref: f64) -> f64 {
    match flow.mode {
        FreestreamMode::ManualReL => flow.re_per_length * lref,
        _ => {
            let system_length = flow.unit_system.length_unit();
            let v = flow.velocity_in_system_units();
            let l = convert_length(lref, length_unit, system_length);
            v * l / flow.kinematic_viscosity
        }
    }
}

pub fn calculate_re(rows: &mut [Row], ctx: &PipelineContext) {
    let has_geometry = ctx.has_geometry();
    for i in 0..rows.len() {
        if !has_geometry {
            rows[i].re = NO_GEOMETRY;
        } else if rows[i].is_sub_surface() {
            copy_from_previous(rows, i, |prev, row| row.re = prev.re);
        } else {
            rows[i].re = reynolds_number(ctx.flow, ctx.length_unit, rows[i].lref);
        }
    }
}

/// ⌊log10 |x|⌋
fn magnitude(x: f64) -> i32 {
    x.abs().log10().floor() as i32
}

/// Power of ten used to scale Reynolds numbers for display
pub fn reynolds_power_divisor(rows: &[Row]) -> i32 {
    rows.iter()
        .map(|r| r.re)
        .reduce(f64::max)
        .filter(|re| re.is_finite() && *re != 0.0)
        .map_or(1, magnitude)
}

/// Significant figures for displaying reference lengths
pub fn lref_sig_figs(rows: &[Row]) -> usize {
    let lref_mag = rows
        .iter()
        .map(|r| r.lref)
        .reduce(f64::max)
        .filter(|l| l.is_finite() && *l != 0.0)
        .map_or(1, magnitude);

    match lref_mag {
        m if m > 1 => 1,
        1 => 2,
        _ => 3,
    }
}

// ============================================================================
// Stage 4: Skin Friction
// ============================================================================

/// Skin friction for one row, blending a laminar run ahead of transition.
///
/// The laminar part uses `Re_lam = p · Re` with `p` the laminar fraction.
pub fn skin_friction(ctx: &PipelineContext, row: &Row) -> f64 {
    let inputs = TurbCfInputs {
        re: row.re,
        ref_length: row.lref,
        roughness: row.roughness,
        gamma: ctx.flow.specific_heat_ratio,
        taw_tw: row.taw_tw,
        te_tw: row.te_tw,
        mach: ctx.flow.mach,
        roughness_scale: ctx.length_unit.inches_per_unit(),
    };

    if row.perc_lam == 0.0 || row.perc_lam == -1.0 {
        return turb_cf(ctx.turb_cf, &inputs, &ctx.newton);
    }
    if row.re == 0.0 {
        return 0.0;
    }

    let fraction = row.perc_lam / 100.0;
    let re_lam = fraction * row.re;
    let full_turbulent = turb_cf(ctx.turb_cf, &inputs, &ctx.newton);
    let part_turbulent = turb_cf(ctx.turb_cf, &inputs.with_re(re_lam), &ctx.newton);
    let part_laminar = lam_cf(ctx.lam_cf, re_lam);

    full_turbulent - fraction * part_turbulent + fraction * part_laminar
}

pub fn calculate_cf(rows: &mut [Row], ctx: &PipelineContext) {
    let has_geometry = ctx.has_geometry();
    for i in 0..rows.len() {
        if !has_geometry {
            rows[i].cf = NO_GEOMETRY;
        } else if rows[i].is_sub_surface() {
            copy_from_previous(rows, i, |prev, row| row.cf = prev.cf);
        } else {
            rows[i].cf = skin_friction(ctx, &rows[i]);
        }
    }
}

// ============================================================================
// Stage 5: Fineness Ratio
// ============================================================================

/// Diameter of the circle with the largest station cross-section area
fn nominal_diameter(stick: &DegenStick) -> f64 {
    2.0 * (max_value(&stick.sect_area) / PI).sqrt()
}

/// Max t/c for wings, nominal diameter over length for bodies
pub fn fineness_ratio(shape: SurfaceShape, stick: &DegenStick, lref: f64) -> f64 {
    match shape {
        SurfaceShape::Wing => max_value(&stick.toc),
        SurfaceShape::Body | SurfaceShape::Disk => nominal_diameter(stick) / lref,
    }
}

pub fn calculate_fineness(rows: &mut [Row], ctx: &PipelineContext) {
    let has_geometry = ctx.has_geometry();
    for i in 0..rows.len() {
        if !has_geometry {
            rows[i].fineness = NO_GEOMETRY;
        } else if rows[i].is_sub_surface() {
            copy_from_previous(rows, i, |prev, row| row.fineness = prev.fineness);
        } else {
            let stick = ctx.stick(&rows[i]);
            rows[i].fineness = fineness_ratio(rows[i].shape, &stick, rows[i].lref);
        }
    }
}

// ============================================================================
// Stage 6: Form Factor
// ============================================================================

/// Area-weighted quarter and half chord sweep in radians.
///
/// Section width is top area over mean top perimeter; each section's sweep
/// is offset from the leading-edge sweep by the chord taper. Zero total
/// area gives zero sweep.
pub fn average_sweep(stick: &DegenStick) -> (f64, f64) {
    let sections = stick
        .area_top
        .len()
        .min(stick.sweep_le.len())
        .min(stick.perim_top.len().saturating_sub(1))
        .min(stick.chord.len().saturating_sub(1));

    let mut total_area = 0.0;
    let mut sum25 = 0.0;
    let mut sum50 = 0.0;
    for j in 0..sections {
        let width = stick.area_top[j] / ((stick.perim_top[j] + stick.perim_top[j + 1]) / 2.0);
        let taper = (stick.chord[j] - stick.chord[j + 1]) / width;
        let tan_le = stick.sweep_le[j].to_radians().tan();

        let section_area = stick.chord[j] * width;
        sum25 += section_area * (tan_le + 0.25 * taper).atan();
        sum50 += section_area * (tan_le + 0.50 * taper).atan();
        total_area += section_area;
    }

    if total_area == 0.0 {
        return (0.0, 0.0);
    }
    (sum25 / total_area, sum50 / total_area)
}

pub fn calculate_form_factor(rows: &mut [Row], ctx: &PipelineContext) {
    let has_geometry = ctx.has_geometry();
    for i in 0..rows.len() {
        if !has_geometry {
            rows[i].ff_out = NO_GEOMETRY;
            continue;
        }
        if rows[i].is_sub_surface() {
            copy_from_previous(rows, i, |prev, row| row.ff_out = prev.ff_out);
            continue;
        }

        let stick = ctx.stick(&rows[i]);
        let row = &mut rows[i];
        match row.ff_equation {
            FormFactorEquation::Wing(equation) => {
                let (sweep25, sweep50) = average_sweep(&stick);
                let ff = wing_ff(
                    equation,
                    &WingFfInputs {
                        toc: row.fineness,
                        perc_lam: row.perc_lam,
                        sweep25,
                        sweep50,
                        mach: ctx.flow.mach,
                    },
                );
                row.ff_out = ff.value;
                if let Some(q) = ff.q_override {
                    row.q = q;
                }
            }
            FormFactorEquation::Body(equation) => {
                // Largest top-view section area, not the cross-section used for fineness
                let max_area = max_value(&stick.area_top);
                row.ff_out = body_ff(
                    equation,
                    &BodyFfInputs {
                        l_over_d: 1.0 / row.fineness,
                        fr: row.lref / max_area.sqrt(),
                        ref_length: row.lref,
                        max_area,
                        mach: ctx.flow.mach,
                    },
                );
            }
        }
    }
}

// ============================================================================
// Stages 8-9: Drag Area and Coefficient
// ============================================================================

pub fn calculate_f(rows: &mut [Row], ctx: &PipelineContext) {
    let has_geometry = ctx.has_geometry();
    for row in rows.iter_mut() {
        row.f = if !has_geometry {
            NO_GEOMETRY
        } else if is_not_zero_line_item(row) {
            row.swet * row.effective_q() * row.cf * row.effective_ff()
        } else {
            0.0
        };
    }
}

pub fn calculate_cd(rows: &mut [Row], ctx: &PipelineContext) {
    let has_geometry = ctx.has_geometry();
    for row in rows.iter_mut() {
        row.cd = if !has_geometry {
            NO_GEOMETRY
        } else if !is_not_zero_line_item(row) || row.f.is_nan() {
            0.0
        } else {
            row.f / ctx.sref
        };
    }
    debug!(rows = rows.len(), sref = ctx.sref, "drag coefficients computed");
}
