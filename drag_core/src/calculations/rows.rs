//! # Row Model Builder
//!
//! Expands each selected component into ordered build-up rows: one per
//! non-disk surface, then one per (sub-surface × surface). Every row
//! carries a copy of the user drag inputs it was built from and the
//! grouping facts the later passes need, so nothing downstream has to
//! walk the component tree again.
//!
//! ## Symmetric copies
//!
//! A surface with the same shape as the surface before it is a symmetric
//! copy. It copies the previous row's inputs instead of the component's,
//! is labelled `"<name>_<j>"` and is never an expanded-list row.
//!
//! ## Sub-surfaces
//!
//! Sub-surface rows inherit the previous row's laminar fraction, Q,
//! roughness and temperature ratios. They cannot carry their own.

use serde::{Deserialize, Serialize};

use crate::equations::form_factor::{BodyFfEquation, WingFfEquation};
use crate::errors::{DragError, DragResult};
use crate::geometry::{wetted_area_tag, Component, ComponentKind, DragInputs, SurfaceShape, Vehicle};

/// Grouping generation stamped on sub-surface rows
pub const SUB_SURFACE_GENERATION: i32 = -1;

/// Form factor law selected for a row, by shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormFactorEquation {
    Wing(WingFfEquation),
    Body(BodyFfEquation),
}

impl FormFactorEquation {
    fn for_shape(shape: SurfaceShape, inputs: &DragInputs) -> Self {
        match shape {
            SurfaceShape::Wing => FormFactorEquation::Wing(inputs.ff_wing_eqn),
            SurfaceShape::Body | SurfaceShape::Disk => FormFactorEquation::Body(inputs.ff_body_eqn),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormFactorEquation::Wing(e) => e.name(),
            FormFactorEquation::Body(e) => e.name(),
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(
            self,
            FormFactorEquation::Wing(WingFfEquation::Manual) | FormFactorEquation::Body(BodyFfEquation::Manual)
        )
    }
}

/// One line of the build-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    // Identity
    pub component_id: String,
    pub component_name: String,
    pub sub_surface_id: Option<String>,
    pub sub_surface_name: Option<String>,
    pub label: String,
    /// Surface number used in the wetted-area tag
    pub surf_num: usize,
    /// Index of the kernel surface this row reads
    pub surface_index: usize,
    pub shape: SurfaceShape,
    /// `[B]`/`[W]` part of a custom component
    pub custom_part: bool,

    // User inputs
    pub perc_lam: f64,
    pub ff_user: Option<f64>,
    pub q: f64,
    pub roughness: f64,
    pub te_tw: f64,
    pub taw_tw: f64,
    pub ff_equation: FormFactorEquation,

    // Grouping
    pub grouped_ancestor_gen: i32,
    pub ancestor_id: Option<String>,
    pub ancestor_expanded: bool,
    pub component_expanded: bool,
    pub expanded_list: bool,
    pub sub_surface_include: bool,

    // Derived
    pub swet: f64,
    pub lref: f64,
    pub re: f64,
    pub cf: f64,
    pub fineness: f64,
    pub ff_out: f64,
    pub f: f64,
    pub cd: f64,
    pub perc_total_cd: f64,
}

impl Row {
    pub fn is_sub_surface(&self) -> bool {
        self.sub_surface_id.is_some()
    }

    /// Tag used to look up this row's wetted area
    pub fn wetted_area_tag(&self) -> String {
        wetted_area_tag(&self.component_name, self.surf_num, self.sub_surface_name.as_deref())
    }

    /// Form factor used in the drag area: the override when present
    pub fn effective_ff(&self) -> f64 {
        self.ff_user.unwrap_or(self.ff_out)
    }

    /// Interference factor with the unset marker resolved
    pub fn effective_q(&self) -> f64 {
        if self.q == -1.0 {
            1.0
        } else {
            self.q
        }
    }

    /// Form factor shown in reports
    pub fn reported_ff(&self) -> f64 {
        if self.ff_equation.is_manual() {
            self.ff_user.unwrap_or(-1.0)
        } else {
            self.ff_out
        }
    }

    fn blank(component: &Component, shape: SurfaceShape, surface_index: usize, inputs: &DragInputs) -> Self {
        Row {
            component_id: component.id.clone(),
            component_name: component.name.clone(),
            sub_surface_id: None,
            sub_surface_name: None,
            label: component.name.clone(),
            surf_num: 0,
            surface_index,
            shape,
            custom_part: false,
            perc_lam: inputs.perc_lam,
            ff_user: inputs.ff_user,
            q: inputs.q,
            roughness: inputs.roughness,
            te_tw: inputs.te_tw,
            taw_tw: inputs.taw_tw,
            ff_equation: FormFactorEquation::for_shape(shape, &component.drag),
            grouped_ancestor_gen: component.drag.grouped_ancestor_gen,
            ancestor_id: None,
            ancestor_expanded: false,
            component_expanded: component.drag.expanded_list,
            expanded_list: component.drag.expanded_list,
            sub_surface_include: true,
            swet: 0.0,
            lref: 0.0,
            re: 0.0,
            cf: 0.0,
            fineness: 0.0,
            ff_out: 0.0,
            f: 0.0,
            cd: 0.0,
            perc_total_cd: 0.0,
        }
    }

    fn copy_inputs_from(&mut self, previous: &Row) {
        self.perc_lam = previous.perc_lam;
        self.ff_user = previous.ff_user;
        self.q = previous.q;
        self.roughness = previous.roughness;
        self.te_tw = previous.te_tw;
        self.taw_tw = previous.taw_tw;
    }
}

fn resolve_ancestor(vehicle: &Vehicle, row: &mut Row) {
    row.ancestor_id = vehicle.ancestor_id(&row.component_id, row.grouped_ancestor_gen);
    row.ancestor_expanded = row
        .ancestor_id
        .as_deref()
        .and_then(|id| vehicle.find(id))
        .map_or(false, |c| c.drag.expanded_list);
}

/// Build rows for one component, appending to `rows`
fn push_component_rows(vehicle: &Vehicle, component: &Component, rows: &mut Vec<Row>) {
    let custom = component.kind == ComponentKind::Custom;

    for (j, &shape) in component.surfaces.iter().enumerate() {
        if shape == SurfaceShape::Disk {
            continue;
        }

        let symmetric = j > 0 && component.surfaces[j - 1] == shape;
        let mut row = Row::blank(component, shape, j, &component.drag);

        if symmetric {
            if let Some(previous) = rows.last() {
                row.copy_inputs_from(previous);
            }
            row.surf_num = j;
            row.expanded_list = false;
            row.label = format!("{}_{}", component.name, j);
        } else if custom {
            row.surf_num = j;
            row.custom_part = true;
            row.label = match shape {
                SurfaceShape::Body => format!("[B] {}", component.name),
                _ => format!("[W] {}", component.name),
            };
        }

        resolve_ancestor(vehicle, &mut row);
        rows.push(row);
    }

    for sub in &component.sub_surfaces {
        for (k, &shape) in component.surfaces.iter().enumerate() {
            let mut row = Row::blank(component, shape, k, &component.drag);
            if let Some(previous) = rows.last() {
                row.copy_inputs_from(previous);
            }
            row.sub_surface_id = Some(sub.id.clone());
            row.sub_surface_name = Some(sub.name.clone());
            row.sub_surface_include = sub.include;
            row.surf_num = k;
            row.grouped_ancestor_gen = SUB_SURFACE_GENERATION;
            row.expanded_list = false;
            row.label = format!("[ss] {}_{}", sub.name, k);

            resolve_ancestor(vehicle, &mut row);
            rows.push(row);
        }
    }
}

/// Build the ordered row list for the given component ids.
///
/// Returns `ComponentNotFound` for an id the vehicle does not contain.
pub fn build_rows(vehicle: &Vehicle, component_ids: &[String]) -> DragResult<Vec<Row>> {
    let mut rows = Vec::new();
    for id in component_ids {
        let component = vehicle.find(id).ok_or_else(|| DragError::component_not_found(id.as_str()))?;
        push_component_rows(vehicle, component, &mut rows);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SubSurface;

    fn component(id: &str, kind: ComponentKind, surfaces: Vec<SurfaceShape>) -> Component {
        Component {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            parent_id: None,
            surfaces,
            sub_surfaces: vec![],
            drag: DragInputs::default(),
            total_area: None,
        }
    }

    #[test]
    fn test_symmetric_copy_inherits_previous_row() {
        let mut wing = component("Wing", ComponentKind::Wing, vec![SurfaceShape::Wing, SurfaceShape::Wing]);
        wing.drag.perc_lam = 30.0;
        wing.drag.expanded_list = true;
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![wing],
        };

        let rows = build_rows(&vehicle, &vehicle.all_ids()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Wing");
        assert_eq!(rows[0].surf_num, 0);
        assert!(rows[0].expanded_list);
        assert_eq!(rows[1].label, "Wing_1");
        assert_eq!(rows[1].surf_num, 1);
        assert!(!rows[1].expanded_list);
        assert!(rows[1].component_expanded);
        assert_eq!(rows[1].perc_lam, 30.0);
    }

    #[test]
    fn test_custom_parts_are_prefixed() {
        let pod = component(
            "Pod",
            ComponentKind::Custom,
            vec![SurfaceShape::Body, SurfaceShape::Wing, SurfaceShape::Wing],
        );
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![pod],
        };

        let rows = build_rows(&vehicle, &vehicle.all_ids()).unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["[B] Pod", "[W] Pod", "Pod_2"]);
        assert_eq!(rows[1].surf_num, 1);
        assert!(rows[0].custom_part && rows[1].custom_part && !rows[2].custom_part);
    }

    #[test]
    fn test_plain_component_with_mixed_shapes_uses_surface_zero() {
        let c = component("Nacelle", ComponentKind::Other, vec![SurfaceShape::Body, SurfaceShape::Wing]);
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![c],
        };
        let rows = build_rows(&vehicle, &vehicle.all_ids()).unwrap();
        assert_eq!(rows[1].label, "Nacelle");
        assert_eq!(rows[1].surf_num, 0);
        assert_eq!(rows[1].surface_index, 1);
    }

    #[test]
    fn test_sub_surface_rows_follow_main_surfaces() {
        let mut wing = component("Wing", ComponentKind::Wing, vec![SurfaceShape::Wing, SurfaceShape::Wing]);
        wing.sub_surfaces = vec![SubSurface {
            id: "SS1".to_string(),
            name: "Flap".to_string(),
            include: false,
        }];
        wing.drag.q = 1.1;
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![wing],
        };

        let rows = build_rows(&vehicle, &vehicle.all_ids()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].label, "[ss] Flap_0");
        assert_eq!(rows[3].label, "[ss] Flap_1");
        assert_eq!(rows[3].grouped_ancestor_gen, SUB_SURFACE_GENERATION);
        assert_eq!(rows[3].ancestor_id.as_deref(), Some("Wing"));
        assert!(!rows[3].sub_surface_include);
        assert_eq!(rows[3].q, 1.1);
        assert_eq!(rows[3].wetted_area_tag(), "Wing1,Flap");
    }

    #[test]
    fn test_disk_surfaces_produce_no_row() {
        let rotor = component("Rotor", ComponentKind::Other, vec![SurfaceShape::Body, SurfaceShape::Disk]);
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![rotor],
        };
        let rows = build_rows(&vehicle, &vehicle.all_ids()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_unknown_component_is_an_error() {
        let vehicle = Vehicle::default();
        let err = build_rows(&vehicle, &["GHOST".to_string()]).unwrap_err();
        assert_eq!(err.error_code(), "COMPONENT_NOT_FOUND");
    }

    #[test]
    fn test_reported_ff_follows_selector() {
        let mut body = component("Fuse", ComponentKind::Other, vec![SurfaceShape::Body]);
        body.drag.ff_body_eqn = BodyFfEquation::Manual;
        body.drag.ff_user = Some(1.3);
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![body],
        };
        let mut rows = build_rows(&vehicle, &vehicle.all_ids()).unwrap();
        rows[0].ff_out = 1.1;
        assert_eq!(rows[0].reported_ff(), 1.3);
        assert_eq!(rows[0].effective_ff(), 1.3);
    }
}
