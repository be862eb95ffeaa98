//! # Geometry Inputs
//!
//! Read-only inputs produced by the geometry kernel:
//!
//! - [`Vehicle`]: the component tree with each component's drag inputs
//!   (laminar fraction, Q, roughness, form factor selectors, grouping).
//! - [`DegenGeometry`]: one snapshot of discretized surfaces ("sticks") and
//!   tagged wetted areas, borrowed for the length of one pipeline run.
//!
//! Both deserialize from JSON so a CLI run can read them from disk.

use serde::{Deserialize, Serialize};

use crate::equations::form_factor::{BodyFfEquation, WingFfEquation};

/// Component type as seen by the build-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Lifting surface; carries a total planform area usable as Sref
    Wing,
    /// Custom component made of mixed body and wing parts
    Custom,
    /// Joint/hinge placeholder, never part of the build-up
    Hinge,
    /// Empty placeholder, never part of the build-up
    Blank,
    /// Triangulated mesh, never part of the build-up
    Mesh,
    #[default]
    Other,
}

impl ComponentKind {
    /// Whether components of this kind can contribute rows
    pub fn is_buildable(&self) -> bool {
        !matches!(self, ComponentKind::Hinge | ComponentKind::Blank | ComponentKind::Mesh)
    }
}

/// Surface classification for form factor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceShape {
    /// Lifting surface (thickness/chord driven)
    Wing,
    /// Body of revolution (fineness driven)
    Body,
    /// Flat disk; never consumed by a row
    Disk,
}

/// Sub-surface (control surface, patch) attached to a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSurface {
    pub id: String,
    pub name: String,
    /// Whether the sub-surface wetted area is part of the build-up
    #[serde(default = "default_true")]
    pub include: bool,
}

fn default_true() -> bool {
    true
}

/// User drag inputs attached to a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragInputs {
    /// Percent of the reference length in laminar flow (0..100, -1 = unset)
    pub perc_lam: f64,
    /// Form factor override; `None` uses the computed value
    pub ff_user: Option<f64>,
    /// Interference factor (-1 = unset, treated as 1)
    pub q: f64,
    /// Roughness height in model length units
    pub roughness: f64,
    /// Edge-to-wall temperature ratio
    pub te_tw: f64,
    /// Adiabatic-wall-to-wall temperature ratio
    pub taw_tw: f64,
    pub ff_body_eqn: BodyFfEquation,
    pub ff_wing_eqn: WingFfEquation,
    /// 0 = independent, N > 0 = inherit from the N-th ancestor
    pub grouped_ancestor_gen: i32,
    /// Report every surface individually instead of folding them
    pub expanded_list: bool,
}

impl Default for DragInputs {
    fn default() -> Self {
        DragInputs {
            perc_lam: 0.0,
            ff_user: None,
            q: 1.0,
            roughness: 0.0,
            te_tw: 1.0,
            taw_tw: 1.0,
            ff_body_eqn: BodyFfEquation::HoernerStreambody,
            ff_wing_eqn: WingFfEquation::Hoerner,
            grouped_ancestor_gen: 0,
            expanded_list: false,
        }
    }
}

/// One vehicle component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: ComponentKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Shape of every surface including symmetry copies, in kernel order
    pub surfaces: Vec<SurfaceShape>,
    #[serde(default)]
    pub sub_surfaces: Vec<SubSurface>,
    #[serde(default)]
    pub drag: DragInputs,
    /// Total planform area (wings only)
    #[serde(default)]
    pub total_area: Option<f64>,
}

impl Component {
    pub fn sub_surface(&self, id: &str) -> Option<&SubSurface> {
        self.sub_surfaces.iter().find(|ss| ss.id == id)
    }

    /// Rows this component produces: one per non-disk surface plus one per
    /// (sub-surface × surface)
    pub fn row_count(&self) -> usize {
        let main = self.surfaces.iter().filter(|s| **s != SurfaceShape::Disk).count();
        main + self.sub_surfaces.len() * self.surfaces.len()
    }
}

/// Component tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default)]
    pub name: String,
    pub components: Vec<Component>,
}

impl Vehicle {
    pub fn find(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Id of the `generation`-th ancestor of `id`.
    ///
    /// Generation 0 (and the negative marker used by sub-surface rows) is
    /// the component itself. `None` when the parent chain ends early.
    pub fn ancestor_id(&self, id: &str, generation: i32) -> Option<String> {
        let mut current = self.find(id)?;
        for _ in 0..generation.max(0) {
            let parent = current.parent_id.as_deref()?;
            current = self.find(parent)?;
        }
        Some(current.id.clone())
    }

    /// All component ids in declaration order
    pub fn all_ids(&self) -> Vec<String> {
        self.components.iter().map(|c| c.id.clone()).collect()
    }
}

/// Discretized per-surface station data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegenStick {
    /// Leading-edge points per station
    pub xle: Vec<[f64; 3]>,
    pub chord: Vec<f64>,
    /// Thickness/chord per station
    pub toc: Vec<f64>,
    /// Cross-sectional area per station
    pub sect_area: Vec<f64>,
    /// Top perimeter per station
    pub perim_top: Vec<f64>,
    /// Leading-edge sweep per segment (degrees)
    pub sweep_le: Vec<f64>,
    /// Top area per segment (one fewer than stations)
    pub area_top: Vec<f64>,
}

/// One discretized surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegenSurface {
    pub component_id: String,
    pub surface_index: usize,
    pub shape: SurfaceShape,
    #[serde(default)]
    pub stick: Option<DegenStick>,
}

/// Wetted area keyed by the synthesized tag `"<name><surf>[,<subsurf>]"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedArea {
    pub tag: String,
    pub area: f64,
}

/// Snapshot of the geometry kernel output for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DegenGeometry {
    pub surfaces: Vec<DegenSurface>,
    pub wetted_areas: Vec<TaggedArea>,
}

impl DegenGeometry {
    pub fn surface(&self, component_id: &str, surface_index: usize) -> Option<&DegenSurface> {
        self.surfaces
            .iter()
            .find(|s| s.component_id == component_id && s.surface_index == surface_index)
    }

    pub fn stick(&self, component_id: &str, surface_index: usize) -> Option<&DegenStick> {
        self.surface(component_id, surface_index)?.stick.as_ref()
    }

    pub fn wetted_area(&self, tag: &str) -> Option<f64> {
        self.wetted_areas.iter().find(|t| t.tag == tag).map(|t| t.area)
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Synthesized wetted-area tag for a row
pub fn wetted_area_tag(component_name: &str, surface_num: usize, sub_surface_name: Option<&str>) -> String {
    match sub_surface_name {
        Some(ss) => format!("{}{},{}", component_name, surface_num, ss),
        None => format!("{}{}", component_name, surface_num),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(id: &str, parent: Option<&str>) -> Component {
        Component {
            id: id.to_string(),
            name: id.to_string(),
            kind: ComponentKind::Other,
            parent_id: parent.map(|p| p.to_string()),
            surfaces: vec![SurfaceShape::Body],
            sub_surfaces: vec![],
            drag: DragInputs::default(),
            total_area: None,
        }
    }

    #[test]
    fn test_ancestor_chain() {
        let vehicle = Vehicle {
            name: "test".to_string(),
            components: vec![
                component("FUSE", None),
                component("POD", Some("FUSE")),
                component("FAIRING", Some("POD")),
            ],
        };
        assert_eq!(vehicle.ancestor_id("FAIRING", 0).as_deref(), Some("FAIRING"));
        assert_eq!(vehicle.ancestor_id("FAIRING", 1).as_deref(), Some("POD"));
        assert_eq!(vehicle.ancestor_id("FAIRING", 2).as_deref(), Some("FUSE"));
        assert_eq!(vehicle.ancestor_id("FAIRING", 3), None);
        assert_eq!(vehicle.ancestor_id("POD", -1).as_deref(), Some("POD"));
        assert_eq!(vehicle.ancestor_id("MISSING", 0), None);
    }

    #[test]
    fn test_row_count_skips_disks() {
        let mut c = component("ROTOR", None);
        c.surfaces = vec![SurfaceShape::Body, SurfaceShape::Disk];
        c.sub_surfaces = vec![SubSurface {
            id: "SS1".to_string(),
            name: "patch".to_string(),
            include: true,
        }];
        assert_eq!(c.row_count(), 1 + 2);
    }

    #[test]
    fn test_wetted_area_tag() {
        assert_eq!(wetted_area_tag("Wing", 1, None), "Wing1");
        assert_eq!(wetted_area_tag("Wing", 0, Some("Flap")), "Wing0,Flap");
    }

    #[test]
    fn test_component_from_json_defaults() {
        let json = r#"{"id": "W1", "name": "Wing", "kind": "Wing", "surfaces": ["Wing", "Wing"]}"#;
        let c: Component = serde_json::from_str(json).unwrap();
        assert_eq!(c.drag.q, 1.0);
        assert_eq!(c.drag.grouped_ancestor_gen, 0);
        assert!(c.sub_surfaces.is_empty());
        assert!(c.parent_id.is_none());
    }
}
