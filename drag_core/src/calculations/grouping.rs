//! # Ancestor and Grouping Resolver
//!
//! Rows that are folded into another row (symmetric copies, sub-surfaces,
//! components grouped under an ancestor) hand their wetted area to that
//! row and then report zero drag themselves, so every area is counted
//! exactly once.
//!
//! All passes are all-pairs scans over the row list, updating in place in
//! row order. Row counts are in the low hundreds.

use tracing::debug;

use super::rows::Row;

/// Fold wetted areas into the rows that report them.
///
/// Pass (a) adds included sub-surface areas to surface zero of a
/// non-expanded component. Pass (b) then adds same-shape main surfaces to
/// surface zero of their own component, to surface zero of the ancestor
/// they are grouped under, or to a custom part.
pub fn update_wetted_area_totals(rows: &mut [Row]) {
    let n = rows.len();

    for i in 0..n {
        for j in 0..n {
            if i == j || rows[i].is_sub_surface() || !rows[j].is_sub_surface() {
                continue;
            }
            let main = &rows[i];
            let sub = &rows[j];
            if !main.component_expanded
                && main.component_id == sub.component_id
                && sub.sub_surface_include
                && main.surf_num == 0
            {
                let folded = rows[j].swet;
                rows[i].swet += folded;
            }
        }
    }

    for i in 0..n {
        for j in 0..n {
            if i == j || rows[i].is_sub_surface() || rows[j].is_sub_surface() {
                continue;
            }
            let target = &rows[i];
            let other = &rows[j];

            let same_component = target.component_id == other.component_id;
            let own_surface_zero = same_component && target.surf_num == 0;
            let grouped_under_target = !same_component
                && other.ancestor_id.as_deref() == Some(target.component_id.as_str())
                && target.surf_num == 0
                && !other.component_expanded;

            if (own_surface_zero || grouped_under_target || target.custom_part)
                && target.shape == other.shape
                && !target.expanded_list
            {
                let folded = rows[j].swet;
                rows[i].swet += folded;
            }
        }
    }

    debug!(rows = n, "wetted area totals folded");
}

/// Copy derived properties from the ancestor's surface zero row onto every
/// row grouped under it.
pub fn overwrite_from_ancestors(rows: &mut [Row]) {
    for i in 0..rows.len() {
        if rows[i].grouped_ancestor_gen <= 0 {
            continue;
        }
        let Some(ancestor) = rows[i].ancestor_id.clone() else {
            continue;
        };
        let source = rows
            .iter()
            .position(|r| !r.is_sub_surface() && r.component_id == ancestor && r.surf_num == 0);

        if let Some(j) = source {
            let from = rows[j].clone();
            let row = &mut rows[i];
            row.lref = from.lref;
            row.re = from.re;
            row.fineness = from.fineness;
            row.ff_out = from.ff_out;
            row.ff_equation = from.ff_equation;
            row.perc_lam = from.perc_lam;
            row.q = from.q;
            row.cf = from.cf;
        }
    }
}

/// Whether a row reports its own drag.
///
/// A main row counts when it is surface zero, part of an expanded list or
/// a custom part, and it is either ungrouped or its own or its ancestor's
/// list is expanded. A sub-surface row counts only when included and its
/// component's list is expanded.
pub fn is_not_zero_line_item(row: &Row) -> bool {
    if row.is_sub_surface() {
        return row.sub_surface_include && row.component_expanded;
    }
    (row.surf_num == 0 || row.component_expanded || row.custom_part)
        && (row.grouped_ancestor_gen == 0 || row.ancestor_expanded || row.component_expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::rows::build_rows;
    use crate::geometry::{Component, ComponentKind, DragInputs, SubSurface, SurfaceShape, Vehicle};

    fn component(id: &str, parent: Option<&str>, surfaces: Vec<SurfaceShape>) -> Component {
        Component {
            id: id.to_string(),
            name: id.to_string(),
            kind: ComponentKind::Other,
            parent_id: parent.map(|p| p.to_string()),
            surfaces,
            sub_surfaces: vec![],
            drag: DragInputs::default(),
            total_area: None,
        }
    }

    fn rows_for(vehicle: &Vehicle) -> Vec<Row> {
        build_rows(vehicle, &vehicle.all_ids()).unwrap()
    }

    #[test]
    fn test_symmetric_copy_folds_into_surface_zero() {
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![component("Wing", None, vec![SurfaceShape::Wing, SurfaceShape::Wing])],
        };
        let mut rows = rows_for(&vehicle);
        rows[0].swet = 100.0;
        rows[1].swet = 100.0;

        update_wetted_area_totals(&mut rows);
        assert!((rows[0].swet - 200.0).abs() < 1e-12);
        assert!((rows[1].swet - 100.0).abs() < 1e-12);
        assert!(is_not_zero_line_item(&rows[0]));
        assert!(!is_not_zero_line_item(&rows[1]));
    }

    #[test]
    fn test_expanded_list_keeps_areas_separate() {
        let mut wing = component("Wing", None, vec![SurfaceShape::Wing, SurfaceShape::Wing]);
        wing.drag.expanded_list = true;
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![wing],
        };
        let mut rows = rows_for(&vehicle);
        rows[0].swet = 100.0;
        rows[1].swet = 100.0;

        update_wetted_area_totals(&mut rows);
        assert!((rows[0].swet - 100.0).abs() < 1e-12);
        assert!(is_not_zero_line_item(&rows[1]));
    }

    #[test]
    fn test_included_sub_surface_folds_first() {
        let mut wing = component("Wing", None, vec![SurfaceShape::Wing]);
        wing.sub_surfaces = vec![
            SubSurface {
                id: "S1".to_string(),
                name: "Flap".to_string(),
                include: true,
            },
            SubSurface {
                id: "S2".to_string(),
                name: "Tab".to_string(),
                include: false,
            },
        ];
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![wing],
        };
        let mut rows = rows_for(&vehicle);
        rows[0].swet = 50.0;
        rows[1].swet = 5.0;
        rows[2].swet = 3.0;

        update_wetted_area_totals(&mut rows);
        assert!((rows[0].swet - 55.0).abs() < 1e-12);
        assert!(!is_not_zero_line_item(&rows[1]));
        assert!(!is_not_zero_line_item(&rows[2]));
    }

    #[test]
    fn test_grouped_child_folds_into_ancestor() {
        let fuse = component("Fuse", None, vec![SurfaceShape::Body]);
        let mut fairing = component("Fairing", Some("Fuse"), vec![SurfaceShape::Body]);
        fairing.drag.grouped_ancestor_gen = 1;
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![fuse, fairing],
        };
        let mut rows = rows_for(&vehicle);
        rows[0].swet = 400.0;
        rows[1].swet = 20.0;

        update_wetted_area_totals(&mut rows);
        assert!((rows[0].swet - 420.0).abs() < 1e-12);
        assert!(!is_not_zero_line_item(&rows[1]));
    }

    #[test]
    fn test_different_shape_is_not_folded() {
        let fuse = component("Fuse", None, vec![SurfaceShape::Body]);
        let mut fin = component("Fin", Some("Fuse"), vec![SurfaceShape::Wing]);
        fin.drag.grouped_ancestor_gen = 1;
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![fuse, fin],
        };
        let mut rows = rows_for(&vehicle);
        rows[0].swet = 400.0;
        rows[1].swet = 20.0;

        update_wetted_area_totals(&mut rows);
        assert!((rows[0].swet - 400.0).abs() < 1e-12);
    }

    #[test]
    fn test_overwrite_copies_ancestor_surface_zero() {
        let fuse = component("Fuse", None, vec![SurfaceShape::Body]);
        let mut fairing = component("Fairing", Some("Fuse"), vec![SurfaceShape::Body]);
        fairing.drag.grouped_ancestor_gen = 1;
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![fuse, fairing],
        };
        let mut rows = rows_for(&vehicle);
        rows[0].lref = 40.0;
        rows[0].re = 8.0e7;
        rows[0].cf = 0.0021;
        rows[0].fineness = 0.12;
        rows[0].ff_out = 1.08;
        rows[0].q = 1.05;
        rows[0].perc_lam = 10.0;
        rows[1].lref = 3.0;

        overwrite_from_ancestors(&mut rows);
        assert_eq!(rows[1].lref, 40.0);
        assert_eq!(rows[1].re, 8.0e7);
        assert_eq!(rows[1].cf, 0.0021);
        assert_eq!(rows[1].fineness, 0.12);
        assert_eq!(rows[1].ff_out, 1.08);
        assert_eq!(rows[1].q, 1.05);
        assert_eq!(rows[1].perc_lam, 10.0);
    }

    #[test]
    fn test_expanded_ancestor_keeps_child_line() {
        let mut fuse = component("Fuse", None, vec![SurfaceShape::Body]);
        fuse.drag.expanded_list = true;
        let mut fairing = component("Fairing", Some("Fuse"), vec![SurfaceShape::Body]);
        fairing.drag.grouped_ancestor_gen = 1;
        let vehicle = Vehicle {
            name: "v".to_string(),
            components: vec![fuse, fairing],
        };
        let rows = rows_for(&vehicle);
        assert!(rows[1].ancestor_expanded);
        assert!(is_not_zero_line_item(&rows[1]));
    }
}
