//! # Row Sorting
//!
//! Orders rows for display while keeping every group contiguous: a row is
//! always followed by the other rows of its component and then by rows
//! grouped under it, whatever the sort key says about them.

use serde::{Deserialize, Serialize};

use super::rows::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Build order, grouped
    #[default]
    None,
    /// Descending wetted area
    WettedArea,
    /// Descending percent of total Cd
    PercentCd,
}

impl SortOrder {
    pub fn display_name(&self) -> &'static str {
        match self {
            SortOrder::None => "None",
            SortOrder::WettedArea => "Wetted Area",
            SortOrder::PercentCd => "% Total CD",
        }
    }
}

/// Mark and push every unsorted row belonging to `lead`'s group
fn push_group(rows: &[Row], lead: usize, sorted: &mut [bool], order: &mut Vec<usize>) {
    let lead_id = rows[lead].component_id.as_str();

    for j in 0..rows.len() {
        if j != lead && !sorted[j] && rows[j].component_id == lead_id {
            sorted[j] = true;
            order.push(j);
        }
    }
    for j in 0..rows.len() {
        if j != lead && !sorted[j] && rows[j].ancestor_id.as_deref() == Some(lead_id) {
            sorted[j] = true;
            order.push(j);
        }
    }
}

fn reorder(rows: Vec<Row>, order: &[usize]) -> Vec<Row> {
    let mut slots: Vec<Option<Row>> = rows.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

/// Group rows by component and ancestor, keeping build order otherwise
pub fn group_by_ancestor(rows: Vec<Row>) -> Vec<Row> {
    let n = rows.len();
    let mut sorted = vec![false; n];
    let mut order = Vec::with_capacity(n);

    for i in 0..n {
        if sorted[i] {
            continue;
        }
        sorted[i] = true;
        order.push(i);
        push_group(&rows, i, &mut sorted, &mut order);
    }
    reorder(rows, &order)
}

/// Repeatedly pick the largest unsorted key and pull its group in behind it.
///
/// The scan start cycles through the rows; ties keep the earlier start.
fn sort_descending_by(rows: Vec<Row>, key: impl Fn(&Row) -> f64) -> Vec<Row> {
    let n = rows.len();
    let mut sorted = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut i = 0;

    while order.len() < n {
        if !sorted[i] {
            let mut max = i;
            for j in 0..n {
                if !sorted[j] && key(&rows[j]) > key(&rows[max]) {
                    max = j;
                }
            }
            sorted[max] = true;
            order.push(max);
            push_group(&rows, max, &mut sorted, &mut order);
        }
        i = if i + 1 == n { 0 } else { i + 1 };
    }
    reorder(rows, &order)
}

/// Apply the grouping pre-pass, then the selected order
pub fn sort_rows(rows: Vec<Row>, order: SortOrder) -> Vec<Row> {
    let grouped = group_by_ancestor(rows);
    match order {
        SortOrder::None => grouped,
        SortOrder::WettedArea => sort_descending_by(grouped, |r| r.swet),
        SortOrder::PercentCd => sort_descending_by(grouped, |r| r.perc_total_cd),
    }
}
