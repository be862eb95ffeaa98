//! # Build-Up Report
//!
//! A [`DragReport`] is a flat snapshot of a finished build-up: unit labels,
//! the flow condition, one line per row, one line per excrescence and the
//! totals. It serializes to JSON and exports to CSV.
//!
//! ## CSV layout
//!
//! Every line is a name followed by one or more values, grouped in four
//! sections:
//!
//! ```text
//! Results_Name,Parasite_Drag
//! Alt_Label,Altitude (ft)
//! ...
//! FC_Mach,0.447
//! ...
//! Num_Comp,3
//! Comp_Label,Fuse,Wing,Wing_1
//! ...
//! Num_Excres,1
//! Excres_Label,Antenna
//! ...
//! Total_Cd_Total,0.0213
//! ```
//!
//! Component and excrescence fields run across the line, one value per row,
//! so records are of varying length.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calculations::{DragBuildUp, DragTotals, FormFactorEquation, Row};
use crate::errors::{DragError, DragResult};
use crate::file_io::save_text;
use crate::units::UnitLabels;

/// Results name written on the first CSV line
pub const RESULTS_NAME: &str = "Parasite_Drag";

/// One component line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub component_id: String,
    pub label: String,
    pub swet: f64,
    pub lref: f64,
    pub re: f64,
    pub perc_lam: f64,
    pub cf: f64,
    pub fineness: f64,
    pub ff_equation: i32,
    pub ff_equation_name: String,
    pub ff_in: f64,
    pub ff_out: f64,
    pub roughness: f64,
    pub te_tw: f64,
    pub taw_tw: f64,
    pub q: f64,
    pub f: f64,
    pub cd: f64,
    pub perc_total_cd: f64,
    pub surf_num: usize,
}

impl From<&Row> for ReportRow {
    fn from(row: &Row) -> Self {
        let ff_equation = match row.ff_equation {
            FormFactorEquation::Wing(eq) => eq.code(),
            FormFactorEquation::Body(eq) => eq.code(),
        };
        ReportRow {
            component_id: row.component_id.clone(),
            label: row.label.clone(),
            swet: row.swet,
            lref: row.lref,
            re: row.re,
            perc_lam: row.perc_lam,
            cf: row.cf,
            fineness: row.fineness,
            ff_equation,
            ff_equation_name: row.ff_equation.name().to_string(),
            ff_in: row.ff_user.unwrap_or(-1.0),
            ff_out: row.reported_ff(),
            roughness: row.roughness,
            te_tw: row.te_tw,
            taw_tw: row.taw_tw,
            q: row.effective_q(),
            f: row.f,
            cd: row.cd,
            perc_total_cd: row.perc_total_cd,
            surf_num: row.surf_num,
        }
    }
}

/// One excrescence line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportExcrescence {
    pub label: String,
    pub kind: String,
    pub input: f64,
    pub amount: f64,
    pub f: f64,
    pub perc_total_cd: f64,
}

/// Freestream values as reported, in the units named by the labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportFlow {
    pub mach: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub sref: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragReport {
    pub labels: UnitLabels,
    pub lam_cf_name: String,
    pub turb_cf_name: String,
    pub flow: ReportFlow,
    pub rows: Vec<ReportRow>,
    pub excrescences: Vec<ReportExcrescence>,
    pub totals: DragTotals,
    /// Power of ten Re is displayed in
    pub re_power_divisor: i32,
    /// Decimal places for Lref display
    pub lref_sig_figs: usize,
}

impl DragReport {
    /// Snapshot the last run of `build_up`
    pub fn from_build_up(build_up: &DragBuildUp) -> Self {
        let settings = &build_up.settings;
        let flow = &build_up.flow;

        DragReport {
            labels: UnitLabels::new(
                flow.unit_system,
                settings.length_unit,
                flow.velocity_unit,
                flow.temperature_unit,
                flow.pressure_unit,
            ),
            lam_cf_name: settings.lam_cf.name().to_string(),
            turb_cf_name: settings.turb_cf.name().to_string(),
            flow: ReportFlow {
                mach: flow.mach,
                altitude: flow.altitude,
                velocity: flow.velocity,
                sref: settings.sref,
                temperature: flow.temperature,
                pressure: flow.pressure,
                density: flow.density,
            },
            rows: build_up.rows().iter().map(ReportRow::from).collect(),
            excrescences: build_up
                .excrescences
                .items()
                .iter()
                .map(|e| ReportExcrescence {
                    label: e.label.clone(),
                    kind: e.kind.type_string().to_string(),
                    input: e.input,
                    amount: e.amount,
                    f: e.f,
                    perc_total_cd: e.perc_total_cd,
                })
                .collect(),
            totals: *build_up.totals(),
            re_power_divisor: build_up.reynolds_power_divisor(),
            lref_sig_figs: build_up.lref_sig_figs(),
        }
    }

    /// Write the report as name/value CSV lines
    pub fn write_csv<W: Write>(&self, writer: W) -> DragResult<()> {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

        let mut emit = |name: &str, values: Vec<String>| -> DragResult<()> {
            let mut record = Vec::with_capacity(values.len() + 1);
            record.push(name.to_string());
            record.extend(values);
            wtr.write_record(&record).map_err(csv_error)
        };
        let one = |v: f64| vec![v.to_string()];
        let text = |s: &str| vec![s.to_string()];
        let rows = |f: fn(&ReportRow) -> String| self.rows.iter().map(f).collect::<Vec<_>>();
        let excres = |f: fn(&ReportExcrescence) -> String| self.excrescences.iter().map(f).collect::<Vec<_>>();

        emit("Results_Name", text(RESULTS_NAME))?;

        let l = &self.labels;
        emit("Alt_Label", text(&l.altitude))?;
        emit("Vinf_Label", text(&l.velocity))?;
        emit("Sref_Label", text(&l.sref))?;
        emit("Temp_Label", text(&l.temperature))?;
        emit("Pres_Label", text(&l.pressure))?;
        emit("Rho_Label", text(&l.density))?;
        emit("LamCfEqnName", text(&self.lam_cf_name))?;
        emit("TurbCfEqnName", text(&self.turb_cf_name))?;
        emit("Swet_Label", text(&l.swet))?;
        emit("Lref_Label", text(&l.lref))?;
        emit("f_Label", text(&l.f))?;

        let fc = &self.flow;
        emit("FC_Mach", one(fc.mach))?;
        emit("FC_Alt", one(fc.altitude))?;
        emit("FC_Vinf", one(fc.velocity))?;
        emit("FC_Sref", one(fc.sref))?;
        emit("FC_Temp", one(fc.temperature))?;
        emit("FC_Pres", one(fc.pressure))?;
        emit("FC_Rho", one(fc.density))?;

        emit("Num_Comp", vec![self.rows.len().to_string()])?;
        emit("Comp_ID", rows(|r| r.component_id.clone()))?;
        emit("Comp_Label", rows(|r| r.label.clone()))?;
        emit("Comp_Swet", rows(|r| r.swet.to_string()))?;
        emit("Comp_Lref", rows(|r| r.lref.to_string()))?;
        emit("Comp_Re", rows(|r| r.re.to_string()))?;
        emit("Comp_PercLam", rows(|r| r.perc_lam.to_string()))?;
        emit("Comp_Cf", rows(|r| r.cf.to_string()))?;
        emit("Comp_FineRat", rows(|r| r.fineness.to_string()))?;
        emit("Comp_FFEqn", rows(|r| r.ff_equation.to_string()))?;
        emit("Comp_FFEqnName", rows(|r| r.ff_equation_name.clone()))?;
        emit("Comp_FFIn", rows(|r| r.ff_in.to_string()))?;
        emit("Comp_FFOut", rows(|r| r.ff_out.to_string()))?;
        emit("Comp_Roughness", rows(|r| r.roughness.to_string()))?;
        emit("Comp_TeTwRatio", rows(|r| r.te_tw.to_string()))?;
        emit("Comp_TawTwRatio", rows(|r| r.taw_tw.to_string()))?;
        emit("Comp_Q", rows(|r| r.q.to_string()))?;
        emit("Comp_f", rows(|r| r.f.to_string()))?;
        emit("Comp_Cd", rows(|r| r.cd.to_string()))?;
        emit("Comp_PercTotalCd", rows(|r| r.perc_total_cd.to_string()))?;
        emit("Comp_SurfNum", rows(|r| r.surf_num.to_string()))?;

        emit("Num_Excres", vec![self.excrescences.len().to_string()])?;
        emit("Excres_Label", excres(|e| e.label.clone()))?;
        emit("Excres_Type", excres(|e| e.kind.clone()))?;
        emit("Excres_Input", excres(|e| e.input.to_string()))?;
        emit("Excres_Amount", excres(|e| e.amount.to_string()))?;
        emit("Excres_PercTotalCd", excres(|e| e.perc_total_cd.to_string()))?;

        let t = &self.totals;
        emit("Geom_f_Total", one(t.geometry_f))?;
        emit("Geom_Cd_Total", one(t.geometry_cd))?;
        emit("Geom_Perc_Total", one(t.geometry_percent))?;
        emit("Excres_f_Total", one(t.excrescence_f))?;
        emit("Excres_Cd_Total", one(t.excrescence_cd))?;
        emit("Excres_Perc_Total", one(t.excrescence_percent))?;
        emit("Total_f_Total", one(t.total_f))?;
        emit("Total_Cd_Total", one(t.total_cd))?;
        emit("Total_Perc_Total", one(t.total_percent))?;

        wtr.flush()
            .map_err(|e| DragError::file_error("flush csv", "<writer>", e.to_string()))
    }

    pub fn to_csv_string(&self) -> DragResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| DragError::serialization(e.to_string()))
    }

    /// Write the CSV export atomically
    pub fn save_csv(&self, path: &Path) -> DragResult<()> {
        save_text(&self.to_csv_string()?, path)
    }

    pub fn to_json(&self) -> DragResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DragError::serialization(e.to_string()))
    }

    /// Fixed-width table of rows and totals for terminal output.
    ///
    /// Re is shown divided by `10^re_power_divisor`.
    pub fn summary(&self) -> String {
        let scale = 10f64.powi(self.re_power_divisor);
        let lref_places = self.lref_sig_figs;
        let mut out = String::new();

        out.push_str(&format!(
            "{:<24} {:>10} {:>10} {:>10} {:>9} {:>7} {:>7} {:>10} {:>9} {:>7}\n",
            "Component",
            "S_wet",
            "L_ref",
            format!("Re (1e{})", self.re_power_divisor),
            "Cf",
            "FF",
            "Q",
            "f",
            "CD",
            "% CD"
        ));
        for r in &self.rows {
            out.push_str(&format!(
                "{:<24} {:>10.2} {:>10.lp$} {:>10.3} {:>9.5} {:>7.3} {:>7.2} {:>10.4} {:>9.5} {:>6.1}%\n",
                r.label,
                r.swet,
                r.lref,
                r.re / scale,
                r.cf,
                r.ff_out,
                r.q,
                r.f,
                r.cd,
                r.perc_total_cd * 100.0,
                lp = lref_places
            ));
        }
        for e in &self.excrescences {
            out.push_str(&format!(
                "{:<24} {:>10} {:>10} {:>10} {:>9} {:>7} {:>7} {:>10.4} {:>9.5} {:>6.1}%\n",
                e.label,
                "",
                "",
                "",
                "",
                "",
                "",
                e.f,
                e.amount,
                e.perc_total_cd * 100.0
            ));
        }

        let t = &self.totals;
        out.push_str(&format!(
            "\nGeometry      f = {:.4}  CD = {:.5}  ({:.1}%)\n",
            t.geometry_f,
            t.geometry_cd,
            t.geometry_percent * 100.0
        ));
        out.push_str(&format!(
            "Excrescence   f = {:.4}  CD = {:.5}  ({:.1}%)\n",
            t.excrescence_f,
            t.excrescence_cd,
            t.excrescence_percent * 100.0
        ));
        out.push_str(&format!(
            "Total         f = {:.4}  CD = {:.5}  ({:.1}%)\n",
            t.total_f,
            t.total_cd,
            t.total_percent * 100.0
        ));
        out
    }
}

fn csv_error(e: csv::Error) -> DragError {
    DragError::serialization(format!("CSV export failed: {}", e))
}
