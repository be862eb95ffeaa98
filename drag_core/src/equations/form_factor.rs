//! # Form Factor Correlations
//!
//! Multiplicative corrections to flat-plate friction drag for thickness
//! (lifting surfaces) and slenderness (bodies).
//!
//! ## Notation
//!
//! - `t/c` = maximum thickness to chord ratio
//! - `Λ25`, `Λ50` = area-weighted quarter and half chord sweep (radians)
//! - `l/d` = body length over nominal diameter
//! - `FR` = body length over √(max cross-section area)
//! - `M` = Mach number
//!
//! ## References
//!
//! - Hoerner, Fluid-Dynamic Drag
//! - Torenbeek, Synthesis of Subsonic Airplane Design
//! - Jenkinson, Simpkin & Rhodes, Civil Jet Aircraft Design
//! - USAF DATCOM, Section 4.1.5.1
//! - Schemensky, Development of an Empirically Based Computer Program to
//!   Predict the Aerodynamic Characteristics of Aircraft

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Interference factor forced by the Jenkinson tail correlation
pub const JENKINSON_TAIL_Q: f64 = 1.2;

// =============================================================================
// WING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WingFfEquation {
    Manual,
    EdetConventional,
    EdetAdvanced,
    #[default]
    Hoerner,
    Covert,
    Shevell,
    Kroo,
    Torenbeek,
    Datcom,
    Schemensky6Series,
    Schemensky4Series,
    JenkinsonWing,
    JenkinsonTail,
}

impl WingFfEquation {
    pub const ALL: [WingFfEquation; 13] = [
        WingFfEquation::Manual,
        WingFfEquation::EdetConventional,
        WingFfEquation::EdetAdvanced,
        WingFfEquation::Hoerner,
        WingFfEquation::Covert,
        WingFfEquation::Shevell,
        WingFfEquation::Kroo,
        WingFfEquation::Torenbeek,
        WingFfEquation::Datcom,
        WingFfEquation::Schemensky6Series,
        WingFfEquation::Schemensky4Series,
        WingFfEquation::JenkinsonWing,
        WingFfEquation::JenkinsonTail,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WingFfEquation::Manual => "Manual",
            WingFfEquation::EdetConventional => "EDET Conventional",
            WingFfEquation::EdetAdvanced => "EDET Advanced",
            WingFfEquation::Hoerner => "Hoerner",
            WingFfEquation::Covert => "Covert",
            WingFfEquation::Shevell => "Shevell",
            WingFfEquation::Kroo => "Kroo",
            WingFfEquation::Torenbeek => "Torenbeek",
            WingFfEquation::Datcom => "DATCOM",
            WingFfEquation::Schemensky6Series => "Schemensky 6 Series AF",
            WingFfEquation::Schemensky4Series => "Schemensky 4 Series AF",
            WingFfEquation::JenkinsonWing => "Jenkinson Wing",
            WingFfEquation::JenkinsonTail => "Jenkinson Tail",
        }
    }

    pub fn code(&self) -> i32 {
        Self::ALL.iter().position(|e| e == self).map_or(-1, |i| i as i32)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Inputs to the wing form factor laws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WingFfInputs {
    pub toc: f64,
    /// Percent laminar (0..100)
    pub perc_lam: f64,
    /// Quarter chord sweep (radians)
    pub sweep25: f64,
    /// Half chord sweep (radians)
    pub sweep50: f64,
    pub mach: f64,
}

/// Form factor plus any interference factor the law imposes on its row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormFactor {
    pub value: f64,
    pub q_override: Option<f64>,
}

impl FormFactor {
    fn plain(value: f64) -> Self {
        FormFactor { value, q_override: None }
    }
}

/// DATCOM Mach breakpoints for the lifting surface correction R_LS
const DATCOM_MACH: [f64; 4] = [0.25, 0.60, 0.80, 0.90];

/// Cubic-in-cos(Λ25) coefficients [c3, c2, c1, c0] at each breakpoint
const DATCOM_RLS: [[f64; 4]; 4] = [
    [-2.0292, 3.6345, -1.391, 0.8521],
    [-1.9735, 3.4504, -1.186, 0.858],
    [-1.6538, 2.865, -0.886, 0.934],
    [-1.8316, 3.3944, -1.3596, 1.1567],
];

fn datcom_rls_at(index: usize, cos_sweep: f64) -> f64 {
    let [c3, c2, c1, c0] = DATCOM_RLS[index];
    ((c3 * cos_sweep + c2) * cos_sweep + c1) * cos_sweep + c0
}

/// Lifting surface correction R_LS, linear in Mach between breakpoints
pub fn datcom_rls(mach: f64, sweep25: f64) -> f64 {
    let cos_sweep = sweep25.cos();
    let last = DATCOM_MACH.len() - 1;

    if mach <= DATCOM_MACH[0] {
        return datcom_rls_at(0, cos_sweep);
    }
    if mach >= DATCOM_MACH[last] {
        return datcom_rls_at(last, cos_sweep);
    }

    let segment = (0..last)
        .rev()
        .find(|&i| mach >= DATCOM_MACH[i])
        .unwrap_or(0);
    let x = (mach - DATCOM_MACH[segment]) / (DATCOM_MACH[segment + 1] - DATCOM_MACH[segment]);
    let low = datcom_rls_at(segment, cos_sweep);
    let high = datcom_rls_at(segment + 1, cos_sweep);
    low + x * (high - low)
}

/// Wing form factor
pub fn wing_ff(equation: WingFfEquation, inputs: &WingFfInputs) -> FormFactor {
    let toc = inputs.toc;
    let mach = inputs.mach;
    let cos25 = inputs.sweep25.cos();
    let cos50 = inputs.sweep50.cos();

    let value = match equation {
        WingFfEquation::Manual => 1.0,
        WingFfEquation::EdetConventional => {
            1.0 + toc
                * (2.94206
                    + toc * (7.16974 + toc * (48.8876 + toc * (-1403.02 + toc * (8598.76 + toc * (-15834.3))))))
        }
        WingFfEquation::EdetAdvanced => 1.0 + 4.275 * toc,
        WingFfEquation::Hoerner => 1.0 + 2.0 * toc + 60.0 * toc.powi(4),
        WingFfEquation::Covert => 1.0 + 1.8 * toc + 50.0 * toc.powi(4),
        WingFfEquation::Shevell => {
            let z = (2.0 - mach * mach) * cos25 / (1.0 - mach * mach * cos25 * cos25).sqrt();
            1.0 + z * toc + 100.0 * toc.powi(4)
        }
        WingFfEquation::Kroo => {
            let cos2 = cos25 * cos25;
            let compress = 1.0 - mach * mach * cos2;
            1.0 + 2.2 * cos2 * toc / compress.sqrt()
                + 4.84 * cos2 * (1.0 + 5.0 * cos2) * toc * toc / (2.0 * compress)
        }
        WingFfEquation::Torenbeek => 1.0 + 2.7 * toc + 100.0 * toc.powi(4),
        WingFfEquation::Datcom => {
            // Threshold applies to the percent laminar value as given
            let l = if inputs.perc_lam <= 0.30 { 2.0 } else { 1.2 };
            (1.0 + l * toc + 100.0 * toc.powi(4)) * datcom_rls(mach, inputs.sweep25)
        }
        WingFfEquation::Schemensky6Series => 1.0 + 1.44 * toc + 2.0 * toc * toc,
        WingFfEquation::Schemensky4Series => 1.0 + 1.68 * toc + 3.0 * toc * toc,
        WingFfEquation::JenkinsonWing => {
            let f_star = 1.0 + 3.3 * toc - 0.008 * toc * toc + 27.0 * toc.powi(3);
            (f_star - 1.0) * cos50 * cos50 + 1.0
        }
        WingFfEquation::JenkinsonTail => {
            let f_star = 1.0 + 3.52 * toc;
            return FormFactor {
                value: (f_star - 1.0) * cos50 * cos50 + 1.0,
                q_override: Some(JENKINSON_TAIL_Q),
            };
        }
    };
    FormFactor::plain(value)
}

/// Wing form factor by integer selector; unknown selectors yield 0
pub fn wing_ff_by_code(code: i32, inputs: &WingFfInputs) -> FormFactor {
    WingFfEquation::from_code(code).map_or(FormFactor::plain(0.0), |e| wing_ff(e, inputs))
}

// =============================================================================
// BODY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BodyFfEquation {
    Manual,
    SchemenskyFuselage,
    SchemenskyNacelle,
    #[default]
    HoernerStreambody,
    Torenbeek,
    Shevell,
    JenkinsonFuselage,
    JenkinsonWingNacelle,
    JenkinsonAftFuseNacelle,
    Jobe,
}

impl BodyFfEquation {
    pub const ALL: [BodyFfEquation; 10] = [
        BodyFfEquation::Manual,
        BodyFfEquation::SchemenskyFuselage,
        BodyFfEquation::SchemenskyNacelle,
        BodyFfEquation::HoernerStreambody,
        BodyFfEquation::Torenbeek,
        BodyFfEquation::Shevell,
        BodyFfEquation::JenkinsonFuselage,
        BodyFfEquation::JenkinsonWingNacelle,
        BodyFfEquation::JenkinsonAftFuseNacelle,
        BodyFfEquation::Jobe,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BodyFfEquation::Manual => "Manual",
            BodyFfEquation::SchemenskyFuselage => "Schemensky Fuselage",
            BodyFfEquation::SchemenskyNacelle => "Schemensky Nacelle",
            BodyFfEquation::HoernerStreambody => "Hoerner Streamlined Body",
            BodyFfEquation::Torenbeek => "Torenbeek",
            BodyFfEquation::Shevell => "Shevell",
            BodyFfEquation::JenkinsonFuselage => "Jenkinson Fuselage",
            BodyFfEquation::JenkinsonWingNacelle => "Jenkinson Wing Nacelle",
            BodyFfEquation::JenkinsonAftFuseNacelle => "Jenkinson Aft Fuse Nacelle",
            BodyFfEquation::Jobe => "Jobe",
        }
    }

    pub fn code(&self) -> i32 {
        Self::ALL.iter().position(|e| e == self).map_or(-1, |i| i as i32)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Inputs to the body form factor laws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFfInputs {
    /// Length over nominal diameter (inverse of the reported fineness ratio)
    pub l_over_d: f64,
    /// Length over √(max cross-section area)
    pub fr: f64,
    pub ref_length: f64,
    pub max_area: f64,
    pub mach: f64,
}

/// Body form factor
pub fn body_ff(equation: BodyFfEquation, inputs: &BodyFfInputs) -> f64 {
    let ld = inputs.l_over_d;
    let fr = inputs.fr;
    match equation {
        BodyFfEquation::Manual => 1.0,
        BodyFfEquation::SchemenskyFuselage => 1.0 + 60.0 / fr.powi(3) + 0.0025 * fr,
        BodyFfEquation::SchemenskyNacelle => 1.0 + 0.35 / fr,
        BodyFfEquation::HoernerStreambody => 1.0 + 1.5 / ld.powf(1.5) + 7.0 / ld.powi(3),
        BodyFfEquation::Torenbeek => 1.0 + 2.2 / ld.powf(1.5) + 3.8 / ld.powi(3),
        BodyFfEquation::Shevell => 1.0 + 2.8 / ld.powf(1.5) + 3.8 / ld.powi(3),
        BodyFfEquation::JenkinsonFuselage => {
            let lambda = inputs.ref_length / (4.0 / PI * inputs.max_area).sqrt();
            1.0 + 2.2 / lambda.powf(1.5) - 0.9 / lambda.powi(3)
        }
        BodyFfEquation::JenkinsonWingNacelle => 1.25,
        BodyFfEquation::JenkinsonAftFuseNacelle => 1.5,
        BodyFfEquation::Jobe => {
            1.02 + 1.5 / ld.powf(1.5) + 7.0 / (0.6 * ld.powi(3) * (1.0 - inputs.mach.powi(3)))
        }
    }
}

/// Body form factor by integer selector; unknown selectors yield 0
pub fn body_ff_by_code(code: i32, inputs: &BodyFfInputs) -> f64 {
    BodyFfEquation::from_code(code).map_or(0.0, |e| body_ff(e, inputs))
}

/// Display name for a wing selector code, "ERROR" when unknown
pub fn wing_ff_name_by_code(code: i32) -> &'static str {
    WingFfEquation::from_code(code).map_or("ERROR", |e| e.name())
}

/// Display name for a body selector code, "ERROR" when unknown
pub fn body_ff_name_by_code(code: i32) -> &'static str {
    BodyFfEquation::from_code(code).map_or("ERROR", |e| e.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn wing(toc: f64) -> WingFfInputs {
        WingFfInputs {
            toc,
            perc_lam: 0.0,
            sweep25: 0.0,
            sweep50: 0.0,
            mach: 0.0,
        }
    }

    #[test]
    fn test_hoerner_wing() {
        // 1 + 0.24 + 60 * 0.12^4
        let ff = wing_ff(WingFfEquation::Hoerner, &wing(0.12));
        assert!(approx_eq(ff.value, 1.0 + 0.24 + 60.0 * 0.00020736), "FF = {}", ff.value);
        assert_eq!(ff.q_override, None);
    }

    #[test]
    fn test_manual_wing_is_one() {
        assert!(approx_eq(wing_ff(WingFfEquation::Manual, &wing(0.3)).value, 1.0));
    }

    #[test]
    fn test_shevell_reduces_to_thickness_polynomial_at_zero_mach() {
        // Z = 2 at M = 0 and no sweep
        let ff = wing_ff(WingFfEquation::Shevell, &wing(0.1));
        assert!(approx_eq(ff.value, 1.0 + 0.2 + 100.0 * 0.0001));
    }

    #[test]
    fn test_kroo_unswept_incompressible() {
        let ff = wing_ff(WingFfEquation::Kroo, &wing(0.1));
        // 1 + 2.2*0.1 + 4.84*6*0.01/2
        assert!(approx_eq(ff.value, 1.0 + 0.22 + 0.1452), "FF = {}", ff.value);
    }

    #[test]
    fn test_jenkinson_tail_forces_q() {
        let ff = wing_ff(WingFfEquation::JenkinsonTail, &wing(0.1));
        assert!(approx_eq(ff.value, 1.352));
        assert_eq!(ff.q_override, Some(JENKINSON_TAIL_Q));
    }

    #[test]
    fn test_jenkinson_wing_sweep_reduces_ff() {
        let straight = wing_ff(WingFfEquation::JenkinsonWing, &wing(0.12));
        let swept = wing_ff(
            WingFfEquation::JenkinsonWing,
            &WingFfInputs {
                sweep50: 30.0_f64.to_radians(),
                ..wing(0.12)
            },
        );
        assert!(swept.value < straight.value);
        assert!(approx_eq(swept.value - 1.0, (straight.value - 1.0) * 0.75));
    }

    #[test]
    fn test_datcom_breakpoints() {
        // cos(0) = 1 so R_LS is the coefficient sum
        assert!(approx_eq(datcom_rls(0.1, 0.0), -2.0292 + 3.6345 - 1.391 + 0.8521));
        assert!(approx_eq(datcom_rls(0.6, 0.0), -1.9735 + 3.4504 - 1.186 + 0.858));
        assert!(approx_eq(datcom_rls(0.9, 0.0), -1.8316 + 3.3944 - 1.3596 + 1.1567));
        assert!(approx_eq(datcom_rls(1.5, 0.0), datcom_rls(0.9, 0.0)));
    }

    #[test]
    fn test_datcom_interpolates_linearly() {
        let mid = datcom_rls(0.7, 0.2);
        let expected = 0.5 * (datcom_rls(0.6, 0.2) + datcom_rls(0.8, 0.2));
        assert!(approx_eq(mid, expected));
    }

    #[test]
    fn test_datcom_thickness_location() {
        let turbulent = wing_ff(WingFfEquation::Datcom, &wing(0.1)).value;
        let laminar = wing_ff(
            WingFfEquation::Datcom,
            &WingFfInputs {
                perc_lam: 50.0,
                ..wing(0.1)
            },
        )
        .value;
        let rls = datcom_rls(0.0, 0.0);
        assert!(approx_eq(turbulent, (1.0 + 0.2 + 0.01) * rls));
        assert!(approx_eq(laminar, (1.0 + 0.12 + 0.01) * rls));
    }

    #[test]
    fn test_datcom_threshold_is_on_percent_value() {
        let at = |perc_lam: f64| {
            wing_ff(
                WingFfEquation::Datcom,
                &WingFfInputs {
                    perc_lam,
                    mach: 0.5,
                    ..wing(0.12)
                },
            )
            .value
        };
        let rls = datcom_rls(0.5, 0.0);
        let thick = 100.0 * 0.12_f64.powi(4);

        assert!(approx_eq(at(10.0), at(50.0)));
        assert!(approx_eq(at(10.0), (1.0 + 1.2 * 0.12 + thick) * rls));
        assert!(approx_eq(at(0.30), (1.0 + 2.0 * 0.12 + thick) * rls));
        assert!(approx_eq(at(0.31), at(10.0)));
    }

    fn body(ld: f64) -> BodyFfInputs {
        BodyFfInputs {
            l_over_d: ld,
            fr: ld * (4.0 / PI).sqrt(),
            ref_length: 10.0 * ld,
            max_area: PI * 25.0,
            mach: 0.0,
        }
    }

    #[test]
    fn test_hoerner_body() {
        // l/d = 4: 1 + 1.5/8 + 7/64
        let ff = body_ff(BodyFfEquation::HoernerStreambody, &body(4.0));
        assert!(approx_eq(ff, 1.0 + 0.1875 + 0.109375), "FF = {}", ff);
    }

    #[test]
    fn test_jenkinson_fuselage_uses_equivalent_diameter() {
        // Equivalent diameter of area 25π is 10, so Λ = l/d
        let ff = body_ff(BodyFfEquation::JenkinsonFuselage, &body(4.0));
        assert!(approx_eq(ff, 1.0 + 2.2 / 8.0 - 0.9 / 64.0), "FF = {}", ff);
    }

    #[test]
    fn test_constant_nacelle_factors() {
        assert!(approx_eq(body_ff(BodyFfEquation::JenkinsonWingNacelle, &body(3.0)), 1.25));
        assert!(approx_eq(body_ff(BodyFfEquation::JenkinsonAftFuseNacelle, &body(3.0)), 1.5));
    }

    #[test]
    fn test_jobe_grows_with_mach() {
        let low = body_ff(BodyFfEquation::Jobe, &body(5.0));
        let high = body_ff(BodyFfEquation::Jobe, &BodyFfInputs { mach: 0.8, ..body(5.0) });
        assert!(high > low);
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(body_ff_by_code(42, &body(4.0)), 0.0);
        assert_eq!(wing_ff_by_code(-1, &wing(0.1)).value, 0.0);
        assert_eq!(wing_ff_name_by_code(42), "ERROR");
        assert_eq!(body_ff_name_by_code(3), "Hoerner Streamlined Body");
    }
}
