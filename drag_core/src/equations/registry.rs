//! # Correlation Registry
//!
//! Central registry of every selectable correlation: display name, plain
//! formula, family, and whether it needs an iterative solve. Drives the
//! name lookups used by study files and the CLI, and the generated
//! markdown reference.
//!
//! ## Usage
//!
//! ```rust
//! use drag_core::equations::registry::{Correlation, CorrelationFamily};
//!
//! let c = Correlation::from_name(CorrelationFamily::TurbulentFriction, "Schoenherr Implicit").unwrap();
//! assert!(c.metadata().implicit);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::form_factor::{BodyFfEquation, WingFfEquation};
use super::friction::{LamCfEquation, TurbCfEquation};

// ============================================================================
// Families
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrelationFamily {
    LaminarFriction,
    TurbulentFriction,
    WingFormFactor,
    BodyFormFactor,
}

impl CorrelationFamily {
    pub const ALL: [CorrelationFamily; 4] = [
        CorrelationFamily::LaminarFriction,
        CorrelationFamily::TurbulentFriction,
        CorrelationFamily::WingFormFactor,
        CorrelationFamily::BodyFormFactor,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CorrelationFamily::LaminarFriction => "Laminar Skin Friction",
            CorrelationFamily::TurbulentFriction => "Turbulent Skin Friction",
            CorrelationFamily::WingFormFactor => "Wing Form Factor",
            CorrelationFamily::BodyFormFactor => "Body Form Factor",
        }
    }

    fn source_module(&self) -> &'static str {
        match self {
            CorrelationFamily::LaminarFriction | CorrelationFamily::TurbulentFriction => {
                "drag_core/src/equations/friction.rs"
            }
            CorrelationFamily::WingFormFactor | CorrelationFamily::BodyFormFactor => {
                "drag_core/src/equations/form_factor.rs"
            }
        }
    }

    fn source_function(&self) -> &'static str {
        match self {
            CorrelationFamily::LaminarFriction => "lam_cf",
            CorrelationFamily::TurbulentFriction => "turb_cf",
            CorrelationFamily::WingFormFactor => "wing_ff",
            CorrelationFamily::BodyFormFactor => "body_ff",
        }
    }
}

// ============================================================================
// Correlation
// ============================================================================

/// Any selectable correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Correlation {
    Laminar(LamCfEquation),
    Turbulent(TurbCfEquation),
    Wing(WingFfEquation),
    Body(BodyFfEquation),
}

/// Metadata for one correlation
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMetadata {
    pub name: &'static str,
    pub family: CorrelationFamily,
    /// Formula in plain text
    pub formula_plain: &'static str,
    /// Solved with Newton-Raphson
    pub implicit: bool,
    pub notes: Vec<&'static str>,
    pub source_module: &'static str,
    pub source_function: &'static str,
}

impl Correlation {
    pub fn family(&self) -> CorrelationFamily {
        match self {
            Correlation::Laminar(_) => CorrelationFamily::LaminarFriction,
            Correlation::Turbulent(_) => CorrelationFamily::TurbulentFriction,
            Correlation::Wing(_) => CorrelationFamily::WingFormFactor,
            Correlation::Body(_) => CorrelationFamily::BodyFormFactor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Correlation::Laminar(e) => e.name(),
            Correlation::Turbulent(e) => e.name(),
            Correlation::Wing(e) => e.name(),
            Correlation::Body(e) => e.name(),
        }
    }

    fn formula(&self) -> &'static str {
        match self {
            Correlation::Laminar(LamCfEquation::Blasius) => "Cf = 1.32824 / Re^0.5",
            Correlation::Laminar(LamCfEquation::BlasiusWithHeat) => "not implemented (Cf = 0)",

            Correlation::Turbulent(e) => match e {
                TurbCfEquation::WhiteChristophCompressible => "Cf = 0.42 / ln(0.056 Re)^2",
                TurbCfEquation::SchlichtingPrandtl => "Cf = 1 / (2 log10(Re) - 0.65)^2.3",
                TurbCfEquation::SchlichtingCompressible => "Cf = 0.455 / log10(Re)^2.58",
                TurbCfEquation::SchlichtingIncompressible => "Cf = 0.472 / log10(Re)^2.5",
                TurbCfEquation::SchultzGrunowSchoenherr => "Cf = 0.427 / (log10(Re) - 0.407)^2.64",
                TurbCfEquation::SchultzGrunowHighRe => "Cf = 0.37 / log10(Re)^2.584",
                TurbCfEquation::PowerLawBlasius => "Cf = 0.0592 / Re^0.2",
                TurbCfEquation::PowerLawPrandtlLowRe => "Cf = 0.074 / Re^0.2",
                TurbCfEquation::PowerLawPrandtlMediumRe => "Cf = 0.027 / Re^(1/7)",
                TurbCfEquation::PowerLawPrandtlHighRe => "Cf = 0.058 / Re^0.2",
                TurbCfEquation::ExplicitFitSpalding => "Cf = 0.455 / ln(0.06 Re)^2",
                TurbCfEquation::ExplicitFitSpaldingChi => "Cf = 0.225 / log10(Re)^2.32",
                TurbCfEquation::ExplicitFitSchoenherr => "Cf = (1 / (3.46 log10(Re) - 5.6))^2",
                TurbCfEquation::ImplicitSchoenherr => "0.242 / (sqrt(Cf) log10(Re Cf)) = 1",
                TurbCfEquation::ImplicitKarman => "(4.15 log10(Re Cf) + 1.70) sqrt(Cf) = 1",
                TurbCfEquation::ImplicitKarmanSchoenherr => "4.13 log10(Re Cf) sqrt(Cf) = 1",
                TurbCfEquation::RoughnessWhite | TurbCfEquation::RoughnessSchlichtingLocal => {
                    "Cf = (1.4 + 3.7 log10(L/k))^-2"
                }
                TurbCfEquation::RoughnessSchlichtingAvg => "Cf = (1.89 + 1.62 log10(L/(k s)))^-2.5",
                TurbCfEquation::RoughnessSchlichtingAvgFlowCorrection => {
                    "Cf = (1.89 + 1.62 log10(L/(k s)))^-2.5 / (1 + (γ-1)/2 M)^0.467"
                }
                TurbCfEquation::HeatTransferWhiteChristoph => {
                    "F = (1 + 0.22 r (γ-1)/2 M² Te/Tw) / (1 + 0.3 (Taw/Tw - 1)); Cf = 0.451 F² Te/Tw / ln(0.056 F (Te/Tw)^(1+n) Re)"
                }
            },

            Correlation::Wing(e) => match e {
                WingFfEquation::Manual => "FF = user value",
                WingFfEquation::EdetConventional => {
                    "FF = 1 + t(2.94206 + t(7.16974 + t(48.8876 + t(-1403.02 + t(8598.76 - 15834.3 t)))))"
                }
                WingFfEquation::EdetAdvanced => "FF = 1 + 4.275 t",
                WingFfEquation::Hoerner => "FF = 1 + 2 t + 60 t^4",
                WingFfEquation::Covert => "FF = 1 + 1.8 t + 50 t^4",
                WingFfEquation::Shevell => {
                    "Z = (2 - M²) cos(Λ25) / sqrt(1 - M² cos²(Λ25)); FF = 1 + Z t + 100 t^4"
                }
                WingFfEquation::Kroo => {
                    "FF = 1 + 2.2 cos²(Λ25) t / sqrt(1 - M² cos²(Λ25)) + 4.84 cos²(Λ25)(1 + 5 cos²(Λ25)) t² / (2(1 - M² cos²(Λ25)))"
                }
                WingFfEquation::Torenbeek => "FF = 1 + 2.7 t + 100 t^4",
                WingFfEquation::Datcom => "FF = (1 + L t + 100 t^4) R_LS(M, Λ25)",
                WingFfEquation::Schemensky6Series => "FF = 1 + 1.44 t + 2 t²",
                WingFfEquation::Schemensky4Series => "FF = 1 + 1.68 t + 3 t²",
                WingFfEquation::JenkinsonWing => {
                    "F* = 1 + 3.3 t - 0.008 t² + 27 t³; FF = (F* - 1) cos²(Λ50) + 1"
                }
                WingFfEquation::JenkinsonTail => "F* = 1 + 3.52 t; FF = (F* - 1) cos²(Λ50) + 1",
            },

            Correlation::Body(e) => match e {
                BodyFfEquation::Manual => "FF = user value",
                BodyFfEquation::SchemenskyFuselage => "FF = 1 + 60 / FR³ + 0.0025 FR",
                BodyFfEquation::SchemenskyNacelle => "FF = 1 + 0.35 / FR",
                BodyFfEquation::HoernerStreambody => "FF = 1 + 1.5 / (l/d)^1.5 + 7 / (l/d)³",
                BodyFfEquation::Torenbeek => "FF = 1 + 2.2 / (l/d)^1.5 + 3.8 / (l/d)³",
                BodyFfEquation::Shevell => "FF = 1 + 2.8 / (l/d)^1.5 + 3.8 / (l/d)³",
                BodyFfEquation::JenkinsonFuselage => {
                    "Λ = L / sqrt(4 A_max / π); FF = 1 + 2.2 / Λ^1.5 - 0.9 / Λ³"
                }
                BodyFfEquation::JenkinsonWingNacelle => "FF = 1.25",
                BodyFfEquation::JenkinsonAftFuseNacelle => "FF = 1.5",
                BodyFfEquation::Jobe => "FF = 1.02 + 1.5 / (l/d)^1.5 + 7 / (0.6 (l/d)³ (1 - M³))",
            },
        }
    }

    fn notes(&self) -> Vec<&'static str> {
        match self {
            Correlation::Laminar(LamCfEquation::BlasiusWithHeat) => {
                vec!["Selectable but not implemented; always returns 0"]
            }
            Correlation::Turbulent(e) if e.is_implicit() => vec![
                "Solved by Newton-Raphson with the analytic derivative",
                "Seeded with an explicit fit; returns the best estimate if the iteration cap is hit",
            ],
            Correlation::Turbulent(
                TurbCfEquation::RoughnessSchlichtingAvg | TurbCfEquation::RoughnessSchlichtingAvgFlowCorrection,
            ) => vec!["s = inches per model length unit"],
            Correlation::Turbulent(TurbCfEquation::HeatTransferWhiteChristoph) => {
                vec!["Recovery factor r = 0.89, viscosity exponent n = 0.67"]
            }
            Correlation::Wing(WingFfEquation::Datcom) => vec![
                "L = 2.0 when the percent laminar value is <= 0.30, else 1.2",
                "R_LS is a cubic in cos(Λ25) at M = 0.25, 0.60, 0.80, 0.90, linear in Mach between",
            ],
            Correlation::Wing(WingFfEquation::JenkinsonTail) => vec!["Forces the row interference factor Q = 1.2"],
            Correlation::Body(BodyFfEquation::Jobe) => vec!["Singular at M = 1"],
            _ => Vec::new(),
        }
    }

    pub fn metadata(&self) -> CorrelationMetadata {
        let family = self.family();
        CorrelationMetadata {
            name: self.name(),
            family,
            formula_plain: self.formula(),
            implicit: matches!(self, Correlation::Turbulent(e) if e.is_implicit()),
            notes: self.notes(),
            source_module: family.source_module(),
            source_function: family.source_function(),
        }
    }

    /// Look up a correlation by its display name within a family
    pub fn from_name(family: CorrelationFamily, name: &str) -> Option<Correlation> {
        NAME_INDEX.get(&family)?.get(name).copied()
    }

    pub fn in_family(family: CorrelationFamily) -> Vec<Correlation> {
        ALL_CORRELATIONS.iter().copied().filter(|c| c.family() == family).collect()
    }
}

/// Every correlation, grouped by family
pub static ALL_CORRELATIONS: Lazy<Vec<Correlation>> = Lazy::new(|| {
    let mut all = Vec::new();
    all.extend(LamCfEquation::ALL.iter().copied().map(Correlation::Laminar));
    all.extend(TurbCfEquation::ALL.iter().copied().map(Correlation::Turbulent));
    all.extend(WingFfEquation::ALL.iter().copied().map(Correlation::Wing));
    all.extend(BodyFfEquation::ALL.iter().copied().map(Correlation::Body));
    all
});

static NAME_INDEX: Lazy<HashMap<CorrelationFamily, HashMap<&'static str, Correlation>>> = Lazy::new(|| {
    let mut index: HashMap<CorrelationFamily, HashMap<&'static str, Correlation>> = HashMap::new();
    for c in ALL_CORRELATIONS.iter() {
        index.entry(c.family()).or_default().insert(c.name(), *c);
    }
    index
});

// ============================================================================
// Markdown Generation
// ============================================================================

/// Markdown reference of every correlation
pub fn generate_correlations_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# Dragline Correlations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-correlations`

Every skin friction and form factor correlation selectable in a drag
build-up, with its formula and implementation location.

## Notation

| Symbol | Meaning |
|--------|---------|
| Re | Reynolds number on the reference length |
| t | Maximum thickness / chord |
| l/d | Body length / nominal diameter |
| FR | Body length / sqrt(max cross-section area) |
| Λ25, Λ50 | Area-weighted quarter / half chord sweep |
| M | Mach number |
| k | Roughness height |

---

"#,
    );

    for family in CorrelationFamily::ALL {
        output.push_str(&format!("## {}\n\n", family.display_name()));

        for correlation in Correlation::in_family(family) {
            let meta = correlation.metadata();
            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));
            if meta.implicit {
                output.push_str("**Solution:** iterative\n\n");
            }
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));
            if !meta.notes.is_empty() {
                output.push_str("**Notes:**\n");
                for note in &meta.notes {
                    output.push_str(&format!("- {}\n", note));
                }
                output.push('\n');
            }
            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Correlations:** {}\n- **Families:** {}\n",
        ALL_CORRELATIONS.len(),
        CorrelationFamily::ALL.len()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_correlations_counted() {
        assert_eq!(ALL_CORRELATIONS.len(), 2 + 21 + 13 + 10);
    }

    #[test]
    fn test_from_name_is_family_scoped() {
        let wing = Correlation::from_name(CorrelationFamily::WingFormFactor, "Torenbeek");
        let body = Correlation::from_name(CorrelationFamily::BodyFormFactor, "Torenbeek");
        assert_eq!(wing, Some(Correlation::Wing(WingFfEquation::Torenbeek)));
        assert_eq!(body, Some(Correlation::Body(BodyFfEquation::Torenbeek)));
        assert_eq!(Correlation::from_name(CorrelationFamily::LaminarFriction, "Torenbeek"), None);
    }

    #[test]
    fn test_every_name_resolves() {
        for c in ALL_CORRELATIONS.iter() {
            assert_eq!(Correlation::from_name(c.family(), c.name()), Some(*c));
        }
    }

    #[test]
    fn test_only_three_implicit() {
        let implicit = ALL_CORRELATIONS.iter().filter(|c| c.metadata().implicit).count();
        assert_eq!(implicit, 3);
    }

    #[test]
    fn test_metadata_complete() {
        for c in ALL_CORRELATIONS.iter() {
            let meta = c.metadata();
            assert!(!meta.name.is_empty());
            assert!(!meta.formula_plain.is_empty(), "{} has no formula", meta.name);
            assert!(meta.source_module.ends_with(".rs"));
        }
    }

    #[test]
    fn test_markdown_generation() {
        let md = generate_correlations_markdown();
        assert!(md.contains("# Dragline Correlations Reference"));
        assert!(md.contains("## Turbulent Skin Friction"));
        assert!(md.contains("### Von Karman Implicit"));
        assert!(md.contains("**Solution:** iterative"));
        assert!(md.contains("Forces the row interference factor"));
    }
}
