//! # Unit Types
//!
//! Runtime-selectable engineering units. The build-up lets the user pick the
//! model length unit, freestream velocity unit, temperature unit, pressure
//! unit and the imperial/metric system used for altitude and density, so
//! units are enums with pure conversion functions rather than newtypes.
//!
//! All conversions go through SI:
//! - Length: meters
//! - Velocity: meters per second
//! - Temperature: kelvin
//! - Pressure: pascals
//! - Density: kg/m³
//! - Dynamic viscosity: Pa·s
//!
//! ## Example
//!
//! ```rust
//! use drag_core::units::{convert_length, LengthUnit};
//!
//! let inches = convert_length(1.0, LengthUnit::Ft, LengthUnit::In);
//! assert!((inches - 12.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Knots to meters per second
pub const KNOT_TO_MPS: f64 = 0.514444;
/// Slug/ft³ to kg/m³
pub const SLUG_FT3_TO_KG_M3: f64 = 515.378818;
/// lbf·s/ft² (slug/ft·s) to Pa·s
pub const SLUG_FT_S_TO_PA_S: f64 = 47.880258;

// ============================================================================
// Length Units
// ============================================================================

/// Model length unit (geometry is expressed in this unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    Mm,
    Cm,
    M,
    In,
    #[default]
    Ft,
    Yd,
    /// Dimensionless model units, treated as meters for conversion
    Unitless,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 7] = [
        LengthUnit::Mm,
        LengthUnit::Cm,
        LengthUnit::M,
        LengthUnit::In,
        LengthUnit::Ft,
        LengthUnit::Yd,
        LengthUnit::Unitless,
    ];

    /// Meters per one unit
    pub fn to_meters(&self) -> f64 {
        match self {
            LengthUnit::Mm => 0.001,
            LengthUnit::Cm => 0.01,
            LengthUnit::M => 1.0,
            LengthUnit::In => 0.0254,
            LengthUnit::Ft => 0.3048,
            LengthUnit::Yd => 0.9144,
            LengthUnit::Unitless => 1.0,
        }
    }

    /// Inches per one unit, used to express roughness heights
    pub fn inches_per_unit(&self) -> f64 {
        match self {
            LengthUnit::Unitless => 1.0,
            _ => self.to_meters() / LengthUnit::In.to_meters(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::In => "in",
            LengthUnit::Ft => "ft",
            LengthUnit::Yd => "yd",
            LengthUnit::Unitless => "LU",
        }
    }
}

/// Convert a length between units
pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    value * from.to_meters() / to.to_meters()
}

// ============================================================================
// Unit System (altitude, density, viscosity)
// ============================================================================

/// Imperial or metric system for atmosphere quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// ft, slug/ft³, slug/(ft·s)
    #[default]
    Imperial,
    /// m, kg/m³, Pa·s
    Metric,
}

impl UnitSystem {
    /// Length unit used for altitude and for Reynolds-number arithmetic
    pub fn length_unit(&self) -> LengthUnit {
        match self {
            UnitSystem::Imperial => LengthUnit::Ft,
            UnitSystem::Metric => LengthUnit::M,
        }
    }

    /// Velocity unit used for Reynolds-number arithmetic
    pub fn velocity_unit(&self) -> VelocityUnit {
        match self {
            UnitSystem::Imperial => VelocityUnit::FtPerS,
            UnitSystem::Metric => VelocityUnit::MPerS,
        }
    }

    /// Density in this system from kg/m³
    pub fn density_from_si(&self, rho_kg_m3: f64) -> f64 {
        match self {
            UnitSystem::Imperial => rho_kg_m3 / SLUG_FT3_TO_KG_M3,
            UnitSystem::Metric => rho_kg_m3,
        }
    }

    /// Density in kg/m³ from this system
    pub fn density_to_si(&self, rho: f64) -> f64 {
        match self {
            UnitSystem::Imperial => rho * SLUG_FT3_TO_KG_M3,
            UnitSystem::Metric => rho,
        }
    }

    /// Dynamic viscosity in this system from Pa·s
    pub fn viscosity_from_si(&self, mu_pa_s: f64) -> f64 {
        match self {
            UnitSystem::Imperial => mu_pa_s / SLUG_FT_S_TO_PA_S,
            UnitSystem::Metric => mu_pa_s,
        }
    }

    /// Maximum altitude supported by the standard atmosphere
    pub fn altitude_limit(&self) -> f64 {
        match self {
            UnitSystem::Imperial => 278385.83,
            UnitSystem::Metric => 84852.0,
        }
    }
}

// ============================================================================
// Velocity Units
// ============================================================================

/// Freestream velocity unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VelocityUnit {
    #[default]
    FtPerS,
    MPerS,
    /// Knots equivalent airspeed (needs a density ratio to become true airspeed)
    Keas,
    /// Knots true airspeed
    Ktas,
    Mph,
    KmPerHr,
}

impl VelocityUnit {
    /// m/s per one unit (KEAS is treated as a knot here)
    pub fn to_mps(&self) -> f64 {
        match self {
            VelocityUnit::FtPerS => 0.3048,
            VelocityUnit::MPerS => 1.0,
            VelocityUnit::Keas | VelocityUnit::Ktas => KNOT_TO_MPS,
            VelocityUnit::Mph => 0.44704,
            VelocityUnit::KmPerHr => 1.0 / 3.6,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            VelocityUnit::FtPerS => "ft/s",
            VelocityUnit::MPerS => "m/s",
            VelocityUnit::Keas => "KEAS",
            VelocityUnit::Ktas => "KTAS",
            VelocityUnit::Mph => "mph",
            VelocityUnit::KmPerHr => "km/hr",
        }
    }
}

/// Convert a velocity between units
pub fn convert_velocity(value: f64, from: VelocityUnit, to: VelocityUnit) -> f64 {
    value * from.to_mps() / to.to_mps()
}

// ============================================================================
// Temperature Units
// ============================================================================

/// Temperature unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    C,
    F,
    #[default]
    K,
    R,
}

impl TemperatureUnit {
    /// Absolute zero in this unit
    pub fn lower_limit(&self) -> f64 {
        match self {
            TemperatureUnit::C => -273.15,
            TemperatureUnit::F => -459.67,
            TemperatureUnit::K | TemperatureUnit::R => 0.0,
        }
    }

    /// Size of one degree in kelvin
    pub fn kelvin_per_degree(&self) -> f64 {
        match self {
            TemperatureUnit::C | TemperatureUnit::K => 1.0,
            TemperatureUnit::F | TemperatureUnit::R => 5.0 / 9.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::C => "°C",
            TemperatureUnit::F => "°F",
            TemperatureUnit::K => "K",
            TemperatureUnit::R => "°R",
        }
    }
}

/// Temperature in kelvin
pub fn temperature_to_kelvin(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::C => value + 273.15,
        TemperatureUnit::F => (value + 459.67) * 5.0 / 9.0,
        TemperatureUnit::K => value,
        TemperatureUnit::R => value * 5.0 / 9.0,
    }
}

/// Temperature from kelvin
pub fn temperature_from_kelvin(kelvin: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::C => kelvin - 273.15,
        TemperatureUnit::F => kelvin * 9.0 / 5.0 - 459.67,
        TemperatureUnit::K => kelvin,
        TemperatureUnit::R => kelvin * 9.0 / 5.0,
    }
}

/// Convert a temperature between units
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    temperature_from_kelvin(temperature_to_kelvin(value, from), to)
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PressureUnit {
    #[default]
    Psf,
    Psi,
    Pa,
    KPa,
    InHg,
    MmHg,
    MmH2O,
    Mb,
    Atm,
}

impl PressureUnit {
    /// Pascals per one unit
    pub fn to_pascals(&self) -> f64 {
        match self {
            PressureUnit::Psf => 47.880258,
            PressureUnit::Psi => 6894.757,
            PressureUnit::Pa => 1.0,
            PressureUnit::KPa => 1000.0,
            PressureUnit::InHg => 3386.389,
            PressureUnit::MmHg => 133.322387,
            PressureUnit::MmH2O => 9.80665,
            PressureUnit::Mb => 100.0,
            PressureUnit::Atm => 101325.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PressureUnit::Psf => "lbf/ft^2",
            PressureUnit::Psi => "lbf/in^2",
            PressureUnit::Pa => "Pa",
            PressureUnit::KPa => "kPa",
            PressureUnit::InHg => "\"Hg",
            PressureUnit::MmHg => "mmHg",
            PressureUnit::MmH2O => "mmH20",
            PressureUnit::Mb => "mB",
            PressureUnit::Atm => "atm",
        }
    }
}

/// Convert a pressure between units
pub fn convert_pressure(value: f64, from: PressureUnit, to: PressureUnit) -> f64 {
    value * from.to_pascals() / to.to_pascals()
}

// ============================================================================
// Export Labels
// ============================================================================

/// Units-adjusted axis labels written to the report header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitLabels {
    pub altitude: String,
    pub density: String,
    pub velocity: String,
    pub temperature: String,
    pub pressure: String,
    pub lref: String,
    pub sref: String,
    pub swet: String,
    pub f: String,
}

impl UnitLabels {
    pub fn new(
        system: UnitSystem,
        length: LengthUnit,
        velocity: VelocityUnit,
        temperature: TemperatureUnit,
        pressure: PressureUnit,
    ) -> Self {
        let (altitude, density) = match system {
            UnitSystem::Imperial => ("Altitude (ft)", "Density (slug/ft^3)"),
            UnitSystem::Metric => ("Altitude (m)", "Density (kg/m^3)"),
        };
        let len = length.symbol();
        UnitLabels {
            altitude: altitude.to_string(),
            density: density.to_string(),
            velocity: format!("Vinf ({})", velocity.symbol()),
            temperature: format!("Temp ({})", temperature.symbol()),
            pressure: format!("Pressure ({})", pressure.symbol()),
            lref: format!("L_ref ({})", len),
            sref: format!("S_ref ({}^2)", len),
            swet: format!("S_wet ({}^2)", len),
            f: format!("f ({}^2)", len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_inches() {
        assert!((convert_length(10.0, LengthUnit::Ft, LengthUnit::In) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_roughness_scale() {
        assert!((LengthUnit::Ft.inches_per_unit() - 12.0).abs() < 1e-9);
        assert!((LengthUnit::M.inches_per_unit() - 39.3701).abs() < 1e-3);
    }

    #[test]
    fn test_knots_to_fps() {
        let fps = convert_velocity(100.0, VelocityUnit::Ktas, VelocityUnit::FtPerS);
        assert!((fps - 168.78).abs() < 0.01);
    }

    #[test]
    fn test_temperature_roundtrip() {
        let k = temperature_to_kelvin(59.0, TemperatureUnit::F);
        assert!((k - 288.15).abs() < 1e-9);
        let r = convert_temperature(288.15, TemperatureUnit::K, TemperatureUnit::R);
        assert!((r - 518.67).abs() < 1e-9);
        assert!((convert_temperature(15.0, TemperatureUnit::C, TemperatureUnit::K) - 288.15).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_conversion() {
        let psf = convert_pressure(101325.0, PressureUnit::Pa, PressureUnit::Psf);
        assert!((psf - 2116.22).abs() < 0.01);
        assert!((convert_pressure(1.0, PressureUnit::Atm, PressureUnit::KPa) - 101.325).abs() < 1e-9);
    }

    #[test]
    fn test_density_systems() {
        let slug = UnitSystem::Imperial.density_from_si(1.225);
        assert!((slug - 0.0023769).abs() < 1e-6);
        assert!((UnitSystem::Imperial.density_to_si(slug) - 1.225).abs() < 1e-12);
    }

    #[test]
    fn test_labels() {
        let labels = UnitLabels::new(
            UnitSystem::Metric,
            LengthUnit::M,
            VelocityUnit::Ktas,
            TemperatureUnit::K,
            PressureUnit::Pa,
        );
        assert_eq!(labels.lref, "L_ref (m)");
        assert_eq!(labels.f, "f (m^2)");
        assert_eq!(labels.velocity, "Vinf (KTAS)");
        assert_eq!(labels.altitude, "Altitude (m)");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&LengthUnit::Ft).unwrap();
        assert_eq!(json, "\"Ft\"");
        let roundtrip: VelocityUnit = serde_json::from_str("\"Keas\"").unwrap();
        assert_eq!(roundtrip, VelocityUnit::Keas);
    }
}
