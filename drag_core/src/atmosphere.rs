//! # Atmosphere Model
//!
//! U.S. Standard Atmosphere 1976 up to 84.852 km geopotential altitude, plus
//! the gas relations used when the freestream is defined manually.
//!
//! All functions here work in SI units. [`crate::flow`] converts user units
//! in and out.

/// Standard gravity (m/s²)
pub const G0: f64 = 9.80665;
/// Specific gas constant for dry air (J/(kg·K))
pub const R_AIR: f64 = 287.05287;
/// Sea level standard density (kg/m³)
pub const RHO_SEA_LEVEL: f64 = 1.225;
/// Upper altitude of the model (m, geopotential)
pub const MAX_ALTITUDE_M: f64 = 84852.0;

/// Sutherland reference viscosity constant (kg/(m·s·K^0.5))
const SUTHERLAND_BETA: f64 = 1.458e-6;
/// Sutherland constant (K)
const SUTHERLAND_S: f64 = 110.4;

#[derive(Debug, Clone, Copy)]
struct Layer {
    /// Base geopotential altitude (m)
    base_altitude: f64,
    /// Temperature at layer base (K)
    base_temperature: f64,
    /// Pressure at layer base (Pa)
    base_pressure: f64,
    /// Lapse rate (K/m)
    lapse_rate: f64,
}

const US1976_LAYERS: &[Layer] = &[
    Layer {
        base_altitude: 0.0,
        base_temperature: 288.15,
        base_pressure: 101325.0,
        lapse_rate: -0.0065,
    },
    Layer {
        base_altitude: 11000.0,
        base_temperature: 216.65,
        base_pressure: 22632.06,
        lapse_rate: 0.0,
    },
    Layer {
        base_altitude: 20000.0,
        base_temperature: 216.65,
        base_pressure: 5474.889,
        lapse_rate: 0.001,
    },
    Layer {
        base_altitude: 32000.0,
        base_temperature: 228.65,
        base_pressure: 868.0187,
        lapse_rate: 0.0028,
    },
    Layer {
        base_altitude: 47000.0,
        base_temperature: 270.65,
        base_pressure: 110.9063,
        lapse_rate: 0.0,
    },
    Layer {
        base_altitude: 51000.0,
        base_temperature: 270.65,
        base_pressure: 66.93887,
        lapse_rate: -0.0028,
    },
    Layer {
        base_altitude: 71000.0,
        base_temperature: 214.65,
        base_pressure: 3.956420,
        lapse_rate: -0.002,
    },
];

/// Thermodynamic state of the freestream, SI units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereState {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub dynamic_viscosity_pa_s: f64,
    pub sound_speed_mps: f64,
}

impl AtmosphereState {
    /// Density relative to sea level standard, used for KEAS conversion
    pub fn density_ratio(&self) -> f64 {
        self.density_kg_m3 / RHO_SEA_LEVEL
    }

    pub fn kinematic_viscosity_m2_s(&self) -> f64 {
        self.dynamic_viscosity_pa_s / self.density_kg_m3
    }

    fn from_temperature_pressure_density(t: f64, p: f64, rho: f64, gamma: f64) -> Self {
        AtmosphereState {
            temperature_k: t,
            pressure_pa: p,
            density_kg_m3: rho,
            dynamic_viscosity_pa_s: sutherland_viscosity(t),
            sound_speed_mps: speed_of_sound(t, gamma),
        }
    }
}

/// Standard temperature and pressure at a geopotential altitude (m)
fn standard_temperature_pressure(altitude_m: f64) -> (f64, f64) {
    let altitude = altitude_m.clamp(0.0, MAX_ALTITUDE_M);

    let layer = US1976_LAYERS
        .iter()
        .rev()
        .find(|layer| altitude >= layer.base_altitude)
        .unwrap_or(&US1976_LAYERS[0]);

    let dh = altitude - layer.base_altitude;
    let temperature = layer.base_temperature + layer.lapse_rate * dh;

    let pressure = if layer.lapse_rate.abs() < 1e-12 {
        layer.base_pressure * (-G0 * dh / (R_AIR * layer.base_temperature)).exp()
    } else {
        let ratio = temperature / layer.base_temperature;
        layer.base_pressure * ratio.powf(-G0 / (layer.lapse_rate * R_AIR))
    };

    (temperature, pressure)
}

/// U.S. Standard Atmosphere 1976 with a temperature offset.
///
/// `delta_t_k` shifts the temperature only; pressure follows the standard
/// profile and density comes from the ideal gas law.
pub fn us_standard_1976(altitude_m: f64, delta_t_k: f64, gamma: f64) -> AtmosphereState {
    let (t_std, p) = standard_temperature_pressure(altitude_m);
    let t = t_std + delta_t_k;
    let rho = p / (R_AIR * t);
    AtmosphereState::from_temperature_pressure_density(t, p, rho, gamma)
}

/// Manual pressure and density; temperature from the ideal gas law
pub fn from_pressure_density(pressure_pa: f64, density_kg_m3: f64, gamma: f64) -> AtmosphereState {
    let t = pressure_pa / (density_kg_m3 * R_AIR);
    AtmosphereState::from_temperature_pressure_density(t, pressure_pa, density_kg_m3, gamma)
}

/// Manual pressure and temperature; density from the ideal gas law
pub fn from_pressure_temperature(pressure_pa: f64, temperature_k: f64, gamma: f64) -> AtmosphereState {
    let rho = pressure_pa / (R_AIR * temperature_k);
    AtmosphereState::from_temperature_pressure_density(temperature_k, pressure_pa, rho, gamma)
}

/// Manual density and temperature; pressure from the ideal gas law
pub fn from_density_temperature(density_kg_m3: f64, temperature_k: f64, gamma: f64) -> AtmosphereState {
    let p = density_kg_m3 * R_AIR * temperature_k;
    AtmosphereState::from_temperature_pressure_density(temperature_k, p, density_kg_m3, gamma)
}

/// Sutherland's law for air (Pa·s)
pub fn sutherland_viscosity(temperature_k: f64) -> f64 {
    SUTHERLAND_BETA * temperature_k.powf(1.5) / (temperature_k + SUTHERLAND_S)
}

/// Speed of sound √(γRT) (m/s)
pub fn speed_of_sound(temperature_k: f64, gamma: f64) -> f64 {
    (gamma * R_AIR * temperature_k).sqrt()
}
