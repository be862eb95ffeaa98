//! # Flow Condition
//!
//! Freestream state for one build-up run. Exactly one group of inputs is
//! authoritative per [`FreestreamMode`]; [`FlowCondition::update`] re-derives
//! everything else and must run before the pipeline reads the condition.
//!
//! Stored quantities are in the user's selected units:
//! - velocity in `velocity_unit`
//! - altitude, density, viscosities in `unit_system` (ft or m based)
//! - temperature in `temperature_unit`, ΔT in degrees of that unit
//! - pressure in `pressure_unit`
//! - `re_per_length` per one model length unit

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atmosphere::{self, AtmosphereState};
use crate::errors::{DragError, DragResult};
use crate::units::{
    temperature_from_kelvin, temperature_to_kelvin, LengthUnit, PressureUnit, TemperatureUnit,
    UnitSystem, VelocityUnit,
};

/// How the freestream is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FreestreamMode {
    /// Altitude + ΔT drive the standard atmosphere
    #[default]
    UsStandard1976,
    ManualPressureDensity,
    ManualPressureTemperature,
    ManualDensityTemperature,
    /// Reynolds number per unit length and Mach are given directly
    ManualReL,
}

impl FreestreamMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            FreestreamMode::UsStandard1976 => "US Standard Atmosphere 1976",
            FreestreamMode::ManualPressureDensity => "Manual: Pressure & Density",
            FreestreamMode::ManualPressureTemperature => "Manual: Pressure & Temperature",
            FreestreamMode::ManualDensityTemperature => "Manual: Density & Temperature",
            FreestreamMode::ManualReL => "Manual: Re/L & Mach",
        }
    }
}

/// Freestream definition and derived quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowCondition {
    pub mode: FreestreamMode,
    pub unit_system: UnitSystem,

    pub velocity: f64,
    pub velocity_unit: VelocityUnit,
    pub altitude: f64,
    pub delta_t: f64,
    pub temperature: f64,
    pub temperature_unit: TemperatureUnit,
    pub pressure: f64,
    pub pressure_unit: PressureUnit,
    pub density: f64,
    pub specific_heat_ratio: f64,
    pub mach: f64,
    pub re_per_length: f64,

    #[serde(default)]
    pub dynamic_viscosity: f64,
    #[serde(default)]
    pub kinematic_viscosity: f64,
    #[serde(default)]
    pub sound_speed: f64,
    #[serde(default)]
    pub density_ratio: f64,
}

impl Default for FlowCondition {
    fn default() -> Self {
        FlowCondition {
            mode: FreestreamMode::UsStandard1976,
            unit_system: UnitSystem::Imperial,
            velocity: 500.0,
            velocity_unit: VelocityUnit::FtPerS,
            altitude: 20000.0,
            delta_t: 0.0,
            temperature: 59.0,
            temperature_unit: TemperatureUnit::F,
            pressure: 2116.221,
            pressure_unit: PressureUnit::Psf,
            density: 0.0023769,
            specific_heat_ratio: 1.4,
            mach: 0.0,
            re_per_length: 0.0,
            dynamic_viscosity: 0.0,
            kinematic_viscosity: 0.0,
            sound_speed: 0.0,
            density_ratio: 1.0,
        }
    }
}

fn require_finite(field: &str, value: f64) -> DragResult<()> {
    if !value.is_finite() {
        return Err(DragError::invalid_input(field, value.to_string(), "Value must be finite"));
    }
    Ok(())
}

impl FlowCondition {
    /// Check the authoritative inputs for the active mode
    pub fn validate(&self) -> DragResult<()> {
        require_finite("specific_heat_ratio", self.specific_heat_ratio)?;
        if self.specific_heat_ratio <= 1.0 {
            return Err(DragError::invalid_input(
                "specific_heat_ratio",
                self.specific_heat_ratio.to_string(),
                "Specific heat ratio must be greater than 1",
            ));
        }

        match self.mode {
            FreestreamMode::ManualReL => {
                require_finite("re_per_length", self.re_per_length)?;
                require_finite("mach", self.mach)?;
                if self.re_per_length < 0.0 {
                    return Err(DragError::invalid_input(
                        "re_per_length",
                        self.re_per_length.to_string(),
                        "Reynolds number per length cannot be negative",
                    ));
                }
                if self.mach < 0.0 {
                    return Err(DragError::invalid_input("mach", self.mach.to_string(), "Mach cannot be negative"));
                }
            }
            _ => {
                require_finite("velocity", self.velocity)?;
                if self.velocity < 0.0 {
                    return Err(DragError::invalid_input(
                        "velocity",
                        self.velocity.to_string(),
                        "Velocity cannot be negative",
                    ));
                }
            }
        }

        match self.mode {
            FreestreamMode::UsStandard1976 => {
                require_finite("altitude", self.altitude)?;
                require_finite("delta_t", self.delta_t)?;
                let limit = self.unit_system.altitude_limit();
                if self.altitude < 0.0 || self.altitude > limit {
                    return Err(DragError::invalid_input(
                        "altitude",
                        self.altitude.to_string(),
                        format!("Altitude must be within 0..={}", limit),
                    ));
                }
            }
            FreestreamMode::ManualPressureDensity => {
                self.validate_pressure()?;
                self.validate_density()?;
            }
            FreestreamMode::ManualPressureTemperature => {
                self.validate_pressure()?;
                self.validate_temperature()?;
            }
            FreestreamMode::ManualDensityTemperature => {
                self.validate_density()?;
                self.validate_temperature()?;
            }
            FreestreamMode::ManualReL => self.validate_temperature()?,
        }
        Ok(())
    }

    fn validate_pressure(&self) -> DragResult<()> {
        require_finite("pressure", self.pressure)?;
        if self.pressure <= 0.0 {
            return Err(DragError::invalid_input(
                "pressure",
                self.pressure.to_string(),
                "Pressure must be positive",
            ));
        }
        Ok(())
    }

    fn validate_density(&self) -> DragResult<()> {
        require_finite("density", self.density)?;
        if self.density <= 0.0 {
            return Err(DragError::invalid_input(
                "density",
                self.density.to_string(),
                "Density must be positive",
            ));
        }
        Ok(())
    }

    fn validate_temperature(&self) -> DragResult<()> {
        require_finite("temperature", self.temperature)?;
        if self.temperature <= self.temperature_unit.lower_limit() {
            return Err(DragError::invalid_input(
                "temperature",
                self.temperature.to_string(),
                "Temperature must be above absolute zero",
            ));
        }
        Ok(())
    }

    fn temperature_k(&self) -> f64 {
        temperature_to_kelvin(self.temperature, self.temperature_unit)
    }

    fn pressure_pa(&self) -> f64 {
        self.pressure * self.pressure_unit.to_pascals()
    }

    fn density_si(&self) -> f64 {
        self.unit_system.density_to_si(self.density)
    }

    /// True airspeed in m/s, resolving KEAS through the density ratio
    pub fn true_airspeed_mps(&self) -> f64 {
        let v = self.velocity * self.velocity_unit.to_mps();
        match self.velocity_unit {
            VelocityUnit::Keas if self.density_ratio > 0.0 => v / self.density_ratio.sqrt(),
            _ => v,
        }
    }

    /// True airspeed in the velocity unit of the active unit system
    /// (ft/s imperial, m/s metric)
    pub fn velocity_in_system_units(&self) -> f64 {
        self.true_airspeed_mps() / self.unit_system.velocity_unit().to_mps()
    }

    fn resolve_state(&self) -> AtmosphereState {
        let gamma = self.specific_heat_ratio;
        match self.mode {
            FreestreamMode::UsStandard1976 => {
                let altitude_m = self.altitude * self.unit_system.length_unit().to_meters();
                let delta_t_k = self.delta_t * self.temperature_unit.kelvin_per_degree();
                atmosphere::us_standard_1976(altitude_m, delta_t_k, gamma)
            }
            FreestreamMode::ManualPressureDensity => {
                atmosphere::from_pressure_density(self.pressure_pa(), self.density_si(), gamma)
            }
            FreestreamMode::ManualPressureTemperature | FreestreamMode::ManualReL => {
                atmosphere::from_pressure_temperature(self.pressure_pa(), self.temperature_k(), gamma)
            }
            FreestreamMode::ManualDensityTemperature => {
                atmosphere::from_density_temperature(self.density_si(), self.temperature_k(), gamma)
            }
        }
    }

    /// Re-derive all dependent quantities for the active mode.
    ///
    /// `length_unit` is the model length unit; `re_per_length` is expressed
    /// per one of it.
    pub fn update(&mut self, length_unit: LengthUnit) -> DragResult<()> {
        self.validate()?;

        let state = self.resolve_state();
        let system = self.unit_system;

        self.temperature = temperature_from_kelvin(state.temperature_k, self.temperature_unit);
        self.pressure = state.pressure_pa / self.pressure_unit.to_pascals();
        self.density = system.density_from_si(state.density_kg_m3);
        self.density_ratio = state.density_ratio();
        self.dynamic_viscosity = system.viscosity_from_si(state.dynamic_viscosity_pa_s);

        let sys_len_m = system.length_unit().to_meters();
        self.kinematic_viscosity = state.kinematic_viscosity_m2_s() / (sys_len_m * sys_len_m);
        self.sound_speed = state.sound_speed_mps / system.velocity_unit().to_mps();

        if self.mode == FreestreamMode::ManualReL {
            let v_mps = self.mach * state.sound_speed_mps;
            self.velocity = match self.velocity_unit {
                VelocityUnit::Keas => v_mps * self.density_ratio.sqrt() / self.velocity_unit.to_mps(),
                unit => v_mps / unit.to_mps(),
            };
        } else {
            let v_mps = self.true_airspeed_mps();
            self.mach = v_mps / state.sound_speed_mps;
            self.re_per_length = v_mps / state.kinematic_viscosity_m2_s() * length_unit.to_meters();
        }

        debug!(
            mode = ?self.mode,
            mach = self.mach,
            re_per_length = self.re_per_length,
            "flow condition updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_condition() {
        let mut flow = FlowCondition::default();
        flow.update(LengthUnit::Ft).unwrap();
        // 20000 ft standard day is -12.3 °F
        assert!((flow.temperature - (-12.32)).abs() < 0.1);
        assert!((flow.pressure - 972.5).abs() < 1.0);
        assert!((flow.mach - 0.481).abs() < 0.005);
        assert!(flow.re_per_length > 1.0e6 && flow.re_per_length < 3.0e6);
    }

    #[test]
    fn test_re_per_length_scales_with_model_unit() {
        let mut per_ft = FlowCondition::default();
        per_ft.update(LengthUnit::Ft).unwrap();
        let mut per_in = FlowCondition::default();
        per_in.update(LengthUnit::In).unwrap();
        assert!((per_ft.re_per_length / per_in.re_per_length - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_reynolds_consistency() {
        let mut flow = FlowCondition::default();
        flow.update(LengthUnit::Ft).unwrap();
        // v L / nu in system units equals Re/L times L
        let re = flow.velocity_in_system_units() * 10.0 / flow.kinematic_viscosity;
        assert!((re / (flow.re_per_length * 10.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_manual_pressure_temperature_metric() {
        let mut flow = FlowCondition {
            mode: FreestreamMode::ManualPressureTemperature,
            unit_system: UnitSystem::Metric,
            velocity: 100.0,
            velocity_unit: VelocityUnit::MPerS,
            temperature: 288.15,
            temperature_unit: TemperatureUnit::K,
            pressure: 101325.0,
            pressure_unit: PressureUnit::Pa,
            ..FlowCondition::default()
        };
        flow.update(LengthUnit::M).unwrap();
        assert!((flow.density - 1.225).abs() < 1e-3);
        assert!((flow.mach - 100.0 / 340.294).abs() < 1e-4);
        assert!((flow.re_per_length - 6.846e6).abs() < 1e4);
    }

    #[test]
    fn test_manual_rel_keeps_reynolds() {
        let mut flow = FlowCondition {
            mode: FreestreamMode::ManualReL,
            re_per_length: 5.0e6,
            mach: 0.5,
            temperature: 518.67,
            temperature_unit: TemperatureUnit::R,
            ..FlowCondition::default()
        };
        flow.update(LengthUnit::Ft).unwrap();
        assert_eq!(flow.re_per_length, 5.0e6);
        // Mach 0.5 at 518.67 R is about 558 ft/s
        assert!((flow.velocity - 558.2).abs() < 0.5);
    }

    #[test]
    fn test_keas_slower_than_ktas_at_altitude() {
        let mut eas = FlowCondition {
            velocity: 250.0,
            velocity_unit: VelocityUnit::Keas,
            ..FlowCondition::default()
        };
        eas.update(LengthUnit::Ft).unwrap();
        assert!(eas.density_ratio < 1.0);
        let mut tas = FlowCondition {
            velocity: 250.0,
            velocity_unit: VelocityUnit::Ktas,
            ..FlowCondition::default()
        };
        tas.update(LengthUnit::Ft).unwrap();
        assert!(eas.mach > tas.mach);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut flow = FlowCondition {
            altitude: 300000.0,
            ..FlowCondition::default()
        };
        assert!(flow.update(LengthUnit::Ft).is_err());

        let mut flow = FlowCondition {
            mode: FreestreamMode::ManualPressureTemperature,
            temperature: -500.0,
            ..FlowCondition::default()
        };
        let err = flow.update(LengthUnit::Ft).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let mut flow = FlowCondition {
            specific_heat_ratio: f64::NAN,
            ..FlowCondition::default()
        };
        assert!(flow.update(LengthUnit::Ft).is_err());
    }
}
