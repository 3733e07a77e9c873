//! # Three-Phase Feeder Calculation
//!
//! Derives circuit-level electrical results for a cable run: total
//! impedance, full-load current, voltage drop, active/reactive power,
//! resistive and dielectric losses, and capacitive charging current.
//!
//! ## Assumptions
//!
//! - Balanced three-phase AC system at nominal frequency
//! - Voltage drop via the standard approximation ΔV = I·(R·cosφ + X·sinφ)
//! - Per-kilometre cable coefficients scale linearly with route length
//!
//! ## Example
//!
//! ```rust
//! use cable_core::calculations::system::{calculate, Arrangement, SystemInput};
//! use cable_core::catalog;
//!
//! let input = SystemInput {
//!     arrangement: Arrangement::TrefoilTouching,
//!     size_mm2: 240,
//!     ..SystemInput::default()
//! };
//! let cable = catalog::find_by_size(input.size_mm2).unwrap();
//!
//! let result = calculate(&input, cable).unwrap();
//! assert!(result.impedance_ohm > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::CableRecord;
use crate::errors::{CableError, CableResult};

/// Physical cable-laying geometry.
///
/// The arrangement selects which per-kilometre resistance/reactance pair
/// of the cable record applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Arrangement {
    /// Three cables in touching trefoil formation
    #[default]
    TrefoilTouching,
    /// Three cables flat, touching
    FlatTouching,
    /// Three cables flat, spaced one diameter apart
    FlatSpaced,
}

impl Arrangement {
    /// All arrangements for UI selection
    pub const ALL: [Arrangement; 3] = [
        Arrangement::TrefoilTouching,
        Arrangement::FlatTouching,
        Arrangement::FlatSpaced,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Arrangement::TrefoilTouching => "Trefoil Touching",
            Arrangement::FlatTouching => "Flat Touching",
            Arrangement::FlatSpaced => "Flat Spaced",
        }
    }
}

impl std::fmt::Display for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Input parameters for a feeder calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "voltage_kv": 33.0,
///   "power_mva": 10.0,
///   "power_factor": 0.95,
///   "length_km": 1.0,
///   "arrangement": "TrefoilTouching",
///   "size_mm2": 240
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemInput {
    /// Line-to-line voltage (kV)
    pub voltage_kv: f64,
    /// Apparent power of the load (MVA)
    pub power_mva: f64,
    /// Load power factor, 0 < pf <= 1
    pub power_factor: f64,
    /// Route length (km)
    pub length_km: f64,
    /// Cable-laying arrangement
    pub arrangement: Arrangement,
    /// Chosen conductor cross-section (mm²)
    pub size_mm2: u32,
}

impl Default for SystemInput {
    fn default() -> Self {
        SystemInput {
            voltage_kv: 33.0,
            power_mva: 10.0,
            power_factor: 0.95,
            length_km: 1.0,
            arrangement: Arrangement::TrefoilTouching,
            size_mm2: 240,
        }
    }
}

impl SystemInput {
    /// Validate input ranges.
    pub fn validate(&self) -> CableResult<()> {
        if self.voltage_kv <= 0.0 {
            return Err(CableError::invalid_input(
                "voltage_kv",
                self.voltage_kv.to_string(),
                "Voltage must be positive",
            ));
        }
        if self.power_mva <= 0.0 {
            return Err(CableError::invalid_input(
                "power_mva",
                self.power_mva.to_string(),
                "Apparent power must be positive",
            ));
        }
        if self.power_factor <= 0.0 || self.power_factor > 1.0 {
            return Err(CableError::invalid_input(
                "power_factor",
                self.power_factor.to_string(),
                "Power factor must be in (0, 1]",
            ));
        }
        if self.length_km <= 0.0 {
            return Err(CableError::invalid_input(
                "length_km",
                self.length_km.to_string(),
                "Length must be positive",
            ));
        }
        Ok(())
    }
}

/// Results from a feeder calculation.
///
/// All totals are for the full route length; losses are three-phase.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemResult {
    /// Total AC resistance (Ω)
    pub resistance_ohm: f64,
    /// Total inductive reactance (Ω)
    pub reactance_ohm: f64,
    /// Total impedance magnitude √(R² + X²) (Ω)
    pub impedance_ohm: f64,
    /// Full-load line current (A)
    pub current_a: f64,
    /// Line-to-line voltage drop (V)
    pub voltage_drop_v: f64,
    /// Voltage drop as a percentage of nominal phase voltage
    pub voltage_drop_pct: f64,
    /// Active power of the load (MW)
    pub active_power_mw: f64,
    /// Reactive power of the load (Mvar)
    pub reactive_power_mvar: f64,
    /// Three-phase resistive losses (kW)
    pub resistive_loss_kw: f64,
    /// Three-phase dielectric losses (kW)
    pub dielectric_loss_kw: f64,
    /// Resistive losses as a percentage of active power
    ///
    /// Dielectric loss is deliberately excluded from the numerator.
    pub loss_pct: f64,
    /// Capacitive charging current (A per phase)
    pub charging_current_a: f64,
}

/// Calculate feeder results for a system configuration and cable record.
///
/// Pure function: identical inputs produce bit-identical outputs. The
/// cable record is looked up by the caller (store or embedded catalog) and
/// passed in; the placeholder "no cable selected" record short-circuits to
/// an all-zero result.
///
/// # Errors
///
/// * `InvalidInput` - a configuration value is out of range
pub fn calculate(input: &SystemInput, cable: &CableRecord) -> CableResult<SystemResult> {
    input.validate()?;

    if cable.is_placeholder() {
        return Ok(SystemResult::default());
    }

    let (r_per_km, x_per_km) = match input.arrangement {
        Arrangement::TrefoilTouching => (
            cable.ac_resistance_trefoil_touching,
            cable.inductive_reactance_trefoil_touching,
        ),
        Arrangement::FlatTouching => (
            cable.ac_resistance_flat_touching,
            cable.inductive_reactance_flat_touching,
        ),
        // No published flat-spaced resistance: at one-diameter spacing the
        // AC resistance is taken as indistinguishable from flat touching.
        Arrangement::FlatSpaced => (
            cable
                .ac_resistance_flat_spaced
                .unwrap_or(cable.ac_resistance_flat_touching),
            cable.inductive_reactance_flat_spaced,
        ),
    };

    let resistance_ohm = r_per_km * input.length_km;
    let reactance_ohm = x_per_km * input.length_km;
    let impedance_ohm = (resistance_ohm * resistance_ohm + reactance_ohm * reactance_ohm).sqrt();

    let sqrt3 = 3.0_f64.sqrt();
    let phase_voltage_v = input.voltage_kv * 1000.0 / sqrt3;
    let current_a = input.power_mva * 1e6 / (sqrt3 * input.voltage_kv * 1000.0);

    // Clamped so pf == 1.0 cannot produce a NaN from floating-point
    // overshoot of 1 - pf².
    let sin_phi = (1.0 - input.power_factor * input.power_factor).max(0.0).sqrt();

    let phase_drop_v =
        current_a * (resistance_ohm * input.power_factor + reactance_ohm * sin_phi);
    let voltage_drop_v = phase_drop_v * sqrt3;
    let voltage_drop_pct = phase_drop_v / phase_voltage_v * 100.0;

    let active_power_mw = input.power_mva * input.power_factor;
    let reactive_power_mvar = input.power_mva * sin_phi;

    let resistive_loss_kw = 3.0 * current_a * current_a * resistance_ohm / 1000.0;
    let dielectric_loss_kw = cable.dielectric_loss_per_phase * input.length_km * 3.0 / 1000.0;
    let loss_pct = resistive_loss_kw / (active_power_mw * 1000.0) * 100.0;

    let charging_current_a = cable.charging_current_per_phase * input.length_km;

    Ok(SystemResult {
        resistance_ohm,
        reactance_ohm,
        impedance_ohm,
        current_a,
        voltage_drop_v,
        voltage_drop_pct,
        active_power_mw,
        reactive_power_mvar,
        resistive_loss_kw,
        dielectric_loss_kw,
        loss_pct,
        charging_current_a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn cable_240() -> CableRecord {
        *catalog::find_by_size(240).unwrap()
    }

    #[test]
    fn test_trefoil_example() {
        // 240 mm², trefoil, 33 kV / 10 MVA / 0.95 / 1 km
        let input = SystemInput::default();
        let result = calculate(&input, &cable_240()).unwrap();

        assert_eq!(result.resistance_ohm, 0.0976);
        assert_eq!(result.reactance_ohm, 0.124);
        assert!((result.impedance_ohm - 0.1578).abs() < 1e-4);
        assert!((result.current_a - 174.95).abs() < 0.01);
        assert!((result.dielectric_loss_kw - 0.309).abs() < 1e-9);
    }

    #[test]
    fn test_flat_spaced_falls_back_to_flat_touching_resistance() {
        let cable = cable_240();
        assert_eq!(cable.ac_resistance_flat_spaced, None);

        let input = SystemInput {
            arrangement: Arrangement::FlatSpaced,
            ..SystemInput::default()
        };
        let result = calculate(&input, &cable).unwrap();

        // Flat-touching resistance (0.0972), not the trefoil value (0.0976)
        assert_eq!(result.resistance_ohm, 0.0972);
        assert_eq!(result.reactance_ohm, 0.185);
    }

    #[test]
    fn test_flat_spaced_uses_published_resistance_when_present() {
        let cable = CableRecord {
            ac_resistance_flat_spaced: Some(0.095),
            ..cable_240()
        };
        let input = SystemInput {
            arrangement: Arrangement::FlatSpaced,
            ..SystemInput::default()
        };
        let result = calculate(&input, &cable).unwrap();
        assert_eq!(result.resistance_ohm, 0.095);
    }

    #[test]
    fn test_placeholder_record_yields_zero_result() {
        let result = calculate(&SystemInput::default(), &CableRecord::default()).unwrap();
        assert_eq!(result, SystemResult::default());
    }

    #[test]
    fn test_unity_power_factor_boundary() {
        let input = SystemInput {
            power_factor: 1.0,
            ..SystemInput::default()
        };
        let result = calculate(&input, &cable_240()).unwrap();

        assert!(result.voltage_drop_v.is_finite());
        assert_eq!(result.reactive_power_mvar, 0.0);
        assert_eq!(result.active_power_mw, input.power_mva);
    }

    #[test]
    fn test_deterministic() {
        let input = SystemInput {
            arrangement: Arrangement::FlatTouching,
            length_km: 3.7,
            ..SystemInput::default()
        };
        let cable = cable_240();
        let first = calculate(&input, &cable).unwrap();
        let second = calculate(&input, &cable).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_length_scales_impedance() {
        let input = SystemInput {
            length_km: 2.0,
            ..SystemInput::default()
        };
        let result = calculate(&input, &cable_240()).unwrap();
        assert_eq!(result.resistance_ohm, 2.0 * 0.0976);
        assert_eq!(result.charging_current_a, 2.0 * 1.35);
    }

    #[test]
    fn test_loss_percentage_excludes_dielectric_loss() {
        let input = SystemInput::default();
        let result = calculate(&input, &cable_240()).unwrap();
        let expected = result.resistive_loss_kw / (result.active_power_mw * 1000.0) * 100.0;
        assert_eq!(result.loss_pct, expected);
    }

    #[test]
    fn test_range_validation() {
        let cable = cable_240();
        let bad = [
            SystemInput {
                voltage_kv: 0.0,
                ..SystemInput::default()
            },
            SystemInput {
                power_mva: -1.0,
                ..SystemInput::default()
            },
            SystemInput {
                power_factor: 0.0,
                ..SystemInput::default()
            },
            SystemInput {
                power_factor: 1.2,
                ..SystemInput::default()
            },
            SystemInput {
                length_km: 0.0,
                ..SystemInput::default()
            },
        ];
        for input in bad {
            let err = calculate(&input, &cable).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
    }
}
