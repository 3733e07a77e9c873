//! Embedded 33 kV XLPE Cable Electrical Data
//!
//! The compiled-in catalog of per-kilometre electrical parameters for
//! single-core 33 kV XLPE cables, one record per conductor cross-section.
//! Resistance and reactance values are at 50 Hz and 90 °C conductor
//! temperature for the three standard laying arrangements.
//!
//! This table is the single source of truth: the persistent store in
//! [`crate::store`] is seeded from it and can always be rebuilt from it.
//! Records are constants, ordered by conductor size ascending, and are
//! never mutated.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Electrical parameters for one conductor cross-section.
///
/// All per-length quantities are per kilometre of route length. The
/// default record is the "no cable selected" placeholder (`size_mm2 == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CableRecord {
    /// Conductor cross-section in mm² - the natural key
    pub size_mm2: u32,

    /// Maximum DC resistance at 20 °C (Ω/km)
    pub max_dc_resistance_20c: f64,
    /// AC resistance at 50 Hz, 90 °C, trefoil touching (Ω/km)
    pub ac_resistance_trefoil_touching: f64,
    /// AC resistance at 50 Hz, 90 °C, flat touching (Ω/km)
    pub ac_resistance_flat_touching: f64,
    /// AC resistance at 50 Hz, 90 °C, flat spaced (Ω/km)
    ///
    /// `None` where the manufacturer publishes no value; the flat-touching
    /// resistance is used in its place (see [`crate::calculations::system`]).
    pub ac_resistance_flat_spaced: Option<f64>,
    /// Inductive reactance at 50 Hz, trefoil touching (Ω/km)
    pub inductive_reactance_trefoil_touching: f64,
    /// Inductive reactance at 50 Hz, flat touching (Ω/km)
    pub inductive_reactance_flat_touching: f64,
    /// Inductive reactance at 50 Hz, flat spaced (Ω/km)
    pub inductive_reactance_flat_spaced: f64,
    /// Insulation resistance at 20 °C (MΩ·km)
    pub insulation_resistance_20c: f64,
    /// Conductor-to-screen capacitance (µF/km)
    pub conductor_to_screen_capacitance: f64,
    /// Charging current per phase (A/km)
    pub charging_current_per_phase: f64,
    /// Dielectric loss per phase (W/km)
    pub dielectric_loss_per_phase: f64,
    /// Maximum dielectric stress (kV/mm)
    pub max_dielectric_stress: f64,
    /// Screen DC resistance at 20 °C (Ω/km)
    pub screen_dc_resistance_20c: f64,
    /// Zero-sequence resistance at 20 °C (Ω/km)
    pub zero_sequence_resistance_20c: f64,
    /// Zero-sequence reactance at 50 Hz (Ω/km)
    pub zero_sequence_reactance_50hz: f64,
}

impl CableRecord {
    /// True for the "no cable selected" placeholder record.
    pub fn is_placeholder(&self) -> bool {
        self.size_mm2 == 0
    }
}

#[allow(clippy::too_many_arguments)]
const fn record(
    size_mm2: u32,
    max_dc: f64,
    ac_trefoil: f64,
    ac_flat: f64,
    ac_spaced: Option<f64>,
    x_trefoil: f64,
    x_flat: f64,
    x_spaced: f64,
    insulation: f64,
    capacitance: f64,
    charging: f64,
    dielectric: f64,
    stress: f64,
    screen_dc: f64,
    z0_r: f64,
    z0_x: f64,
) -> CableRecord {
    CableRecord {
        size_mm2,
        max_dc_resistance_20c: max_dc,
        ac_resistance_trefoil_touching: ac_trefoil,
        ac_resistance_flat_touching: ac_flat,
        ac_resistance_flat_spaced: ac_spaced,
        inductive_reactance_trefoil_touching: x_trefoil,
        inductive_reactance_flat_touching: x_flat,
        inductive_reactance_flat_spaced: x_spaced,
        insulation_resistance_20c: insulation,
        conductor_to_screen_capacitance: capacitance,
        charging_current_per_phase: charging,
        dielectric_loss_per_phase: dielectric,
        max_dielectric_stress: stress,
        screen_dc_resistance_20c: screen_dc,
        zero_sequence_resistance_20c: z0_r,
        zero_sequence_reactance_50hz: z0_x,
    }
}

// Columns: size, R_dc, R_ac tre/flat/spaced, X tre/flat/spaced, R_ins, C,
// I_c, W_d, E_max, R_screen, R0, X0 (manufacturer data sheet order).
#[rustfmt::skip]
static CATALOG: Lazy<Vec<CableRecord>> = Lazy::new(|| vec![
    record(  50, 0.387,  0.494,  0.494,  None, 0.163,  0.178, 0.224, 18000.0, 0.133, 0.796,  60.5, 4.05, 0.372, 0.759, 0.0999),
    record(  70, 0.268,  0.342,  0.342,  None, 0.154,  0.169, 0.215, 16000.0, 0.148, 0.883,  67.1, 3.82, 0.263, 0.531, 0.0919),
    record(  95, 0.193,  0.247,  0.247,  None, 0.143,  0.158, 0.204, 15000.0, 0.165, 0.984,  74.8, 3.61, 0.263, 0.457, 0.0817),
    record( 120, 0.153,  0.195,  0.195,  None, 0.137,  0.153, 0.198, 14000.0, 0.179, 1.07,   81.1, 3.48, 0.263, 0.416, 0.0767),
    record( 150, 0.124,  0.159,  0.159,  None, 0.133,  0.148, 0.194, 13000.0, 0.191, 1.14,   86.8, 3.38, 0.264, 0.369, 0.0731),
    record( 185, 0.0991, 0.127,  0.127,  None, 0.129,  0.144, 0.190, 12000.0, 0.205, 1.23,   93.2, 3.29, 0.264, 0.364, 0.0693),
    record( 240, 0.0754, 0.0976, 0.0972, None, 0.124,  0.139, 0.185, 11000.0, 0.227, 1.35,  103.0, 3.17, 0.263, 0.340, 0.0645),
    record( 300, 0.0601, 0.0786, 0.0779, None, 0.120,  0.135, 0.181,  9800.0, 0.247, 1.48,  112.0, 3.09, 0.264, 0.325, 0.0612),
    record( 400, 0.0470, 0.0625, 0.0616, None, 0.115,  0.130, 0.176,  8900.0, 0.272, 1.62,  123.0, 3.00, 0.263, 0.312, 0.0564),
    record( 500, 0.0366, 0.0499, 0.0487, None, 0.111,  0.126, 0.172,  8100.0, 0.297, 1.77,  135.0, 2.93, 0.263, 0.302, 0.0531),
    record( 630, 0.0283, 0.0403, 0.0387, None, 0.108,  0.123, 0.169,  7300.0, 0.329, 1.96,  149.0, 2.86, 0.263, 0.294, 0.0504),
    record( 800, 0.0221, 0.0336, 0.0315, None, 0.102,  0.117, 0.163,  6300.0, 0.381, 2.27,  173.0, 2.78, 0.263, 0.289, 0.0452),
    record(1000, 0.0182, 0.0245, 0.0240, None, 0.100,  0.115, 0.161,  5600.0, 0.427, 2.55,  194.0, 2.72, 0.263, 0.282, 0.0441),
    record(1200, 0.0150, 0.0207, 0.0201, None, 0.0984, 0.114, 0.159,  5200.0, 0.461, 2.75,  209.0, 2.68, 0.263, 0.279, 0.0426),
]);

/// The embedded catalog, ordered by conductor size ascending.
pub fn catalog() -> &'static [CableRecord] {
    &CATALOG
}

/// Exact-match lookup by conductor size.
pub fn find_by_size(size_mm2: u32) -> Option<&'static CableRecord> {
    CATALOG.iter().find(|r| r.size_mm2 == size_mm2)
}

/// Ascending list of the conductor sizes present in the catalog.
pub fn available_sizes() -> Vec<u32> {
    CATALOG.iter().map(|r| r.size_mm2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_unique_and_ascending() {
        let sizes = available_sizes();
        assert!(!sizes.is_empty());
        for pair in sizes.windows(2) {
            assert!(pair[0] < pair[1], "catalog must be strictly ascending");
        }
    }

    #[test]
    fn test_find_by_size() {
        let cable = find_by_size(240).expect("240 mm2 is in the catalog");
        assert_eq!(cable.ac_resistance_trefoil_touching, 0.0976);
        assert_eq!(cable.inductive_reactance_trefoil_touching, 0.124);
        assert!(find_by_size(241).is_none());
    }

    #[test]
    fn test_mandatory_coefficients_non_negative() {
        for cable in catalog() {
            assert!(cable.max_dc_resistance_20c >= 0.0);
            assert!(cable.ac_resistance_trefoil_touching >= 0.0);
            assert!(cable.ac_resistance_flat_touching >= 0.0);
            assert!(cable.inductive_reactance_trefoil_touching >= 0.0);
            assert!(cable.inductive_reactance_flat_touching >= 0.0);
            assert!(cable.inductive_reactance_flat_spaced >= 0.0);
            assert!(cable.dielectric_loss_per_phase >= 0.0);
            assert!(cable.charging_current_per_phase >= 0.0);
        }
    }

    #[test]
    fn test_placeholder_record() {
        let placeholder = CableRecord::default();
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.ac_resistance_flat_spaced, None);
        assert!(!find_by_size(240).unwrap().is_placeholder());
    }
}
