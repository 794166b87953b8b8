// Internal units of the transport toolkit: lengths in mm, energies in MeV.
// Multiply by a unit to convert into internal units, divide to convert out.

pub const MM: f64 = 1.0;
pub const CM: f64 = 10.0 * MM;
pub const M: f64 = 1000.0 * MM;

pub const MEV: f64 = 1.0;
pub const KEV: f64 = 1.0e-3 * MEV;
pub const EV: f64 = 1.0e-6 * MEV;
pub const GEV: f64 = 1.0e3 * MEV;
pub const TEV: f64 = 1.0e6 * MEV;

/// Format an energy given in internal units with the largest unit that keeps
/// the value >= 1.
pub fn best_energy_unit(energy: f64) -> String {
    const UNITS: [(f64, &str); 5] = [(TEV, "TeV"), (GEV, "GeV"), (MEV, "MeV"), (KEV, "keV"), (EV, "eV")];
    let magnitude = energy.abs();
    for &(unit, symbol) in &UNITS {
        if magnitude >= unit {
            return format!("{:.4} {}", energy / unit, symbol);
        }
    }
    format!("{:.4} eV", energy / EV)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(7.5 * CM, 75.0);
        assert_eq!(2.0 * GEV / MEV, 2000.0);
        assert_eq!(1.0 * M / CM, 100.0);
    }

    #[test]
    fn test_best_energy_unit() {
        assert_eq!(best_energy_unit(1500.0 * GEV), "1.5000 TeV");
        assert_eq!(best_energy_unit(0.25 * MEV), "250.0000 keV");
        assert_eq!(best_energy_unit(3.0 * MEV), "3.0000 MeV");
        assert_eq!(best_energy_unit(0.0), "0.0000 eV");
    }
}
