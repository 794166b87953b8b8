use std::fmt;

use serde::Serialize;

use crate::units::{best_energy_unit, MM};

/// One boundary-entry energy deposit in an emulsion layer.
///
/// Positions in mm, momenta and energies in MeV. `chamber`, `layer` and
/// `sublayer` are -1 until the sensitive detector assigns them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorHit {
    pub chamber: i32,
    pub layer: i32,
    pub sublayer: i32,
    pub pdg: i32,
    pub track_id: i32,
    pub parent_id: i32,
    pub charge: f64,
    pub position: [f64; 3],
    pub momentum: [f64; 3],
    /// Kinetic energy at the pre-step point.
    pub energy_pre: f64,
    /// Kinetic energy at the post-step point.
    pub energy_post: f64,
    pub energy_deposit: f64,
    pub track_length: f64,
    pub process: String,
}

impl Default for CalorHit {
    fn default() -> Self {
        Self {
            chamber: -1,
            layer: -1,
            sublayer: -1,
            pdg: 0,
            track_id: 0,
            parent_id: 0,
            charge: 0.0,
            position: [0.0; 3],
            momentum: [0.0; 3],
            energy_pre: 0.0,
            energy_post: 0.0,
            energy_deposit: 0.0,
            track_length: 0.0,
            process: String::new(),
        }
    }
}

impl fmt::Display for CalorHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PDGID: {:>5} Cham,IDZ,IDZsub,X,Y: {:>1} {:>3} {:>1} {:>6} {:>6}, Edep: {:>7}",
            self.pdg,
            self.chamber,
            self.layer,
            self.sublayer,
            self.position[0] / MM,
            self.position[1] / MM,
            best_energy_unit(self.energy_deposit)
        )
    }
}

/// Hits recorded by one sensitive detector during one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HitsCollection {
    pub detector_name: String,
    pub collection_name: String,
    hits: Vec<CalorHit>,
}

impl HitsCollection {
    pub fn new(detector_name: &str, collection_name: &str) -> Self {
        Self {
            detector_name: detector_name.to_string(),
            collection_name: collection_name.to_string(),
            hits: Vec::new(),
        }
    }

    pub fn push(&mut self, hit: CalorHit) {
        self.hits.push(hit);
    }

    pub fn get(&self, index: usize) -> Option<&CalorHit> {
        self.hits.get(index)
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CalorHit> {
        self.hits.iter()
    }

    /// Sum of energy deposits over all hits.
    pub fn total_deposit(&self) -> f64 {
        self.hits.iter().map(|h| h.energy_deposit).sum()
    }
}

impl<'a> IntoIterator for &'a HitsCollection {
    type Item = &'a CalorHit;
    type IntoIter = std::slice::Iter<'a, CalorHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::KEV;

    #[test]
    fn test_default_hit_is_unassigned() {
        let hit = CalorHit::default();
        assert_eq!((hit.chamber, hit.layer, hit.sublayer), (-1, -1, -1));
        assert_eq!(hit.energy_deposit, 0.0);
        assert!(hit.process.is_empty());
    }

    #[test]
    fn test_hit_display() {
        let hit = CalorHit {
            chamber: 0,
            layer: 0,
            sublayer: 1,
            pdg: 13,
            position: [1.5, -2.0, 0.0],
            energy_deposit: 12.0 * KEV,
            ..CalorHit::default()
        };
        let line = hit.to_string();
        assert!(line.starts_with("PDGID:    13 "));
        assert!(line.contains("0   0 1"));
        assert!(line.ends_with("Edep: 12.0000 keV"));
    }

    #[test]
    fn test_collection_basic() {
        let mut hc = HitsCollection::new("EmulsionSD", "EmulsionHitsCollection");
        assert!(hc.is_empty());
        hc.push(CalorHit {
            energy_deposit: 0.5,
            ..CalorHit::default()
        });
        hc.push(CalorHit {
            energy_deposit: 0.25,
            track_id: 2,
            ..CalorHit::default()
        });
        assert_eq!(hc.len(), 2);
        assert_eq!(hc.get(1).map(|h| h.track_id), Some(2));
        assert!(hc.get(2).is_none());
        assert_eq!(hc.total_deposit(), 0.75);
        assert_eq!((&hc).into_iter().count(), 2);
    }
}
