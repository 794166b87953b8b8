// Per-event bookkeeping. Everything an event accumulates lives in one owned
// `EventRecord` that the worker passes to each callback.
use serde::{Deserialize, Serialize};

use crate::hit::HitsCollection;
use crate::units::{MEV, MM};

/// The generated beam particle. Energy in GeV, transverse position in cm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BeamRecord {
    pub pdg: i32,
    pub energy: f64,
    pub x: f64,
    pub y: f64,
}

/// The primary track as it crossed the energy-flow plane.
/// Energy in MeV, position in mm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PrimaryCrossing {
    pub pdg: i32,
    pub energy: f64,
    pub x: f64,
    pub y: f64,
}

/// Volumes of the last step of the primary track.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PrimaryExit {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Column-wise copy of the event's hits: positions and lengths in mm,
/// momenta and energies in MeV.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HitColumns {
    pub chamber: Vec<i32>,
    pub layer: Vec<i32>,
    pub sublayer: Vec<i32>,
    pub pdg: Vec<i32>,
    pub track_id: Vec<i32>,
    pub parent_id: Vec<i32>,
    pub charge: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub pz: Vec<f64>,
    pub e1: Vec<f64>,
    pub e2: Vec<f64>,
    pub track_length: Vec<f64>,
    pub edep: Vec<f64>,
}

impl HitColumns {
    pub fn len(&self) -> usize {
        self.pdg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pdg.is_empty()
    }

    pub fn extend_from(&mut self, hits: &HitsCollection) {
        for hit in hits {
            self.chamber.push(hit.chamber);
            self.layer.push(hit.layer);
            self.sublayer.push(hit.sublayer);
            self.pdg.push(hit.pdg);
            self.track_id.push(hit.track_id);
            self.parent_id.push(hit.parent_id);
            self.charge.push(hit.charge);
            self.x.push(hit.position[0] / MM);
            self.y.push(hit.position[1] / MM);
            self.z.push(hit.position[2] / MM);
            self.px.push(hit.momentum[0] / MEV);
            self.py.push(hit.momentum[1] / MEV);
            self.pz.push(hit.momentum[2] / MEV);
            self.e1.push(hit.energy_pre / MEV);
            self.e2.push(hit.energy_post / MEV);
            self.track_length.push(hit.track_length / MM);
            self.edep.push(hit.energy_deposit / MEV);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EventRecord {
    pub event_id: u64,
    pub beam: Option<BeamRecord>,
    pub primary: Option<PrimaryCrossing>,
    pub primary_exit: Option<PrimaryExit>,
    pub hits: HitColumns,
}

impl EventRecord {
    pub fn new(event_id: u64) -> Self {
        Self {
            event_id,
            ..Self::default()
        }
    }

    /// Total deposited energy in the emulsion, in MeV.
    pub fn emulsion_deposit(&self) -> f64 {
        self.hits.edep.iter().sum()
    }
}

/// Begin/end-of-event hooks.
#[derive(Debug, Clone, Default)]
pub struct EventAction {
    next_event_id: u64,
}

impl EventAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number events from `first_event_id` on.
    pub fn starting_at(first_event_id: u64) -> Self {
        Self {
            next_event_id: first_event_id,
        }
    }

    /// A cleared record for the next event.
    pub fn begin_of_event(&mut self) -> EventRecord {
        let record = EventRecord::new(self.next_event_id);
        self.next_event_id += 1;
        record
    }

    /// Copy the event's hits into the record's columns.
    pub fn end_of_event(&self, record: &mut EventRecord, hits: &HitsCollection) {
        record.hits.extend_from(hits);
        tracing::trace!(
            event = record.event_id,
            hits = record.hits.len(),
            emulsion_mev = record.emulsion_deposit(),
            "event finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::CalorHit;

    #[test]
    fn test_event_ids_increase() {
        let mut action = EventAction::new();
        assert_eq!(action.begin_of_event().event_id, 0);
        assert_eq!(action.begin_of_event().event_id, 1);

        let mut offset = EventAction::starting_at(250);
        assert_eq!(offset.begin_of_event().event_id, 250);
    }

    #[test]
    fn test_begin_of_event_is_clean() {
        let mut action = EventAction::new();
        let record = action.begin_of_event();
        assert!(record.beam.is_none());
        assert!(record.primary.is_none());
        assert!(record.hits.is_empty());
    }

    #[test]
    fn test_end_of_event_fills_columns() {
        let action = EventAction::new();
        let mut record = EventRecord::new(0);
        let mut hc = HitsCollection::new("EmulsionSD", "EmulsionHitsCollection");
        hc.push(CalorHit {
            chamber: 0,
            layer: 0,
            sublayer: 1,
            pdg: 13,
            track_id: 1,
            position: [1.0, 2.0, 3.0],
            momentum: [0.0, 0.0, 1000.0],
            energy_pre: 1000.0,
            energy_post: 999.9,
            energy_deposit: 0.1,
            track_length: 0.05,
            ..CalorHit::default()
        });
        hc.push(CalorHit {
            pdg: 11,
            energy_deposit: 0.2,
            ..CalorHit::default()
        });
        action.end_of_event(&mut record, &hc);
        assert_eq!(record.hits.len(), 2);
        assert_eq!(record.hits.pdg, vec![13, 11]);
        assert_eq!(record.hits.sublayer, vec![1, -1]);
        assert_eq!(record.hits.z[0], 3.0);
        assert_eq!(record.hits.pz[0], 1000.0);
        assert_eq!(record.hits.track_length[0], 0.05);
        assert!((record.emulsion_deposit() - 0.3).abs() < 1e-12);
    }
}
