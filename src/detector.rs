use crate::error::{Error, Result};
use crate::hit::{CalorHit, HitsCollection};
use crate::step::{Step, StepStatus};
use crate::units::best_energy_unit;

/// Number of process names listed in the verbose end-of-event summary.
const MAX_LISTED_PROCESSES: usize = 25;

/// Sensitive detector for the emulsion layers.
///
/// The toolkit calls [`CalorimeterSD::process_hits`] for every step inside
/// the sensitive volume. A hit is stored for each step that deposits energy
/// and starts on a volume boundary, i.e. once per track entering a layer.
#[derive(Debug, Clone)]
pub struct CalorimeterSD {
    name: String,
    collection_name: String,
    layers: i32,
    verbose: u8,
    hits: HitsCollection,
}

impl CalorimeterSD {
    pub fn new(name: &str, collection_name: &str, layers: i32) -> Self {
        Self {
            name: name.to_string(),
            collection_name: collection_name.to_string(),
            layers,
            verbose: 0,
            hits: HitsCollection::new(name, collection_name),
        }
    }

    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn layers(&self) -> i32 {
        self.layers
    }

    /// Hits recorded so far in the current event.
    pub fn hits(&self) -> &HitsCollection {
        &self.hits
    }

    /// Start a fresh hits collection for a new event.
    pub fn initialize(&mut self) {
        self.hits = HitsCollection::new(&self.name, &self.collection_name);
    }

    /// Returns `Ok(false)` for steps without an energy deposit and an error
    /// when the step's replica/copy numbers do not address a known layer.
    pub fn process_hits(&mut self, step: &Step) -> Result<bool> {
        let edep = step.energy_deposit;
        if edep == 0.0 {
            return Ok(false);
        }

        let replica = step.replica_number;
        let copy = step.copy_number;
        if replica < 0 || replica >= self.layers || !(0..=1).contains(&copy) {
            return Err(Error::HitLookup { replica, copy });
        }

        if step.pre.status == StepStatus::GeomBoundary {
            self.hits.push(CalorHit {
                chamber: 0,
                layer: replica,
                sublayer: copy,
                pdg: step.track.pdg,
                track_id: step.track.track_id,
                parent_id: step.track.parent_id,
                charge: step.track.charge(),
                position: step.pre.position,
                momentum: step.pre.momentum,
                energy_pre: step.pre.kinetic_energy,
                energy_post: step.post.kinetic_energy,
                energy_deposit: edep,
                track_length: step.length,
                process: step.process.clone().unwrap_or_default(),
            });
        }

        Ok(true)
    }

    /// Hand over the event's hits, leaving an empty collection behind.
    pub fn end_of_event(&mut self) -> HitsCollection {
        if self.verbose > 1 {
            let processes: Vec<&str> = self
                .hits
                .iter()
                .take(MAX_LISTED_PROCESSES)
                .map(|h| h.process.as_str())
                .collect();
            tracing::info!(
                detector = %self.name,
                hits = self.hits.len(),
                edep = %best_energy_unit(self.hits.total_deposit()),
                processes = %processes.join(" "),
                "end of event hits collection"
            );
        }
        std::mem::replace(&mut self.hits, HitsCollection::new(&self.name, &self.collection_name))
    }
}
