use crate::classify::{classify, SpectrumClass};
use crate::event::{EventRecord, PrimaryCrossing, PrimaryExit};
use crate::histogram::EnergyFlowHistograms;
use crate::step::{Step, StepStatus};
use crate::units::GEV;

/// Records the energy flow through one volume boundary.
///
/// Every track that steps from `from` straight into `to` fills the
/// spectrum of its class with its kinetic energy at the crossing.
#[derive(Debug, Clone)]
pub struct SteppingAction {
    from: String,
    to: String,
}

impl SteppingAction {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn crosses_plane(&self, step: &Step) -> bool {
        if step.post.status != StepStatus::GeomBoundary {
            return false;
        }
        step.pre.volume.as_deref() == Some(self.from.as_str()) && step.next_volume() == Some(self.to.as_str())
    }

    /// Returns the class filled, if the step crossed the plane and the
    /// particle is counted.
    pub fn user_stepping_action(
        &self,
        step: &Step,
        event: &mut EventRecord,
        histograms: &mut EnergyFlowHistograms,
    ) -> Option<SpectrumClass> {
        if !self.crosses_plane(step) {
            return None;
        }
        let energy = step.pre.kinetic_energy;
        let class = classify(step.track.parent_id, step.track.pdg)?;
        if class == SpectrumClass::Primary {
            event.primary = Some(PrimaryCrossing {
                pdg: step.track.pdg,
                energy,
                x: step.pre.position[0],
                y: step.pre.position[1],
            });
        }
        histograms.fill(class, energy / GEV);
        Some(class)
    }
}

/// Notes where the primary track ended.
#[derive(Debug, Clone, Default)]
pub struct TrackingAction;

impl TrackingAction {
    pub fn new() -> Self {
        Self
    }

    /// Called with the last step of each finished track.
    pub fn post_user_tracking_action(&self, last_step: &Step, event: &mut EventRecord) {
        if !last_step.track.is_primary() {
            return;
        }
        let exit = PrimaryExit {
            from: last_step.pre.volume.clone(),
            to: last_step.next_volume().map(str::to_string),
        };
        tracing::debug!(
            event = event.event_id,
            from = exit.from.as_deref().unwrap_or(""),
            to = exit.to.as_deref().unwrap_or(""),
            "primary track finished"
        );
        event.primary_exit = Some(exit);
    }
}
