// Step records reported by the transport toolkit. Lengths in mm, energies
// and momenta in MeV.
use serde::{Deserialize, Serialize};

use crate::particle::charge_from_pdg;

/// What limited a step at a given step point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The step ended on a volume boundary.
    GeomBoundary,
    /// The step left the world volume.
    WorldBoundary,
    AlongStep,
    PostStep,
    #[default]
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepPoint {
    pub position: [f64; 3],
    pub momentum: [f64; 3],
    pub kinetic_energy: f64,
    /// Logical volume the point lies in; `None` outside the world.
    pub volume: Option<String>,
    pub status: StepStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackInfo {
    pub track_id: i32,
    /// 0 for primaries.
    pub parent_id: i32,
    pub pdg: i32,
    /// Charge in units of e as reported by the toolkit. Derived from the PDG
    /// code when the report leaves it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,
}

impl TrackInfo {
    pub fn is_primary(&self) -> bool {
        self.parent_id == 0
    }

    pub fn charge(&self) -> f64 {
        self.charge.unwrap_or_else(|| charge_from_pdg(self.pdg))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    pub track: TrackInfo,
    pub pre: StepPoint,
    pub post: StepPoint,
    pub energy_deposit: f64,
    pub length: f64,
    /// Process that limited the step, if any.
    pub process: Option<String>,
    /// Replica number of the enclosing layer (touchable depth 1).
    pub replica_number: i32,
    /// Copy number of the pre-step volume.
    pub copy_number: i32,
}

impl Step {
    /// Volume entered at the end of the step, unless the step left the world.
    pub fn next_volume(&self) -> Option<&str> {
        if self.post.status == StepStatus::WorldBoundary {
            return None;
        }
        self.post.volume.as_deref()
    }
}
