// Muon beam and emulsion energy-flow bookkeeping for a rock/gap/emulsion
// target simulation. Transport itself is done by an external toolkit; this
// crate samples the primaries and digests the steps it reports.
pub mod actions;
pub mod classify;
pub mod config;
pub mod detector;
pub mod error;
pub mod event;
pub mod histogram;
pub mod hit;
pub mod particle;
pub mod rng;
pub mod run;
pub mod source;
pub mod spectrum;
pub mod step;
pub mod units;
pub mod worker;

pub use actions::{SteppingAction, TrackingAction};
pub use classify::{classify, SpectrumClass};
pub use config::Settings;
pub use detector::CalorimeterSD;
pub use error::{ConfigError, Error, Result};
pub use event::{EventAction, EventRecord};
pub use histogram::{EnergyFlowHistograms, H1};
pub use hit::{CalorHit, HitsCollection};
pub use particle::{Particle, ParticleCategory, ParticleKind};
pub use rng::StreamRng;
pub use run::{RunAccumulator, RunSummary};
pub use source::BeamGenerator;
pub use spectrum::{SampledEvent, SpectrumBinning, SpectrumSampler, MUON_SPECTRUM, SPECTRUM_BINS};
pub use step::{Step, StepPoint, StepStatus, TrackInfo};
pub use worker::{generate_beam, replay, ReplayEvent, Worker};
