use rand::Rng;

use crate::config::BeamSettings;
use crate::error::ConfigError;
use crate::event::{BeamRecord, EventRecord};
use crate::particle::{Particle, ParticleKind};
use crate::spectrum::{SampledEvent, SpectrumSampler};
use crate::units::{CM, GEV};

/// Muon beam entering the rock face along +z.
///
/// Each event gets an energy from the spectrum sampler and a uniform
/// transverse position inside the beam spot; the primary starts on the
/// upstream face of the world.
#[derive(Debug, Clone)]
pub struct BeamGenerator {
    pub sampler: SpectrumSampler,
    pub particle: ParticleKind,
    pub x_half_width: f64,
    pub y_half_width: f64,
    pub world_half_z: Option<f64>,
}

impl BeamGenerator {
    pub fn new(sampler: SpectrumSampler, beam: &BeamSettings) -> Result<Self, ConfigError> {
        let particle = beam.particle_kind()?;
        if beam.world_half_z.is_none() {
            tracing::warn!("world half-length not set, the beam will start at the world centre");
        }
        Ok(Self {
            sampler,
            particle,
            x_half_width: beam.x_half_width,
            y_half_width: beam.y_half_width,
            world_half_z: beam.world_half_z,
        })
    }

    pub fn start_z(&self) -> f64 {
        self.world_half_z.map_or(0.0, |half| -half)
    }

    /// Turn one beam draw into a primary particle in toolkit units.
    pub fn primary_for(&self, draw: &SampledEvent) -> Particle {
        Particle::new(
            self.particle,
            [draw.x * CM, draw.y * CM, self.start_z()],
            [0.0, 0.0, 1.0],
            draw.energy * GEV,
        )
    }

    /// Sample the event's primary and note the beam parameters on the event.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, event: &mut EventRecord) -> Particle {
        let draw = self
            .sampler
            .sample_event(rng, self.x_half_width, self.y_half_width);
        event.beam = Some(BeamRecord {
            pdg: self.particle.pdg_code(),
            energy: draw.energy,
            x: draw.x,
            y: draw.y,
        });
        self.primary_for(&draw)
    }
}
