// Per-thread simulation state. A worker owns everything it writes to: its
// sampler, its RNG stream, the sensitive detector and the run histograms.
// Workers never share mutable state; their runs are merged afterwards.
use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actions::{SteppingAction, TrackingAction};
use crate::config::Settings;
use crate::detector::CalorimeterSD;
use crate::error::Result;
use crate::event::{BeamRecord, EventAction, EventRecord};
use crate::particle::Particle;
use crate::rng::{StreamRng, DEFAULT_SEED};
use crate::run::{RunAccumulator, RunSummary};
use crate::source::BeamGenerator;
use crate::step::Step;

/// One recorded event from the transport toolkit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayEvent {
    pub beam: Option<BeamRecord>,
    pub steps: Vec<Step>,
}

pub struct Worker {
    id: u64,
    generator: BeamGenerator,
    rng: StreamRng,
    sensitive_volume: String,
    detector: CalorimeterSD,
    stepping: SteppingAction,
    tracking: TrackingAction,
    event_action: EventAction,
    run: RunAccumulator,
    current: EventRecord,
}

impl Worker {
    pub fn new(id: u64, settings: &Settings) -> Result<Self> {
        Self::with_first_event(id, 0, settings)
    }

    /// Worker whose events are numbered from `first_event_id`.
    pub fn with_first_event(id: u64, first_event_id: u64, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let sampler = settings.spectrum.build_sampler()?;
        let det = &settings.detector;
        Ok(Self {
            id,
            generator: BeamGenerator::new(sampler, &settings.beam)?,
            rng: StreamRng::for_stream(settings.seed.unwrap_or(DEFAULT_SEED), id),
            sensitive_volume: det.sensitive_volume.clone(),
            detector: CalorimeterSD::new(&det.name, &det.collection_name, det.layers).with_verbose(det.verbose),
            stepping: SteppingAction::new(&det.flow_from, &det.flow_to),
            tracking: TrackingAction::new(),
            event_action: EventAction::starting_at(first_event_id),
            run: RunAccumulator::begin_run(settings.keep_events),
            current: EventRecord::new(first_event_id),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn generator(&self) -> &BeamGenerator {
        &self.generator
    }

    pub fn current_event(&self) -> &EventRecord {
        &self.current
    }

    pub fn begin_event(&mut self) {
        self.current = self.event_action.begin_of_event();
        self.detector.initialize();
    }

    /// Sample this event's primary from the worker's own stream.
    pub fn generate_primary(&mut self) -> Particle {
        self.generator.generate(&mut self.rng, &mut self.current)
    }

    /// Hand one transport step to the sensitive detector and the stepping
    /// action.
    pub fn process_step(&mut self, step: &Step) -> Result<()> {
        if step.pre.volume.as_deref() == Some(self.sensitive_volume.as_str()) {
            self.detector.process_hits(step)?;
        }
        self.stepping
            .user_stepping_action(step, &mut self.current, self.run.histograms_mut());
        Ok(())
    }

    /// Called with the final step of a track.
    pub fn end_track(&mut self, last_step: &Step) {
        self.tracking.post_user_tracking_action(last_step, &mut self.current);
    }

    pub fn end_event(&mut self) {
        let hits = self.detector.end_of_event();
        self.event_action.end_of_event(&mut self.current, &hits);
        let record = std::mem::take(&mut self.current);
        self.run.end_event(record);
    }

    /// Run one recorded event through the worker.
    pub fn replay_event(&mut self, event: &ReplayEvent) -> Result<()> {
        self.begin_event();
        self.current.beam = event.beam;

        let mut last_step_of: HashMap<i32, usize> = HashMap::new();
        for (index, step) in event.steps.iter().enumerate() {
            last_step_of.insert(step.track.track_id, index);
        }

        for (index, step) in event.steps.iter().enumerate() {
            self.process_step(step)?;
            if last_step_of.get(&step.track.track_id) == Some(&index) {
                self.end_track(step);
            }
        }
        self.end_event();
        Ok(())
    }

    pub fn finish(self) -> RunAccumulator {
        tracing::debug!(worker = self.id, events = self.run.events(), "worker finished");
        self.run
    }
}

/// Events handled by `worker`: `(first_event_id, count)`. The remainder of
/// the division goes to the lowest worker ids.
pub fn event_share(events: usize, workers: usize, worker: usize) -> (u64, usize) {
    let base = events / workers;
    let extra = events % workers;
    let first = worker * base + worker.min(extra);
    let count = base + usize::from(worker < extra);
    (first as u64, count)
}

/// Sample `settings.events` primaries over `settings.workers` parallel
/// workers and merge their runs.
pub fn generate_beam(settings: &Settings) -> Result<RunSummary> {
    settings.validate()?;
    tracing::info!(
        events = settings.events,
        workers = settings.workers,
        seed = settings.seed.unwrap_or(DEFAULT_SEED),
        "generating beam"
    );

    let runs = (0..settings.workers)
        .into_par_iter()
        .map(|worker_id| -> Result<RunAccumulator> {
            let (first, count) = event_share(settings.events, settings.workers, worker_id);
            let mut worker = Worker::with_first_event(worker_id as u64, first, settings)?;
            for _ in 0..count {
                worker.begin_event();
                worker.generate_primary();
                worker.end_event();
            }
            Ok(worker.finish())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(merge_runs(runs, settings.keep_events))
}

/// Drive a single worker through recorded events.
pub fn replay(settings: &Settings, events: &[ReplayEvent]) -> Result<RunSummary> {
    let mut worker = Worker::new(0, settings)?;
    for event in events {
        worker.replay_event(event)?;
    }
    Ok(worker.finish().finish())
}

fn merge_runs(runs: Vec<RunAccumulator>, keep_events: bool) -> RunSummary {
    let mut merged = RunAccumulator::begin_run(keep_events);
    for run in runs {
        merged.merge(run);
    }
    merged.finish()
}
