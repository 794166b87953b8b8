use serde::Serialize;

use crate::event::EventRecord;
use crate::histogram::EnergyFlowHistograms;

/// Results of a finished run, merged over all workers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub events: u64,
    pub hits: u64,
    pub histograms: EnergyFlowHistograms,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<EventRecord>>,
}

impl RunSummary {
    /// Mean number of emulsion hits per event.
    pub fn hits_per_event(&self) -> f64 {
        if self.events == 0 {
            0.0
        } else {
            self.hits as f64 / self.events as f64
        }
    }
}

/// Per-worker run state: the energy-flow histograms plus event counters.
#[derive(Debug, Clone)]
pub struct RunAccumulator {
    histograms: EnergyFlowHistograms,
    events: u64,
    hits: u64,
    records: Option<Vec<EventRecord>>,
}

impl RunAccumulator {
    /// Book the histograms for a new run.
    pub fn begin_run(keep_events: bool) -> Self {
        Self {
            histograms: EnergyFlowHistograms::book(),
            events: 0,
            hits: 0,
            records: keep_events.then(Vec::new),
        }
    }

    pub fn histograms(&self) -> &EnergyFlowHistograms {
        &self.histograms
    }

    pub fn histograms_mut(&mut self) -> &mut EnergyFlowHistograms {
        &mut self.histograms
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn end_event(&mut self, record: EventRecord) {
        self.events += 1;
        self.hits += record.hits.len() as u64;
        if let Some(records) = self.records.as_mut() {
            records.push(record);
        }
    }

    /// Fold another worker's run into this one. Kept records are appended
    /// in call order.
    pub fn merge(&mut self, other: RunAccumulator) {
        self.histograms.merge(&other.histograms);
        self.events += other.events;
        self.hits += other.hits;
        match (self.records.as_mut(), other.records) {
            (Some(mine), Some(theirs)) => mine.extend(theirs),
            (None, Some(theirs)) => self.records = Some(theirs),
            _ => {}
        }
    }

    pub fn finish(self) -> RunSummary {
        for (_, h) in self.histograms.iter().filter(|(_, h)| h.entries() > 0) {
            tracing::debug!("{}", h);
        }
        tracing::info!(
            events = self.events,
            hits = self.hits,
            crossings = self.histograms.total_entries(),
            "run finished"
        );
        RunSummary {
            events: self.events,
            hits: self.hits,
            histograms: self.histograms,
            records: self.records,
        }
    }
}
