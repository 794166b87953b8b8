use std::fmt;

use serde::Serialize;

use crate::classify::SpectrumClass;

/// One-dimensional histogram with uniform binning over `[min, max)`.
///
/// Moments (`mean`, `rms`) use in-range fills only; `entries` counts every
/// fill including under- and overflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct H1 {
    pub name: String,
    pub title: String,
    pub min: f64,
    pub max: f64,
    counts: Vec<f64>,
    underflow: f64,
    overflow: f64,
    entries: u64,
    sum_w: f64,
    sum_wx: f64,
    sum_wx2: f64,
}

impl H1 {
    /// # Panics
    /// Panics if `bins` is zero or the range is empty or not finite.
    pub fn new(name: &str, title: &str, bins: usize, min: f64, max: f64) -> Self {
        if bins == 0 {
            panic!("H1 '{}' requires at least 1 bin", name);
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            panic!("H1 '{}' range must be finite and ascending, got [{}, {})", name, min, max);
        }
        Self {
            name: name.to_string(),
            title: title.to_string(),
            min,
            max,
            counts: vec![0.0; bins],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
            sum_w: 0.0,
            sum_wx: 0.0,
            sum_wx2: 0.0,
        }
    }

    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Bin index for `x`, or `None` outside `[min, max)`.
    pub fn bin_for(&self, x: f64) -> Option<usize> {
        if !(x >= self.min && x < self.max) {
            return None;
        }
        let index = ((x - self.min) / self.bin_width()) as usize;
        Some(index.min(self.counts.len() - 1))
    }

    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.0);
    }

    pub fn fill_weighted(&mut self, x: f64, weight: f64) {
        self.entries += 1;
        match self.bin_for(x) {
            Some(bin) => {
                self.counts[bin] += weight;
                self.sum_w += weight;
                self.sum_wx += weight * x;
                self.sum_wx2 += weight * x * x;
            }
            None if x < self.min => self.underflow += weight,
            // NaN goes to overflow
            None => self.overflow += weight,
        }
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Sum of in-range weights.
    pub fn integral(&self) -> f64 {
        self.sum_w
    }

    pub fn mean(&self) -> f64 {
        if self.sum_w == 0.0 {
            0.0
        } else {
            self.sum_wx / self.sum_w
        }
    }

    pub fn rms(&self) -> f64 {
        if self.sum_w == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_wx2 / self.sum_w - mean * mean).max(0.0).sqrt()
    }

    /// Add another histogram's contents bin by bin.
    ///
    /// # Panics
    /// Panics if the two histograms are not booked identically.
    pub fn merge(&mut self, other: &H1) {
        if self.counts.len() != other.counts.len() || self.min != other.min || self.max != other.max {
            panic!("cannot merge H1 '{}' with differently booked '{}'", self.name, other.name);
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        self.sum_w += other.sum_w;
        self.sum_wx += other.sum_wx;
        self.sum_wx2 += other.sum_wx2;
    }
}

impl fmt::Display for H1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Histogram {}: {}", self.name, self.title)?;
        writeln!(f, "  Entries: {}", self.entries)?;
        writeln!(f, "  Mean: {:.6}", self.mean())?;
        writeln!(f, "  RMS: {:.6}", self.rms())?;
        write!(f, "  Underflow: {} Overflow: {}", self.underflow, self.overflow)
    }
}

/// The 28 energy-flow spectra, energies in GeV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyFlowHistograms {
    histograms: Vec<H1>,
}

impl EnergyFlowHistograms {
    /// Book h1..h28: the primary spectrum over the beam range, photons over
    /// [0, 200) GeV and every other species over [0, 500) GeV.
    pub fn book() -> Self {
        let histograms = SpectrumClass::ALL
            .iter()
            .map(|&class| {
                let name = format!("h{}", class.id());
                let (bins, min, max) = match class {
                    SpectrumClass::Primary => (400, 110.0, 4110.0),
                    SpectrumClass::Gamma => (200, 0.0, 200.0),
                    _ => (500, 0.0, 500.0),
                };
                H1::new(&name, class.title(), bins, min, max)
            })
            .collect();
        Self { histograms }
    }

    pub fn get(&self, class: SpectrumClass) -> &H1 {
        &self.histograms[class.id() - 1]
    }

    pub fn fill(&mut self, class: SpectrumClass, energy_gev: f64) {
        self.histograms[class.id() - 1].fill(energy_gev);
    }

    pub fn merge(&mut self, other: &EnergyFlowHistograms) {
        for (a, b) in self.histograms.iter_mut().zip(&other.histograms) {
            a.merge(b);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpectrumClass, &H1)> {
        SpectrumClass::ALL.iter().copied().zip(self.histograms.iter())
    }

    pub fn total_entries(&self) -> u64 {
        self.histograms.iter().map(H1::entries).sum()
    }
}

impl Default for EnergyFlowHistograms {
    fn default() -> Self {
        Self::book()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h1_creation() {
        let h = H1::new("h5", "neutrons", 500, 0.0, 500.0);
        assert_eq!(h.num_bins(), 500);
        assert_eq!(h.bin_width(), 1.0);
        assert_eq!(h.entries(), 0);
    }

    #[test]
    #[should_panic(expected = "requires at least 1 bin")]
    fn test_h1_zero_bins() {
        H1::new("h", "t", 0, 0.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "range must be finite and ascending")]
    fn test_h1_reversed_range() {
        H1::new("h", "t", 10, 1.0, 0.0);
    }

    #[test]
    fn test_h1_bin_lookup() {
        let h = H1::new("h1", "primary", 400, 110.0, 4110.0);
        assert_eq!(h.bin_for(110.0), Some(0));
        assert_eq!(h.bin_for(119.999), Some(0));
        assert_eq!(h.bin_for(120.0), Some(1));
        assert_eq!(h.bin_for(4109.999), Some(399));
        assert_eq!(h.bin_for(4110.0), None);
        assert_eq!(h.bin_for(100.0), None);
        assert_eq!(h.bin_for(f64::NAN), None);
    }

    #[test]
    fn test_h1_fill_and_moments() {
        let mut h = H1::new("h", "t", 10, 0.0, 10.0);
        h.fill(2.5);
        h.fill(4.5);
        h.fill(-1.0);
        h.fill(10.0);
        h.fill_weighted(2.0, 2.0);
        assert_eq!(h.entries(), 5);
        assert_eq!(h.underflow(), 1.0);
        assert_eq!(h.overflow(), 1.0);
        assert_eq!(h.counts()[2], 3.0);
        assert_eq!(h.counts()[4], 1.0);
        assert_eq!(h.integral(), 4.0);
        assert!((h.mean() - 2.75).abs() < 1e-12);
        // (2.5^2 + 4.5^2 + 2*4)/4 - 2.75^2
        let expected_rms = ((6.25 + 20.25 + 8.0) / 4.0 - 2.75f64 * 2.75).sqrt();
        assert!((h.rms() - expected_rms).abs() < 1e-12);
    }

    #[test]
    fn test_h1_empty_moments() {
        let h = H1::new("h", "t", 10, 0.0, 10.0);
        assert_eq!(h.mean(), 0.0);
        assert_eq!(h.rms(), 0.0);
    }

    #[test]
    fn test_h1_merge() {
        let mut a = H1::new("h", "t", 10, 0.0, 10.0);
        let mut b = H1::new("h", "t", 10, 0.0, 10.0);
        a.fill(1.5);
        b.fill(1.5);
        b.fill(8.5);
        b.fill(20.0);
        a.merge(&b);
        assert_eq!(a.entries(), 4);
        assert_eq!(a.counts()[1], 2.0);
        assert_eq!(a.counts()[8], 1.0);
        assert_eq!(a.overflow(), 1.0);
    }

    #[test]
    #[should_panic(expected = "cannot merge")]
    fn test_h1_merge_mismatch() {
        let mut a = H1::new("a", "t", 10, 0.0, 10.0);
        let b = H1::new("b", "t", 20, 0.0, 10.0);
        a.merge(&b);
    }

    #[test]
    fn test_h1_display() {
        let mut h = H1::new("h3", "Gamma spectrum", 10, 0.0, 10.0);
        h.fill(2.0);
        h.fill(4.0);
        h.fill(-1.0);
        let text = h.to_string();
        assert!(text.starts_with("Histogram h3: Gamma spectrum\n"));
        assert!(text.contains("  Entries: 3\n"));
        assert!(text.contains("  Mean: 3.000000\n"));
        assert!(text.ends_with("  Underflow: 1 Overflow: 0"));
    }

    #[test]
    fn test_energy_flow_booking() {
        let set = EnergyFlowHistograms::book();
        assert_eq!(set.iter().count(), 28);
        let primary = set.get(SpectrumClass::Primary);
        assert_eq!(primary.name, "h1");
        assert_eq!((primary.num_bins(), primary.min, primary.max), (400, 110.0, 4110.0));
        let gamma = set.get(SpectrumClass::Gamma);
        assert_eq!((gamma.num_bins(), gamma.min, gamma.max), (200, 0.0, 200.0));
        let other = set.get(SpectrumClass::OtherLepton);
        assert_eq!(other.name, "h28");
        assert_eq!((other.num_bins(), other.min, other.max), (500, 0.0, 500.0));
    }

    #[test]
    fn test_energy_flow_fill_and_merge() {
        let mut a = EnergyFlowHistograms::book();
        let mut b = EnergyFlowHistograms::book();
        a.fill(SpectrumClass::Muon, 42.0);
        b.fill(SpectrumClass::Muon, 43.0);
        b.fill(SpectrumClass::Gamma, 1.0);
        a.merge(&b);
        assert_eq!(a.get(SpectrumClass::Muon).entries(), 2);
        assert_eq!(a.get(SpectrumClass::Gamma).entries(), 1);
        assert_eq!(a.total_entries(), 3);
    }
}
