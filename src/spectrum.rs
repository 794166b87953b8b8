use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of energy bins in a beam spectrum table.
pub const SPECTRUM_BINS: usize = 80;

/// Relative muon rate per 50 GeV bin at the rock face, lowest bin first.
pub const MUON_SPECTRUM: [f64; SPECTRUM_BINS] = [
    2.26737490143638E-13, 1.50857611716220E-13, 9.39261858919731E-14, 5.84739207638017E-14,
    3.24571040230013E-14, 2.21104873511029E-14, 1.74440788666807E-14, 1.13615038968873E-14,
    1.91376476103987E-14, 1.15572681715077E-14, 7.08157341925533E-15, 5.76416620948928E-15,
    7.81623154711213E-15, 6.56754136726407E-15, 9.16825328611326E-15, 9.76938614058058E-15,
    9.18127643556841E-15, 1.33602764458908E-14, 1.17961528918552E-14, 1.60210373809235E-14,
    1.87954543243886E-14, 2.09410212445005E-14, 1.88130671961507E-14, 1.39192548034658E-14,
    1.14311556205024E-14, 1.30576528682980E-14, 7.99847015869422E-15, 8.28721827849399E-15,
    8.20053542430517E-15, 8.50771102461677E-15, 5.55066657512325E-15, 6.32841540658163E-15,
    3.65932255258140E-15, 4.73664423730078E-15, 2.87956818442589E-15, 2.38836106830032E-15,
    3.91517917503873E-15, 2.14509513316961E-15, 2.12635229162121E-15, 2.12444480825151E-15,
    1.55989332342560E-15, 1.66292857492464E-15, 1.62162209852412E-15, 2.51204734702591E-15,
    2.98771625146124E-15, 1.98064518639804E-15, 1.30185775911172E-15, 1.06588489637830E-15,
    1.30072623716252E-15, 1.95825349026024E-15, 1.82974778894870E-15, 1.75743260276838E-15,
    7.85581568133859E-16, 8.91558493721251E-16, 4.99882857190907E-16, 5.11922992775425E-16,
    5.82075402896300E-16, 5.63767765090528E-16, 1.30568419050939E-15, 3.48866039521030E-16,
    1.28705004775493E-15, 3.03361773496548E-16, 1.55472908916981E-16, 1.50737952570158E-16,
    2.27297875437635E-16, 1.42200831326507E-16, 7.58404433741371E-17, 1.19773883004941E-16,
    2.84401662653014E-17, 6.06723546993097E-17, 1.89601108435342E-17, 1.32720775904740E-17,
    1.89601108435342E-17, 5.68803325306028E-17, 0.0, 1.89601108435342E-17,
    3.79202216870685E-17, 1.89601108435342E-17, 1.89601108435342E-17, 0.0,
];

/// Energy layout of the spectrum bins: bin `k` covers
/// `[offset + k*width, offset + (k+1)*width)`, in GeV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumBinning {
    pub offset: f64,
    pub width: f64,
}

impl SpectrumBinning {
    /// Rejects non-finite edges and non-positive widths.
    pub fn new(offset: f64, width: f64) -> Result<Self, ConfigError> {
        if !offset.is_finite() || !width.is_finite() || width <= 0.0 {
            return Err(ConfigError::InvalidBinning { offset, width });
        }
        Ok(Self { offset, width })
    }

    /// Lower edge of `bin`, in GeV.
    pub fn low_edge(&self, bin: usize) -> f64 {
        self.offset + self.width * bin as f64
    }

    /// Upper edge of `bin`, in GeV. Not itself part of the bin.
    pub fn high_edge(&self, bin: usize) -> f64 {
        self.low_edge(bin) + self.width
    }

    /// Upper edge of the last bin.
    pub fn max_energy(&self) -> f64 {
        self.low_edge(SPECTRUM_BINS)
    }
}

impl Default for SpectrumBinning {
    fn default() -> Self {
        Self {
            offset: 100.0,
            width: 50.0,
        }
    }
}

/// One beam draw: energy in GeV and transverse position in cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampledEvent {
    pub energy: f64,
    pub x: f64,
    pub y: f64,
}

/// Piecewise-uniform energy sampler over a fixed 80-bin relative-rate table.
///
/// A bin is chosen by inverse-CDF lookup of one uniform draw, then the
/// energy is spread uniformly inside that bin with a second draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSampler {
    weights: [f64; SPECTRUM_BINS],
    cumulative: [f64; SPECTRUM_BINS],
    binning: SpectrumBinning,
}

impl SpectrumSampler {
    /// Build a sampler from 80 non-negative weights with the default binning.
    pub fn new(weights: &[f64]) -> Result<Self, ConfigError> {
        Self::with_binning(weights, SpectrumBinning::default())
    }

    /// Build a sampler with explicit bin edges.
    ///
    /// `weights` must hold exactly 80 finite, non-negative values with a
    /// positive sum. They are normalized into a cumulative table whose last
    /// entry is exactly 1.
    pub fn with_binning(weights: &[f64], binning: SpectrumBinning) -> Result<Self, ConfigError> {
        let binning = SpectrumBinning::new(binning.offset, binning.width)?;
        let table: [f64; SPECTRUM_BINS] = weights.try_into().map_err(|_| ConfigError::WrongTableLength {
            expected: SPECTRUM_BINS,
            actual: weights.len(),
        })?;
        if let Some((index, &value)) = table
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ConfigError::InvalidWeight { index, value });
        }
        let total: f64 = table.iter().sum();
        if total <= 0.0 {
            return Err(ConfigError::DegenerateTable);
        }
        Ok(Self::build(table, total, binning))
    }

    fn build(weights: [f64; SPECTRUM_BINS], total: f64, binning: SpectrumBinning) -> Self {
        let mut cumulative = [0.0; SPECTRUM_BINS];
        let mut running = 0.0;
        for (c, w) in cumulative.iter_mut().zip(weights.iter()) {
            running += w;
            *c = running / total;
        }
        // summation error must not leave a gap above the last entry
        cumulative[SPECTRUM_BINS - 1] = 1.0;
        Self {
            weights,
            cumulative,
            binning,
        }
    }

    pub fn binning(&self) -> SpectrumBinning {
        self.binning
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Normalized probability of `bin`.
    pub fn probability(&self, bin: usize) -> f64 {
        match bin {
            0 => self.cumulative[0],
            b if b < SPECTRUM_BINS => self.cumulative[b] - self.cumulative[b - 1],
            _ => 0.0,
        }
    }

    /// `[low, high)` energy range of `bin`, in GeV.
    pub fn bin_range(&self, bin: usize) -> (f64, f64) {
        (self.binning.low_edge(bin), self.binning.high_edge(bin))
    }

    /// Smallest bin index whose cumulative probability is >= `u`.
    pub fn bin_for(&self, u: f64) -> usize {
        self.cumulative
            .partition_point(|&c| c < u)
            .min(SPECTRUM_BINS - 1)
    }

    /// Energy for a bin draw `u` and an in-bin draw `v`, both in [0, 1).
    pub fn energy_for(&self, u: f64, v: f64) -> f64 {
        let (low, high) = self.bin_range(self.bin_for(u));
        let energy = low + (high - low) * v;
        if energy < high {
            energy
        } else {
            // v close to 1 can round up onto the upper edge
            next_down(high)
        }
    }

    /// Draw one beam energy in GeV. Consumes two uniforms: the bin, then the
    /// position inside it.
    pub fn sample_energy<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        let v: f64 = rng.gen();
        self.energy_for(u, v)
    }

    /// Draw an energy, then a transverse position in `[-x_half, x_half)` by
    /// `[-y_half, y_half)` cm, in that order.
    pub fn sample_event<R: Rng + ?Sized>(&self, rng: &mut R, x_half: f64, y_half: f64) -> SampledEvent {
        let energy = self.sample_energy(rng);
        let (x, y) = sample_transverse(rng, x_half, y_half);
        SampledEvent { energy, x, y }
    }
}

impl Default for SpectrumSampler {
    /// The built-in muon spectrum with 50 GeV bins starting at 100 GeV.
    fn default() -> Self {
        let total = MUON_SPECTRUM.iter().sum();
        Self::build(MUON_SPECTRUM, total, SpectrumBinning::default())
    }
}

/// Independent uniform draws in `[-x_half, x_half)` and `[-y_half, y_half)`.
pub fn sample_transverse<R: Rng + ?Sized>(rng: &mut R, x_half: f64, y_half: f64) -> (f64, f64) {
    let u: f64 = rng.gen();
    let v: f64 = rng.gen();
    (x_half * (2.0 * u - 1.0), y_half * (2.0 * v - 1.0))
}

// Largest f64 strictly below a positive finite `x`.
fn next_down(x: f64) -> f64 {
    if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else if x == 0.0 {
        -f64::from_bits(1)
    } else {
        f64::from_bits(x.to_bits() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flat() -> SpectrumSampler {
        SpectrumSampler::new(&[1.0; SPECTRUM_BINS]).unwrap()
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = SpectrumSampler::new(&[1.0; 79]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::WrongTableLength {
                expected: 80,
                actual: 79
            }
        );
    }

    #[test]
    fn test_rejects_all_zero() {
        let err = SpectrumSampler::new(&[0.0; SPECTRUM_BINS]).unwrap_err();
        assert_eq!(err, ConfigError::DegenerateTable);
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let mut weights = [1.0; SPECTRUM_BINS];
        weights[5] = -0.5;
        assert_eq!(
            SpectrumSampler::new(&weights).unwrap_err(),
            ConfigError::InvalidWeight { index: 5, value: -0.5 }
        );
        weights[5] = 1.0;
        weights[9] = f64::NAN;
        assert!(matches!(
            SpectrumSampler::new(&weights),
            Err(ConfigError::InvalidWeight { index: 9, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_binning() {
        let err = SpectrumSampler::with_binning(&MUON_SPECTRUM, SpectrumBinning { offset: 0.0, width: 0.0 })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBinning { .. }));
    }

    #[test]
    fn test_cumulative_is_monotone_and_normalized() {
        let sampler = SpectrumSampler::default();
        let cdf = sampler.cumulative();
        assert_eq!(cdf.len(), SPECTRUM_BINS);
        for pair in cdf.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert_eq!(cdf[SPECTRUM_BINS - 1], 1.0);
        let total: f64 = (0..SPECTRUM_BINS).map(|b| sampler.probability(b)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_matches_validated_constructor() {
        assert_eq!(SpectrumSampler::default(), SpectrumSampler::new(&MUON_SPECTRUM).unwrap());
    }

    #[test]
    fn test_bin_ranges() {
        let sampler = SpectrumSampler::default();
        assert_eq!(sampler.bin_range(0), (100.0, 150.0));
        assert_eq!(sampler.bin_range(79), (4050.0, 4100.0));
        assert_eq!(sampler.binning().max_energy(), 4100.0);
    }

    #[test]
    fn test_boundary_draws() {
        let sampler = flat();
        assert_eq!(sampler.bin_for(0.0), 0);
        assert_eq!(sampler.bin_for(1.0), 79);
        assert_eq!(sampler.bin_for(1.0 - f64::EPSILON), 79);
        assert_eq!(sampler.bin_for(1.5), 79);
    }

    #[test]
    fn test_tie_goes_to_first_bin() {
        let sampler = flat();
        // u exactly on the cumulative edge of bin 0 stays in bin 0
        let edge = sampler.cumulative()[0];
        assert_eq!(sampler.bin_for(edge), 0);
        assert_eq!(sampler.bin_for(edge + 1e-12), 1);
    }

    #[test]
    fn test_zero_weight_bins_are_skipped() {
        let mut weights = [0.0; SPECTRUM_BINS];
        weights[10] = 1.0;
        weights[40] = 1.0;
        let sampler = SpectrumSampler::new(&weights).unwrap();
        assert_eq!(sampler.bin_for(1e-9), 10);
        assert_eq!(sampler.bin_for(0.5), 10);
        assert_eq!(sampler.bin_for(0.5 + 1e-9), 40);
        assert_eq!(sampler.probability(39), 0.0);
    }

    #[test]
    fn test_energy_for_stays_in_bin() {
        let sampler = flat();
        assert_eq!(sampler.energy_for(0.0, 0.0), 100.0);
        let top = sampler.energy_for(1.0 - 1e-12, 1.0 - f64::EPSILON / 2.0);
        assert!(top < 4100.0 && top >= 4050.0);
        assert_eq!(sampler.energy_for(0.0, 1.0), next_down(150.0));
    }

    #[test]
    fn test_samples_within_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let sampler = SpectrumSampler::default();
        for _ in 0..20_000 {
            let e = sampler.sample_energy(&mut rng);
            assert!((100.0..4100.0).contains(&e), "energy {} out of range", e);
        }
    }

    #[test]
    fn test_last_muon_bin_never_sampled() {
        // the built-in table ends with a zero-rate bin
        let mut rng = StdRng::seed_from_u64(3);
        let sampler = SpectrumSampler::default();
        for _ in 0..20_000 {
            assert!(sampler.sample_energy(&mut rng) < 4050.0);
        }
    }

    #[test]
    fn test_transverse_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..5000 {
            let (x, y) = sample_transverse(&mut rng, 7.5, 6.25);
            assert!((-7.5..7.5).contains(&x));
            assert!((-6.25..6.25).contains(&y));
        }
        let (x, y) = sample_transverse(&mut rng, 0.0, 0.0);
        assert_eq!((x.abs(), y.abs()), (0.0, 0.0));
    }

    #[test]
    fn test_sample_event_deterministic() {
        let sampler = SpectrumSampler::default();
        let mut rng1 = StdRng::seed_from_u64(11);
        let mut rng2 = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(
                sampler.sample_event(&mut rng1, 7.5, 6.25),
                sampler.sample_event(&mut rng2, 7.5, 6.25)
            );
        }
    }

    #[test]
    fn test_send_sync_bounds() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<SpectrumSampler>();
        assert_sync::<SpectrumSampler>();
    }
}
