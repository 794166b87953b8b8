// Run configuration. Settings are plain values owned by whoever runs the
// simulation; each worker builds its own sampler and detector from them.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};
use crate::particle::ParticleKind;
use crate::spectrum::{SpectrumBinning, SpectrumSampler, MUON_SPECTRUM};
use crate::units::{CM, MM};

/// Half-length of the world box along the beam axis for the default layout:
/// 500 cm of rock, a 315.4 cm gap and one 1.3 mm emulsion/lead layer, with
/// 20% margin.
pub const DEFAULT_WORLD_HALF_Z: f64 = 0.6 * (500.0 * CM + 315.4 * CM + 1.3 * MM);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BeamSettings {
    /// Toolkit name of the beam particle.
    pub particle: String,
    /// Half-width of the beam spot along x, in cm.
    pub x_half_width: f64,
    /// Half-width of the beam spot along y, in cm.
    pub y_half_width: f64,
    /// Half-length of the world along z, in mm. The beam starts on the
    /// upstream face; without it the beam starts at the world centre.
    pub world_half_z: Option<f64>,
}

impl BeamSettings {
    pub fn particle_kind(&self) -> std::result::Result<ParticleKind, ConfigError> {
        ParticleKind::from_name(&self.particle).ok_or_else(|| ConfigError::UnknownParticle {
            name: self.particle.clone(),
        })
    }
}

impl Default for BeamSettings {
    fn default() -> Self {
        Self {
            particle: "mu-".to_string(),
            x_half_width: 7.5,
            y_half_width: 6.25,
            world_half_z: Some(DEFAULT_WORLD_HALF_Z),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpectrumSettings {
    /// 80 relative weights; the built-in muon spectrum when absent.
    pub weights: Option<Vec<f64>>,
    pub binning: SpectrumBinning,
}

impl SpectrumSettings {
    pub fn build_sampler(&self) -> std::result::Result<SpectrumSampler, ConfigError> {
        let weights = self.weights.as_deref().unwrap_or(&MUON_SPECTRUM);
        SpectrumSampler::with_binning(weights, self.binning)
    }
}

impl Default for SpectrumSettings {
    fn default() -> Self {
        Self {
            weights: None,
            binning: SpectrumBinning::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorSettings {
    pub name: String,
    pub collection_name: String,
    /// Logical volume the sensitive detector is attached to.
    pub sensitive_volume: String,
    pub layers: i32,
    pub verbose: u8,
    /// Energy flow is recorded for tracks crossing from `flow_from` into `flow_to`.
    pub flow_from: String,
    pub flow_to: String,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            name: "EmulsionSD".to_string(),
            collection_name: "EmulsionHitsCollection".to_string(),
            sensitive_volume: "EmulsionLV".to_string(),
            layers: 1,
            verbose: 0,
            flow_from: "Gap".to_string(),
            flow_to: "AbsoLV".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub events: usize,
    pub workers: usize,
    pub seed: Option<u64>,
    /// Keep every event record in the run summary, not only the histograms.
    pub keep_events: bool,
    pub beam: BeamSettings,
    pub spectrum: SpectrumSettings,
    pub detector: DetectorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            events: 1000,
            workers: 1,
            seed: None,
            keep_events: false,
            beam: BeamSettings::default(),
            spectrum: SpectrumSettings::default(),
            detector: DetectorSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        for (axis, value) in [("x", self.beam.x_half_width), ("y", self.beam.y_half_width)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidHalfWidth { axis, value });
            }
        }
        self.beam.particle_kind()?;
        if let Some(value) = self.beam.world_half_z {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidWorldHalfLength { value });
            }
        }
        if self.detector.layers < 1 {
            return Err(ConfigError::NoLayers);
        }
        if self.detector.flow_from.is_empty() || self.detector.flow_to.is_empty() {
            return Err(ConfigError::EmptyVolumeName);
        }
        self.spectrum.build_sampler().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.workers, 1);
        assert_eq!(settings.beam.x_half_width, 7.5);
        assert_eq!(settings.beam.y_half_width, 6.25);
        assert_eq!(settings.beam.particle_kind(), Ok(ParticleKind::MuonMinus));
        assert!((DEFAULT_WORLD_HALF_Z - 4893.18).abs() < 1e-9);
        assert_eq!(settings.detector.collection_name, "EmulsionHitsCollection");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json_str(r#"{"events": 20, "seed": 7, "beam": {"x_half_width": 1.0}}"#).unwrap();
        assert_eq!(settings.events, 20);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.beam.x_half_width, 1.0);
        assert_eq!(settings.beam.y_half_width, 6.25);
        assert_eq!(settings.detector.flow_to, "AbsoLV");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Settings::from_json_str(r#"{"evnts": 20}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_all_zero_spectrum_rejected() {
        let json = format!(r#"{{"spectrum": {{"weights": {:?}}}}}"#, vec![0.0; 80]);
        let err = Settings::from_json_str(&json).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::DegenerateTable)));
    }

    #[test]
    fn test_short_spectrum_rejected() {
        let err = Settings::from_json_str(r#"{"spectrum": {"weights": [1.0, 2.0]}}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::WrongTableLength { expected: 80, actual: 2 })
        ));
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.workers = 0;
        assert_eq!(settings.validate(), Err(ConfigError::NoWorkers));

        let mut settings = Settings::default();
        settings.beam.y_half_width = -1.0;
        assert_eq!(
            settings.validate(),
            Err(ConfigError::InvalidHalfWidth { axis: "y", value: -1.0 })
        );

        let mut settings = Settings::default();
        settings.beam.world_half_z = Some(0.0);
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidWorldHalfLength { .. })));

        let mut settings = Settings::default();
        settings.beam.particle = "graviton".to_string();
        assert_eq!(
            settings.validate(),
            Err(ConfigError::UnknownParticle {
                name: "graviton".to_string()
            })
        );

        let mut settings = Settings::default();
        settings.detector.layers = 0;
        assert_eq!(settings.validate(), Err(ConfigError::NoLayers));

        let mut settings = Settings::default();
        settings.detector.flow_to.clear();
        assert_eq!(settings.validate(), Err(ConfigError::EmptyVolumeName));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"workers": 4, "keep_events": true}}"#).unwrap();
        let settings = Settings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.workers, 4);
        assert!(settings.keep_events);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::from_json_file("/nonexistent/settings.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
