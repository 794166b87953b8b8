use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration-time failures. These are the only errors the sampler can
/// raise; once built, sampling never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("spectrum table must have {expected} weights, got {actual}")]
    WrongTableLength { expected: usize, actual: usize },
    #[error("spectrum weight must be finite and >= 0 at index {index}, got {value}")]
    InvalidWeight { index: usize, value: f64 },
    #[error("spectrum table sums to zero")]
    DegenerateTable,
    #[error("spectrum binning needs a finite offset and a finite width > 0, got offset={offset} width={width}")]
    InvalidBinning { offset: f64, width: f64 },
    #[error("beam half-width '{axis}' must be finite and >= 0, got {value}")]
    InvalidHalfWidth { axis: &'static str, value: f64 },
    #[error("unknown beam particle '{name}'")]
    UnknownParticle { name: String },
    #[error("world half-length must be finite and > 0, got {value}")]
    InvalidWorldHalfLength { value: f64 },
    #[error("at least one worker is required")]
    NoWorkers,
    #[error("detector must have at least one layer")]
    NoLayers,
    #[error("energy-flow plane volume names must not be empty")]
    EmptyVolumeName,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A step reported a touchable the sensitive detector does not know.
    #[error("cannot access hit replica number {replica} copy number {copy}")]
    HitLookup { replica: i32, copy: i32 },
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
