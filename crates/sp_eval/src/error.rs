use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Dimension mismatch for '{label}': ground truth is {ground_truth:?}, candidate is {candidate:?}")]
    DimensionMismatch {
        label: String,
        ground_truth: (u32, u32),
        candidate: (u32, u32),
    },

    #[error("Ground truth for '{label}' contains no boundary pixels, boundary recall is undefined")]
    EmptyGroundTruth { label: String },

    #[error("No marked boundary pixel found for '{label}' around ({x}, {y})")]
    NoBoundaryMatch { label: String, x: u32, y: u32 },

    #[error("Missing metric record '{label}'")]
    MissingMetric { label: String },

    #[error("Font error: {0}")]
    Font(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported configuration format {0:?}, use .toml or .json")]
    UnsupportedConfigFormat(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
