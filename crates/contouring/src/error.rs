use preprocessing::PreprocessError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeamError {
    #[error("No contours detected in the image")]
    NoContoursDetected,

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Moments are degenerate (m00 = {m00}), centroid is undefined")]
    DegenerateMoments { m00: f64 },

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BeamError>;
