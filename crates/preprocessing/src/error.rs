use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Cannot threshold an empty image")]
    EmptyImage,

    #[error("Unknown threshold mode '{0}', expected one of: mean, top, bottom, adaptive, otsu")]
    UnknownMode(String),

    #[error("Invalid threshold parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
