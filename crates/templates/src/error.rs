use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to load template image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot derive a template name from {}", .0.display())]
    InvalidName(PathBuf),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
