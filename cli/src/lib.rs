use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contouring::{
    BeamAnalyzer, BeamError, ChainApproximation, ShapeMatchMethod, TemplateCatalogue,
    ThresholdConfig,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use templates::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeamKitError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Beam(#[from] BeamError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Settings for a beam analysis run, loadable from `.toml` or `.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub threshold: ThresholdConfig,
    pub approximation: ChainApproximation,
    /// Templates every beam is compared against
    pub templates: Vec<String>,
    /// Extra template images, named after their file stems
    pub templates_dir: Option<PathBuf>,
    pub method: ShapeMatchMethod,
}

impl AnalysisConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, BeamKitError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, BeamKitError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BeamKitError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&fs::read_to_string(path)?),
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(BeamKitError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String, BeamKitError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String, BeamKitError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JSON schema of the configuration file
    pub fn schema() -> Result<String, BeamKitError> {
        let schema = schemars::schema_for!(AnalysisConfig);
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// Built-in templates plus those found in `templates_dir`
    pub fn catalogue(&self) -> Result<TemplateCatalogue, BeamKitError> {
        let mut builder = TemplateCatalogue::builder().with_builtins();
        if let Some(dir) = &self.templates_dir {
            builder = builder.load_dir(dir)?;
        }
        Ok(builder.build())
    }

    pub fn analyzer(&self) -> Result<BeamAnalyzer, BeamKitError> {
        Ok(BeamAnalyzer::builder()
            .threshold(self.threshold)
            .approximation(self.approximation)
            .catalogue(Arc::new(self.catalogue()?))
            .compare_with_all(self.templates.iter().cloned())
            .method(self.method)
            .build())
    }
}
