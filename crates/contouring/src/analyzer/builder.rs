use std::sync::Arc;

use preprocessing::ThresholdConfig;
use templates::TemplateCatalogue;

use crate::{
    analyzer::BeamAnalyzer,
    config::{ChainApproximation, ContourConfig},
    similarity::{ShapeMatchMethod, SimilarityScorer},
};

/// Builder for creating beam analyzers with a fluent API
pub struct BeamAnalyzerBuilder {
    config: ContourConfig,
    catalogue: Option<Arc<TemplateCatalogue>>,
    templates: Vec<String>,
    method: ShapeMatchMethod,
}

impl BeamAnalyzerBuilder {
    /// Create a new analyzer builder
    pub fn new() -> Self {
        Self {
            config: ContourConfig::default(),
            catalogue: None,
            templates: Vec::new(),
            method: ShapeMatchMethod::default(),
        }
    }

    /// Set the thresholding mode and parameters
    pub fn threshold(mut self, threshold: ThresholdConfig) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set how traced boundaries are compressed
    pub fn approximation(mut self, approximation: ChainApproximation) -> Self {
        self.config.approximation = approximation;
        self
    }

    /// Replace the whole contour configuration
    pub fn contour_config(mut self, config: ContourConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the template catalogue (the built-in shapes otherwise)
    pub fn catalogue(mut self, catalogue: Arc<TemplateCatalogue>) -> Self {
        self.catalogue = Some(catalogue);
        self
    }

    /// Add a named template to score every beam against
    pub fn compare_with(mut self, name: impl Into<String>) -> Self {
        self.templates.push(name.into());
        self
    }

    /// Add several named templates
    pub fn compare_with_all<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.templates.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the shape distance formula
    pub fn method(mut self, method: ShapeMatchMethod) -> Self {
        self.method = method;
        self
    }

    /// Build the analyzer with default components if not specified
    pub fn build(self) -> BeamAnalyzer {
        let catalogue = self
            .catalogue
            .unwrap_or_else(|| Arc::new(TemplateCatalogue::builtin()));

        BeamAnalyzer::new(
            self.config,
            SimilarityScorer::new(catalogue, self.config),
            self.templates,
            self.method,
        )
    }
}

impl Default for BeamAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
