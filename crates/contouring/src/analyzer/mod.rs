pub mod builder;

use std::collections::BTreeMap;

use image::{DynamicImage, GrayImage};
use preprocessing::normalize;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    bounding::bounding_box,
    config::ContourConfig,
    error::Result,
    moments::{centroid, moments, Moments},
    selection::largest_contour,
    similarity::{ShapeMatchMethod, SimilarityScorer, Template},
    source::Source,
    types::{BoundingBox, Contour, ContourSize},
};

/// Every feature derived from the dominant contour of one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamFeatures {
    pub image_width: u32,
    pub image_height: u32,
    pub contour: Contour,
    pub area: f64,
    pub moments: Moments,
    pub centroid: (i64, i64),
    pub bounding_box: BoundingBox,
    pub size: ContourSize,
    /// Shape distance per compared template
    pub similarities: BTreeMap<String, f64>,
}

impl BeamFeatures {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the full contour feature chain on beam images
#[derive(Debug, Clone)]
pub struct BeamAnalyzer {
    config: ContourConfig,
    scorer: SimilarityScorer,
    templates: Vec<String>,
    method: ShapeMatchMethod,
}

impl BeamAnalyzer {
    /// Create a new analyzer builder
    pub fn builder() -> builder::BeamAnalyzerBuilder {
        builder::BeamAnalyzerBuilder::new()
    }

    pub fn new(
        config: ContourConfig,
        scorer: SimilarityScorer,
        templates: Vec<String>,
        method: ShapeMatchMethod,
    ) -> Self {
        Self {
            config,
            scorer,
            templates,
            method,
        }
    }

    pub fn config(&self) -> &ContourConfig {
        &self.config
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    /// Extract the dominant contour of `image` and derive its features
    pub fn analyze(&self, image: &GrayImage) -> Result<BeamFeatures> {
        // Step 1: Dominant contour
        let (contour, area) = largest_contour(Source::image(image), &self.config)?;

        // Step 2: Moments and centroid
        let moments = moments(Source::given(&contour), &self.config)?;
        let centroid = centroid(&moments)?;

        // Step 3: Extents
        let bounding_box = bounding_box(Source::given(&contour), &self.config)?;

        // Step 4: Shape comparison
        let mut similarities = BTreeMap::new();
        for name in &self.templates {
            let template = Template::Name(name.clone());
            let score = self.scorer.similarity(&contour, &template, self.method)?;
            similarities.insert(name.clone(), score);
        }

        info!(
            area,
            cx = centroid.0,
            cy = centroid.1,
            width = bounding_box.width,
            height = bounding_box.height,
            "Analyzed beam"
        );

        Ok(BeamFeatures {
            image_width: image.width(),
            image_height: image.height(),
            contour,
            area,
            moments,
            centroid,
            size: bounding_box.size(),
            bounding_box,
            similarities,
        })
    }

    /// [`analyze`](Self::analyze) after normalizing to 8-bit gray
    pub fn analyze_dynamic(&self, image: &DynamicImage) -> Result<BeamFeatures> {
        self.analyze(&normalize(image))
    }

    /// Get information about the analyzer configuration
    pub fn info(&self) -> String {
        format!(
            "BeamAnalyzer: threshold {}, approximation {}, {} templates compared with {}",
            self.config.threshold.mode,
            self.config.approximation,
            self.templates.len(),
            self.method
        )
    }
}
