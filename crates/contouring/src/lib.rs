//! # Beam Contour Features
//!
//! Extracts the dominant contour of a laser-beam image and derives its
//! geometric features: area, image moments, centroid, bounding box and
//! Hu-invariant similarity to reference templates.
//!
//! Every operation accepts either an image, reduced to its largest contour by
//! thresholding, or an already extracted contour. See [`Source`].
//!
//! ## Quick Start
//!
//! ```rust
//! use contouring::BeamAnalyzer;
//! use image::{GrayImage, Luma};
//! use imageproc::drawing::draw_filled_circle_mut;
//!
//! let mut image = GrayImage::new(100, 100);
//! draw_filled_circle_mut(&mut image, (50, 50), 20, Luma([255u8]));
//!
//! let analyzer = BeamAnalyzer::builder().compare_with("circle").build();
//! let features = analyzer.analyze(&image)?;
//!
//! assert_eq!(features.bounding_box.as_tuple(), (30, 30, 41, 41));
//! assert!(features.similarities["circle"] < 0.1);
//! # Ok::<(), contouring::BeamError>(())
//! ```
//!
//! ## Single Operations
//!
//! ```rust
//! use contouring::{bounding_box, largest_contour, moments, ContourConfig, Source};
//! use image::{GrayImage, Luma};
//!
//! let image = GrayImage::from_fn(64, 64, |x, y| {
//!     Luma([if (20..40).contains(&x) && (30..46).contains(&y) { 255u8 } else { 0 }])
//! });
//! let config = ContourConfig::default();
//!
//! let (contour, _area) = largest_contour(Source::image(&image), &config)?;
//! let m = moments(Source::given(&contour), &config)?;
//! assert_eq!(m.centroid()?, (29, 37));
//! assert_eq!(bounding_box(Source::image(&image), &config)?.as_tuple(), (20, 30, 20, 16));
//! # Ok::<(), contouring::BeamError>(())
//! ```

pub mod error;
pub mod types;
pub mod source;
pub mod config;
pub mod extraction;
pub mod selection;
pub mod moments;
pub mod bounding;
pub mod similarity;
pub mod analyzer;

pub use error::{BeamError, Result};
pub use types::{BorderKind, BoundingBox, Contour, ContourSize};
pub use source::{Resolved, Source};
pub use config::{ChainApproximation, ContourConfig};
pub use extraction::{extract_contours, extract_contours_with, trace_borders};
pub use selection::{contour_area, largest_contour};
pub use moments::{centroid, moments, Moments};
pub use bounding::{bounding_box, contour_size};
pub use similarity::{match_shapes, ShapeMatchMethod, SimilarityScorer, Template};
pub use analyzer::{builder::BeamAnalyzerBuilder, BeamAnalyzer, BeamFeatures};

pub use preprocessing::{ThresholdConfig, ThresholdMode};
pub use templates::TemplateCatalogue;
