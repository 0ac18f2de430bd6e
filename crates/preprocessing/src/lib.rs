//! # Beam Image Preprocessing
//!
//! Binarization and normalization stages that feed contour extraction.
//!
//! ```rust
//! use image::{GrayImage, Luma};
//! use preprocessing::{threshold_image, ThresholdConfig, ThresholdMode};
//!
//! let mut image = GrayImage::new(32, 32);
//! image.put_pixel(16, 16, Luma([255u8]));
//!
//! let binary = threshold_image(&image, &ThresholdConfig::new(ThresholdMode::Otsu))?;
//! assert_eq!(binary.get_pixel(16, 16)[0], 255);
//! # Ok::<(), preprocessing::PreprocessError>(())
//! ```

pub mod error;
pub mod threshold;
pub mod convert;

pub use error::{PreprocessError, Result};
pub use threshold::{threshold_image, Binarizer, IntensityStats, ThresholdConfig, ThresholdMode};
pub use convert::{normalize, to_gray, to_uint8, SingleChannel};
