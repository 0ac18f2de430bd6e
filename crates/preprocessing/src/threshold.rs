use image::{GrayImage, Luma};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use tracing::debug;

use crate::error::{PreprocessError, Result};

/// Thresholding strategy used to binarize a grayscale image.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThresholdMode {
    /// Level at `mean + factor * std`
    Mean,
    /// Level at `max - factor * std`
    Top,
    /// Level at `min + factor * std`
    Bottom,
    /// Local mean over a square block around each pixel
    Adaptive,
    /// Otsu's between-class variance maximisation
    #[default]
    Otsu,
}

impl ThresholdMode {
    /// Parse a mode name, reporting unknown names as a preprocessing error
    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| PreprocessError::UnknownMode(name.to_string()))
    }

    /// Get all recognised mode names
    pub fn names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }
}

/// A thresholding mode together with its mode-specific parameters.
///
/// `factor` is only read by `mean`, `top` and `bottom`; `block_radius` only
/// by `adaptive`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ThresholdConfig {
    pub mode: ThresholdMode,
    /// Standard-deviation multiplier
    pub factor: f64,
    /// Half-size of the adaptive window, in pixels
    pub block_radius: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            mode: ThresholdMode::default(),
            factor: 1.0,
            block_radius: 5,
        }
    }
}

impl ThresholdConfig {
    pub fn new(mode: ThresholdMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_block_radius(mut self, block_radius: u32) -> Self {
        self.block_radius = block_radius;
        self
    }
}

/// Trait for algorithms turning a grayscale image into a 0/255 mask
pub trait Binarizer: Send + Sync {
    /// Binarize the image, keeping its dimensions
    fn binarize(&self, image: &GrayImage) -> Result<GrayImage>;
}

impl Binarizer for ThresholdConfig {
    fn binarize(&self, image: &GrayImage) -> Result<GrayImage> {
        threshold_image(image, self)
    }
}

/// Binarize `image` according to `config`.
///
/// Pixels strictly above the computed level become 255, everything else 0.
pub fn threshold_image(image: &GrayImage, config: &ThresholdConfig) -> Result<GrayImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PreprocessError::EmptyImage);
    }
    if !config.factor.is_finite() {
        return Err(PreprocessError::InvalidParameter(format!(
            "factor must be finite, got {}",
            config.factor
        )));
    }
    if config.mode == ThresholdMode::Adaptive && config.block_radius == 0 {
        return Err(PreprocessError::InvalidParameter(
            "block_radius must be at least 1 for adaptive thresholding".to_string(),
        ));
    }

    let binary = match config.mode {
        ThresholdMode::Mean => {
            let stats = IntensityStats::of(image);
            threshold_at(image, stats.mean + config.factor * stats.std)
        }
        ThresholdMode::Top => {
            let stats = IntensityStats::of(image);
            threshold_at(image, stats.max - config.factor * stats.std)
        }
        ThresholdMode::Bottom => {
            let stats = IntensityStats::of(image);
            threshold_at(image, stats.min + config.factor * stats.std)
        }
        ThresholdMode::Adaptive => {
            imageproc::contrast::adaptive_threshold(image, config.block_radius)
        }
        ThresholdMode::Otsu => {
            let level = imageproc::contrast::otsu_level(image);
            debug!(level, "Otsu threshold level");
            imageproc::contrast::threshold(image, level)
        }
    };

    Ok(binary)
}

fn threshold_at(image: &GrayImage, level: f64) -> GrayImage {
    debug!(level, "Threshold level");
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let value = f64::from(image.get_pixel(x, y)[0]);
        Luma([if value > level { 255 } else { 0 }])
    })
}

/// Global intensity statistics of a grayscale image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl IntensityStats {
    pub fn of(image: &GrayImage) -> Self {
        let count = image.as_raw().len().max(1) as f64;
        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        let mut min = u8::MAX;
        let mut max = u8::MIN;

        for &value in image.as_raw() {
            let v = u64::from(value);
            sum += v;
            sum_sq += v * v;
            min = min.min(value);
            max = max.max(value);
        }

        let mean = sum as f64 / count;
        let variance = (sum_sq as f64 / count - mean * mean).max(0.0);

        Self {
            mean,
            std: variance.sqrt(),
            min: f64::from(min),
            max: f64::from(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image() -> GrayImage {
        let mut img = GrayImage::new(40, 40);
        for y in 10..30 {
            for x in 10..30 {
                img.put_pixel(x, y, Luma([200u8]));
            }
        }
        img
    }

    fn is_binary(image: &GrayImage) -> bool {
        image.pixels().all(|p| p[0] == 0 || p[0] == 255)
    }

    #[test]
    fn test_every_mode_returns_binary_image_of_same_size() {
        let image = create_test_image();
        for name in ThresholdMode::names() {
            let config = ThresholdConfig::new(ThresholdMode::parse(name).unwrap());
            let binary = threshold_image(&image, &config).expect("Should threshold");
            assert_eq!(binary.dimensions(), image.dimensions());
            assert!(is_binary(&binary), "mode {name} produced non-binary output");
        }
    }

    #[test]
    fn test_otsu_separates_square() {
        let image = create_test_image();
        let binary = threshold_image(&image, &ThresholdConfig::default()).unwrap();
        assert_eq!(binary.get_pixel(20, 20)[0], 255);
        assert_eq!(binary.get_pixel(2, 2)[0], 0);
        let lit = binary.pixels().filter(|p| p[0] == 255).count();
        assert_eq!(lit, 400);
    }

    #[test]
    fn test_mean_mode_uses_factor() {
        let image = create_test_image();
        // 25% of pixels at 200: mean 50, std ~86.6, level ~136.6
        let binary = threshold_image(&image, &ThresholdConfig::new(ThresholdMode::Mean)).unwrap();
        assert_eq!(binary.get_pixel(20, 20)[0], 255);

        // A large factor pushes the level above every pixel
        let strict = ThresholdConfig::new(ThresholdMode::Mean).with_factor(5.0);
        let binary = threshold_image(&image, &strict).unwrap();
        assert!(binary.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_all_zero_image_stays_dark() {
        let image = GrayImage::new(16, 16);
        for mode in [ThresholdMode::Mean, ThresholdMode::Top, ThresholdMode::Bottom, ThresholdMode::Otsu] {
            let name = mode.to_string();
            let config = ThresholdConfig::new(mode);
            let binary = threshold_image(&image, &config).unwrap();
            assert!(binary.pixels().all(|p| p[0] == 0), "mode {name} lit a dark image");
        }
    }

    #[test]
    fn test_adaptive_lights_flat_images() {
        // Pixels at or above their local mean are foreground
        let config = ThresholdConfig::new(ThresholdMode::Adaptive).with_block_radius(3);
        for value in [0u8, 90, 255] {
            let image = GrayImage::from_pixel(16, 16, Luma([value]));
            let binary = threshold_image(&image, &config).unwrap();
            assert!(binary.pixels().all(|p| p[0] == 255), "flat image at {value}");
        }
    }

    #[test]
    fn test_adaptive_keeps_local_peaks_only() {
        let mut image = GrayImage::from_pixel(16, 16, Luma([100u8]));
        image.put_pixel(8, 8, Luma([200u8]));
        image.put_pixel(4, 8, Luma([10u8]));
        let config = ThresholdConfig::new(ThresholdMode::Adaptive).with_block_radius(1);
        let binary = threshold_image(&image, &config).unwrap();
        assert_eq!(binary.get_pixel(8, 8)[0], 255);
        assert_eq!(binary.get_pixel(4, 8)[0], 0);
        // Neighbours of the peak fall below their raised local mean
        assert_eq!(binary.get_pixel(7, 8)[0], 0);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let image = GrayImage::new(0, 0);
        let result = threshold_image(&image, &ThresholdConfig::default());
        assert!(matches!(result, Err(PreprocessError::EmptyImage)));
    }

    #[test]
    fn test_non_finite_factor_is_rejected() {
        let config = ThresholdConfig::new(ThresholdMode::Top).with_factor(f64::NAN);
        let result = threshold_image(&create_test_image(), &config);
        assert!(matches!(result, Err(PreprocessError::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_block_radius_is_rejected() {
        let config = ThresholdConfig::new(ThresholdMode::Adaptive).with_block_radius(0);
        let result = threshold_image(&create_test_image(), &config);
        assert!(matches!(result, Err(PreprocessError::InvalidParameter(_))));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(ThresholdMode::parse("otsu").unwrap(), ThresholdMode::Otsu);
        assert_eq!(ThresholdMode::parse("adaptive").unwrap(), ThresholdMode::Adaptive);
        assert_eq!(ThresholdMode::Bottom.to_string(), "bottom");
        assert!(matches!(
            ThresholdMode::parse("median"),
            Err(PreprocessError::UnknownMode(name)) if name == "median"
        ));
    }

    #[test]
    fn test_intensity_stats() {
        let stats = IntensityStats::of(&create_test_image());
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 200.0);
        assert!((stats.mean - 50.0).abs() < 1e-9);
        assert!((stats.std - 7500f64.sqrt()).abs() < 1e-9);
    }
}
