use image::GrayImage;
use preprocessing::Binarizer;
use tracing::debug;

use crate::{
    config::{ChainApproximation, ContourConfig},
    error::{BeamError, Result},
    types::{BorderKind, Contour},
};

/// Threshold `image` and trace every outer and hole border in the result.
///
/// Fails with [`BeamError::NoContoursDetected`] when nothing is found.
pub fn extract_contours(image: &GrayImage, config: &ContourConfig) -> Result<Vec<Contour>> {
    extract_contours_with(&config.threshold, image, config.approximation)
}

/// [`extract_contours`] with a caller-provided binarization stage
pub fn extract_contours_with(
    binarizer: &dyn Binarizer,
    image: &GrayImage,
    approximation: ChainApproximation,
) -> Result<Vec<Contour>> {
    let binary = binarizer.binarize(image)?;
    let contours = trace_borders(&binary, approximation);

    if contours.is_empty() {
        return Err(BeamError::NoContoursDetected);
    }
    debug!(count = contours.len(), "Extracted contours");
    Ok(contours)
}

/// Suzuki-Abe border following on an already binary image.
///
/// Pixels outside the image count as background, so regions touching the
/// image edge are closed along it.
pub fn trace_borders(binary: &GrayImage, approximation: ChainApproximation) -> Vec<Contour> {
    let (width, height) = binary.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    image::imageops::replace(&mut padded, binary, 1, 1);

    imageproc::contours::find_contours::<i32>(&padded)
        .into_iter()
        .map(|contour| Contour {
            points: approximation
                .apply(contour.points.iter().map(|p| [p.x - 1, p.y - 1]).collect()),
            border: BorderKind::from(contour.border_type),
            parent: contour.parent,
        })
        .collect()
}
