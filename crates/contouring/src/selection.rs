use geo::Area;
use tracing::debug;

use crate::{
    config::ContourConfig,
    error::{BeamError, Result},
    extraction::extract_contours,
    source::{Resolved, Source},
    types::Contour,
};

/// Enclosed area of a contour (unsigned shoelace area of the closed polygon)
pub fn contour_area(contour: &Contour) -> f64 {
    contour.to_polygon().unsigned_area()
}

/// The contour enclosing the largest area, together with that area.
///
/// Contours are extracted from the image when one is given, even if
/// contours are supplied as well. Ties go to the first contour with the
/// maximal area. A maximal area of zero counts as no contour at all.
pub fn largest_contour(source: Source<'_, [Contour]>, config: &ContourConfig) -> Result<(Contour, f64)> {
    match source.resolve("contours")? {
        Resolved::Image(image) => select_largest(&extract_contours(image, config)?),
        Resolved::Given(contours) => select_largest(contours),
    }
}

pub(crate) fn select_largest(contours: &[Contour]) -> Result<(Contour, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, contour) in contours.iter().enumerate() {
        let area = contour_area(contour);
        if best.is_none_or(|(_, largest)| area > largest) {
            best = Some((index, area));
        }
    }

    let (index, area) = best.ok_or(BeamError::NoContoursDetected)?;
    if area == 0.0 {
        return Err(BeamError::NoContoursDetected);
    }

    debug!(index, area, candidates = contours.len(), "Selected largest contour");
    Ok((contours[index].clone(), area))
}
