use crate::{
    config::ContourConfig,
    error::{BeamError, Result},
    selection::largest_contour,
    source::{Resolved, Source},
    types::{BoundingBox, Contour, ContourSize},
};

/// Upright bounding box of the contour, or of the largest contour of the image
pub fn bounding_box(source: Source<'_, Contour>, config: &ContourConfig) -> Result<BoundingBox> {
    let bbox = match source.resolve("contour")? {
        Resolved::Image(image) => {
            let (contour, _) = largest_contour(Source::image(image), config)?;
            BoundingBox::of_contour(&contour)
        }
        Resolved::Given(contour) => BoundingBox::of_contour(contour),
    };

    bbox.ok_or_else(|| BeamError::Input("Cannot bound a contour without points".to_string()))
}

/// `(length, width)`, i.e. the bounding box height and width
pub fn contour_size(source: Source<'_, Contour>, config: &ContourConfig) -> Result<ContourSize> {
    Ok(bounding_box(source, config)?.size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn create_test_image() -> GrayImage {
        let mut img = GrayImage::new(64, 64);
        for y in 30..45 {
            for x in 20..40 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        img
    }

    #[test]
    fn test_bounding_box_of_image() {
        let bbox = bounding_box(Source::image(&create_test_image()), &ContourConfig::default()).unwrap();
        assert_eq!(bbox.as_tuple(), (20, 30, 20, 15));
    }

    #[test]
    fn test_bounding_box_of_contour_matches_image_path() {
        let image = create_test_image();
        let config = ContourConfig::default();
        let (contour, _) = largest_contour(Source::image(&image), &config).unwrap();
        assert_eq!(
            bounding_box(Source::given(&contour), &config).unwrap(),
            bounding_box(Source::image(&image), &config).unwrap()
        );
    }

    #[test]
    fn test_contour_size_relabels_height_and_width() {
        let contour = Contour::new(vec![[2, 3], [12, 3], [12, 33], [2, 33]]);
        let config = ContourConfig::default();
        let bbox = bounding_box(Source::given(&contour), &config).unwrap();
        let size = contour_size(Source::given(&contour), &config).unwrap();
        assert_eq!(size.as_tuple(), (bbox.height, bbox.width));
        assert_eq!(size.as_tuple(), (31, 11));
    }

    #[test]
    fn test_image_wins_over_contour() {
        let image = create_test_image();
        let contour = Contour::new(vec![[0, 0], [1, 0], [1, 1]]);
        let config = ContourConfig::default();
        assert_eq!(
            contour_size(Source::both(&image, &contour), &config).unwrap(),
            contour_size(Source::image(&image), &config).unwrap()
        );
    }

    #[test]
    fn test_missing_input() {
        let config = ContourConfig::default();
        assert!(matches!(bounding_box(Source::none(), &config), Err(BeamError::Input(_))));
        assert!(matches!(contour_size(Source::none(), &config), Err(BeamError::Input(_))));
    }

    #[test]
    fn test_empty_contour() {
        let result = bounding_box(Source::given(&Contour::new(vec![])), &ContourConfig::default());
        assert!(matches!(result, Err(BeamError::Input(_))));
    }
}
