use image::GrayImage;
use tracing::warn;

use crate::error::{BeamError, Result};

/// Where an operation takes its contour(s) from.
///
/// An image is reduced to its contours by thresholding; `given` is used as
/// is. When both are set the image wins and a warning is logged.
#[derive(Debug)]
pub struct Source<'a, T: ?Sized> {
    image: Option<&'a GrayImage>,
    given: Option<&'a T>,
}

/// The input an operation actually uses after [`Source::resolve`]
#[derive(Debug)]
pub enum Resolved<'a, T: ?Sized> {
    Image(&'a GrayImage),
    Given(&'a T),
}

impl<'a, T: ?Sized> Source<'a, T> {
    pub fn new(image: Option<&'a GrayImage>, given: Option<&'a T>) -> Self {
        Self { image, given }
    }

    pub fn image(image: &'a GrayImage) -> Self {
        Self::new(Some(image), None)
    }

    pub fn given(given: &'a T) -> Self {
        Self::new(None, Some(given))
    }

    pub fn both(image: &'a GrayImage, given: &'a T) -> Self {
        Self::new(Some(image), Some(given))
    }

    pub fn none() -> Self {
        Self::new(None, None)
    }

    /// Pick the input to use; `what` names the non-image input in messages.
    pub fn resolve(self, what: &str) -> Result<Resolved<'a, T>> {
        match (self.image, self.given) {
            (Some(image), Some(_)) => {
                warn!("Image and {} provided, using the largest contour of the image", what);
                Ok(Resolved::Image(image))
            }
            (Some(image), None) => Ok(Resolved::Image(image)),
            (None, Some(given)) => Ok(Resolved::Given(given)),
            (None, None) => Err(BeamError::Input(format!("No image or {} provided", what))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_rules() {
        let image = GrayImage::new(4, 4);
        let value = 7u8;

        assert!(matches!(Source::<u8>::image(&image).resolve("value"), Ok(Resolved::Image(_))));
        assert!(matches!(Source::given(&value).resolve("value"), Ok(Resolved::Given(&7))));
        assert!(matches!(Source::both(&image, &value).resolve("value"), Ok(Resolved::Image(_))));
        assert!(matches!(
            Source::<u8>::none().resolve("value"),
            Err(BeamError::Input(msg)) if msg == "No image or value provided"
        ));
    }
}
