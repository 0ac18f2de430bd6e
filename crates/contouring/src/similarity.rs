use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use preprocessing::normalize;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, VariantNames};
use templates::TemplateCatalogue;
use tracing::debug;

use crate::{
    config::ContourConfig,
    error::{BeamError, Result},
    moments::Moments,
    selection::largest_contour,
    source::Source,
    types::{json_type_name, Contour},
};

/// Reference shape for similarity scoring
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Name of an image in the template catalogue
    Name(String),
    /// Reference contour used directly
    Contour(Contour),
}

impl Template {
    /// Interpret an untyped value: a string names a catalogue template, a
    /// nested `(n, 1, 2)` array is a contour.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Name(name.clone())),
            Value::Array(_) => Contour::from_json(value).map(Self::Contour),
            other => Err(BeamError::Input(format!(
                "Template must be a string or a contour array, got {}",
                json_type_name(other)
            ))),
        }
    }
}

impl From<&str> for Template {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Template {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Contour> for Template {
    fn from(contour: Contour) -> Self {
        Self::Contour(contour)
    }
}

/// Hu-invariant shape distance formula
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames,
    PartialEq, Eq
)]
pub enum ShapeMatchMethod {
    /// Sum of differences of reciprocal log-invariants
    #[default]
    I1,
    /// Sum of differences of log-invariants
    I2,
    /// Largest relative difference of log-invariants
    I3,
}

impl ShapeMatchMethod {
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Self::I1),
            1 => Ok(Self::I2),
            2 => Ok(Self::I3),
            _ => Err(BeamError::Input(format!(
                "Shape match method must be 0, 1 or 2, got {index}"
            ))),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::I1 => 0,
            Self::I2 => 1,
            Self::I3 => 2,
        }
    }
}

const HU_EPSILON: f64 = 1.0e-5;

/// Distance between two contours over their Hu invariants.
///
/// Zero when the invariants agree; `f64::MAX` when only one of the two has
/// any non-zero invariant.
pub fn match_shapes(reference: &Contour, contour: &Contour, method: ShapeMatchMethod) -> f64 {
    let ha = Moments::of_contour(reference).hu();
    let hb = Moments::of_contour(contour).hu();

    let mut result = 0.0_f64;
    let mut any_a = false;
    let mut any_b = false;

    for (&a, &b) in ha.iter().zip(hb.iter()) {
        let (abs_a, abs_b) = (a.abs(), b.abs());
        any_a |= abs_a > 0.0;
        any_b |= abs_b > 0.0;

        if abs_a <= HU_EPSILON || abs_b <= HU_EPSILON {
            continue;
        }
        let la = a.signum() * abs_a.log10();
        let lb = b.signum() * abs_b.log10();

        match method {
            ShapeMatchMethod::I1 => result += (1.0 / lb - 1.0 / la).abs(),
            ShapeMatchMethod::I2 => result += (lb - la).abs(),
            ShapeMatchMethod::I3 => result = result.max(((la - lb) / la).abs()),
        }
    }

    if any_a != any_b { f64::MAX } else { result }
}

/// Scores contours against templates from a shared, read-only catalogue
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    catalogue: Arc<TemplateCatalogue>,
    config: ContourConfig,
}

impl SimilarityScorer {
    pub fn new(catalogue: Arc<TemplateCatalogue>, config: ContourConfig) -> Self {
        Self { catalogue, config }
    }

    pub fn catalogue(&self) -> &TemplateCatalogue {
        &self.catalogue
    }

    /// Largest contour of the named catalogue image, normalized to 8-bit gray
    pub fn template_contour(&self, name: &str) -> Result<Contour> {
        let image = self.catalogue.get(name).ok_or_else(|| {
            BeamError::Input(format!("'{name}' is not an image template"))
        })?;
        let gray = normalize(image);
        let (contour, _) = largest_contour(Source::image(&gray), &self.config)?;
        Ok(contour)
    }

    pub fn resolve<'t>(&self, template: &'t Template) -> Result<Cow<'t, Contour>> {
        match template {
            Template::Name(name) => self.template_contour(name).map(Cow::Owned),
            Template::Contour(contour) => Ok(Cow::Borrowed(contour)),
        }
    }

    /// Shape distance of `contour` from `template`; 0.0 is a perfect match.
    pub fn similarity(&self, contour: &Contour, template: &Template, method: ShapeMatchMethod) -> Result<f64> {
        let reference = self.resolve(template)?;
        let score = match_shapes(&reference, contour, method);
        debug!(?method, score, "Scored contour against template");
        Ok(score)
    }

    /// Similarity against every template in the catalogue, keyed by name
    pub fn similarities(&self, contour: &Contour, method: ShapeMatchMethod) -> Result<BTreeMap<String, f64>> {
        self.catalogue
            .names()
            .map(|name| -> Result<(String, f64)> {
                let score = self.similarity(contour, &Template::from(name), method)?;
                Ok((name.to_string(), score))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn scorer() -> SimilarityScorer {
        SimilarityScorer::new(Arc::new(TemplateCatalogue::builtin()), ContourConfig::default())
    }

    fn create_beam_image() -> GrayImage {
        GrayImage::from_fn(120, 90, |x, y| {
            let dx = (f64::from(x) - 60.0) / 18.0;
            let dy = (f64::from(y) - 45.0) / 10.0;
            Luma([(255.0 * (-(dx * dx + dy * dy) / 2.0).exp()).round() as u8])
        })
    }

    fn beam_contour() -> Contour {
        let image = create_beam_image();
        largest_contour(Source::image(&image), &ContourConfig::default()).unwrap().0
    }

    #[test]
    fn test_reflexive_for_every_template() {
        let scorer = scorer();
        for name in scorer.catalogue().names() {
            let contour = scorer.template_contour(name).unwrap();
            for method in ShapeMatchMethod::iter() {
                let score = scorer.similarity(&contour, &Template::from(name), method).unwrap();
                assert_eq!(score, 0.0, "{name} with {method}");
            }
        }
    }

    #[test]
    fn test_name_and_contour_templates_agree() {
        let scorer = scorer();
        let beam = beam_contour();
        for name in scorer.catalogue().names() {
            let reference = Template::Contour(scorer.template_contour(name).unwrap());
            for method in ShapeMatchMethod::iter() {
                let by_name = scorer.similarity(&beam, &Template::from(name), method).unwrap();
                let by_contour = scorer.similarity(&beam, &reference, method).unwrap();
                assert!(by_name >= 0.0);
                assert_eq!(by_name, by_contour, "{name} with {method}");
            }
        }
    }

    #[test]
    fn test_elongated_beam_is_closer_to_ellipse_than_triangle() {
        let scorer = scorer();
        let beam = beam_contour();
        let method = ShapeMatchMethod::I2;
        let ellipse = scorer.similarity(&beam, &"ellipse".into(), method).unwrap();
        let triangle = scorer.similarity(&beam, &"triangle".into(), method).unwrap();
        assert!(ellipse > 0.0);
        assert!(ellipse < triangle, "ellipse {ellipse} vs triangle {triangle}");
    }

    #[test]
    fn test_unknown_template_name() {
        let result = scorer().similarity(&beam_contour(), &"TEST".into(), ShapeMatchMethod::I1);
        assert!(matches!(result, Err(BeamError::Input(msg)) if msg.contains("TEST")));
    }

    #[test]
    fn test_template_from_json() {
        assert_eq!(Template::from_json(&json!("circle")).unwrap(), Template::from("circle"));

        let contour = Template::from_json(&json!([[[0, 0]], [[4, 0]], [[4, 4]]])).unwrap();
        assert_eq!(contour, Template::Contour(Contour::new(vec![[0, 0], [4, 0], [4, 4]])));

        let wrong_shape = Template::from_json(&json!(vec![vec![0; 10]; 10]));
        assert!(matches!(wrong_shape, Err(BeamError::Input(msg)) if msg.contains("(10, 10)")));

        let wrong_type = Template::from_json(&json!(false));
        assert!(matches!(wrong_type, Err(BeamError::Input(msg)) if msg.contains("bool")));
    }

    #[test]
    fn test_catalogue_images_are_normalized() {
        // 16-bit template: only usable after rescaling to 8-bit
        let spot = image::ImageBuffer::from_fn(50, 50, |x, y| {
            let inside = (20..30).contains(&x) && (15..35).contains(&y);
            Luma([if inside { 40_000u16 } else { 1_000 }])
        });
        let catalogue = TemplateCatalogue::builder()
            .add("spot", DynamicImage::ImageLuma16(spot))
            .build();
        let scorer = SimilarityScorer::new(Arc::new(catalogue), ContourConfig::default());

        let contour = scorer.template_contour("spot").unwrap();
        assert_eq!(crate::selection::contour_area(&contour), 9.0 * 19.0);
    }

    #[test]
    fn test_template_without_contours() {
        let catalogue = TemplateCatalogue::builder()
            .add("blank", DynamicImage::ImageLuma8(GrayImage::new(10, 10)))
            .build();
        let scorer = SimilarityScorer::new(Arc::new(catalogue), ContourConfig::default());
        let result = scorer.similarity(&beam_contour(), &"blank".into(), ShapeMatchMethod::I1);
        assert!(matches!(result, Err(BeamError::NoContoursDetected)));
    }

    #[test]
    fn test_similarities_cover_catalogue() {
        let scorer = scorer();
        let scores = scorer.similarities(&beam_contour(), ShapeMatchMethod::I1).unwrap();
        assert_eq!(scores.len(), scorer.catalogue().len());
        assert!(scores.values().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_method_indices() {
        for method in ShapeMatchMethod::iter() {
            assert_eq!(ShapeMatchMethod::from_index(method.index()).unwrap(), method);
        }
        assert!(matches!(ShapeMatchMethod::from_index(3), Err(BeamError::Input(_))));
        assert_eq!(ShapeMatchMethod::default(), ShapeMatchMethod::I1);
    }

    #[test]
    fn test_degenerate_against_real_shape() {
        let line = Contour::new(vec![[0, 0], [9, 0]]);
        assert_eq!(match_shapes(&beam_contour(), &line, ShapeMatchMethod::I2), f64::MAX);
        assert_eq!(match_shapes(&line, &line, ShapeMatchMethod::I2), 0.0);
    }
}
