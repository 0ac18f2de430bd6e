use geo::BoundingRect;
use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BeamError, Result};

/// Whether a contour traces the outside of a region or the inside of a hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderKind {
    #[default]
    Outer,
    Hole,
}

impl From<imageproc::contours::BorderType> for BorderKind {
    fn from(border: imageproc::contours::BorderType) -> Self {
        match border {
            imageproc::contours::BorderType::Outer => Self::Outer,
            imageproc::contours::BorderType::Hole => Self::Hole,
        }
    }
}

/// Closed polygon boundary in integer pixel coordinates.
///
/// Its array form has shape `(n, 1, 2)`: one `[x, y]` pair per point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[i32; 2]>,
    #[serde(default)]
    pub border: BorderKind,
    /// Index of the enclosing contour in the set this one was extracted with
    #[serde(default)]
    pub parent: Option<usize>,
}

impl Contour {
    pub fn new(points: Vec<[i32; 2]>) -> Self {
        Self {
            points,
            border: BorderKind::Outer,
            parent: None,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Array shape of the contour, always `[n, 1, 2]`
    pub fn shape(&self) -> [usize; 3] {
        [self.points.len(), 1, 2]
    }

    /// Build a contour from a flat row-major buffer and its array shape.
    pub fn from_shape_vec(shape: &[usize], data: Vec<i32>) -> Result<Self> {
        if shape.len() != 3 || shape[1..] != [1, 2] {
            return Err(BeamError::Input(format!(
                "Template contour does not have the standard contour shape, \
                 expected (n, 1, 2), got {}",
                format_shape(shape)
            )));
        }
        let expected = shape[0] * 2;
        if data.len() != expected {
            return Err(BeamError::Input(format!(
                "Contour data holds {} values but shape {} needs {}",
                data.len(),
                format_shape(shape),
                expected
            )));
        }

        let points = data.chunks_exact(2).map(|xy| [xy[0], xy[1]]).collect();
        Ok(Self::new(points))
    }

    /// Parse a nested JSON array of shape `(n, 1, 2)`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let shape = array_shape(value).map_err(BeamError::Input)?;
        let mut data = Vec::new();
        flatten_integers(value, &mut data)?;
        Self::from_shape_vec(&shape, data)
    }

    /// Nested array form, `[[[x, y]], ...]`
    pub fn to_nested(&self) -> Vec<[[i32; 2]; 1]> {
        self.points.iter().map(|&p| [p]).collect()
    }

    /// Convert to a geo-types polygon for geometric operations
    pub fn to_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|&[x, y]| Coord {
                x: f64::from(x),
                y: f64::from(y),
            })
            .collect();
        Polygon::new(LineString::new(coords), vec![])
    }
}

/// Minimal upright rectangle around a contour, inclusive of its edge pixels.
///
/// `(x, y)` is the corner nearest the image origin. With image rows growing
/// downward that is the top-left corner; plotted with an upward y axis it is
/// the bottom-left one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn of_contour(contour: &Contour) -> Option<Self> {
        let rect = contour.to_polygon().bounding_rect()?;
        let (min, max) = (rect.min(), rect.max());

        // Corners are integer pixel centres; the extent covers both edge pixels
        Some(Self {
            x: min.x as i32,
            y: min.y as i32,
            width: (max.x - min.x) as i32 + 1,
            height: (max.y - min.y) as i32 + 1,
        })
    }

    /// `(x, y, width, height)`
    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn size(&self) -> ContourSize {
        ContourSize {
            length: self.height,
            width: self.width,
        }
    }
}

/// `(length, width)` of a contour: the bounding box height and width.
///
/// `length` is not necessarily the longer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourSize {
    pub length: i32,
    pub width: i32,
}

impl ContourSize {
    pub fn as_tuple(&self) -> (i32, i32) {
        (self.length, self.width)
    }
}

pub(crate) fn format_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({single},)"),
        _ => {
            let dims: Vec<String> = shape.iter().map(usize::to_string).collect();
            format!("({})", dims.join(", "))
        }
    }
}

/// Name of a JSON value's type, for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn array_shape(value: &Value) -> std::result::Result<Vec<usize>, String> {
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    let mut shape = vec![items.len()];
    if let Some((first, rest)) = items.split_first() {
        let inner = array_shape(first)?;
        for item in rest {
            if array_shape(item)? != inner {
                return Err("Contour array is ragged, expected shape (n, 1, 2)".to_string());
            }
        }
        shape.extend(inner);
    }
    Ok(shape)
}

fn flatten_integers(value: &Value, out: &mut Vec<i32>) -> Result<()> {
    match value {
        Value::Array(items) => items.iter().try_for_each(|item| flatten_integers(item, out)),
        Value::Number(n) => {
            let v = n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| {
                    BeamError::Input(format!("Contour coordinates must be 32-bit integers, got {n}"))
                })?;
            out.push(v);
            Ok(())
        }
        other => Err(BeamError::Input(format!(
            "Contour coordinates must be integers, got {}",
            json_type_name(other)
        ))),
    }
}
