use preprocessing::ThresholdConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// How much of a traced boundary is kept
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChainApproximation {
    /// Every boundary pixel
    None,
    /// Straight horizontal, vertical and diagonal runs reduced to their end points
    #[default]
    Simple,
}

impl ChainApproximation {
    pub fn apply(self, points: Vec<[i32; 2]>) -> Vec<[i32; 2]> {
        match self {
            Self::None => points,
            Self::Simple => compress_runs(points),
        }
    }
}

/// Settings shared by every stage that goes from an image to contours
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ContourConfig {
    pub threshold: ThresholdConfig,
    pub approximation: ChainApproximation,
}

impl ContourConfig {
    pub fn new(threshold: ThresholdConfig) -> Self {
        Self {
            threshold,
            approximation: ChainApproximation::default(),
        }
    }

    pub fn with_approximation(mut self, approximation: ChainApproximation) -> Self {
        self.approximation = approximation;
        self
    }
}

// A point is dropped when it continues its predecessor's step unchanged.
fn compress_runs(points: Vec<[i32; 2]>) -> Vec<[i32; 2]> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let step = |a: [i32; 2], b: [i32; 2]| [b[0] - a[0], b[1] - a[1]];
    let kept: Vec<[i32; 2]> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() { points } else { kept }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_approximation_keeps_corners() {
        let mut ring = Vec::new();
        for x in 0..5 { ring.push([x, 0]); }
        for y in 1..5 { ring.push([4, y]); }
        for x in (0..4).rev() { ring.push([x, 4]); }
        for y in (1..4).rev() { ring.push([0, y]); }

        let compressed = ChainApproximation::Simple.apply(ring.clone());
        assert_eq!(compressed, vec![[0, 0], [4, 0], [4, 4], [0, 4]]);
        assert_eq!(ChainApproximation::None.apply(ring.clone()), ring);
    }

    #[test]
    fn test_diagonal_runs_collapse() {
        let diamond = vec![[2, 0], [3, 1], [4, 2], [3, 3], [2, 4], [1, 3], [0, 2], [1, 1]];
        let compressed = ChainApproximation::Simple.apply(diamond);
        assert_eq!(compressed, vec![[2, 0], [4, 2], [2, 4], [0, 2]]);
    }

    #[test]
    fn test_tiny_contours_are_untouched() {
        assert_eq!(ChainApproximation::Simple.apply(vec![[1, 1]]), vec![[1, 1]]);
        assert_eq!(
            ChainApproximation::Simple.apply(vec![[1, 1], [2, 1]]),
            vec![[1, 1], [2, 1]]
        );
    }

    #[test]
    fn test_approximation_names() {
        assert_eq!(ChainApproximation::Simple.to_string(), "simple");
        assert_eq!("none".parse::<ChainApproximation>().unwrap(), ChainApproximation::None);
    }
}
