//! Polygon moments of a contour up to third order.
//!
//! Raw moments are integrals over the region enclosed by the contour,
//! evaluated edge by edge with Green's theorem. Traversal direction does not
//! matter: the sign of the enclosed area is factored out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::ContourConfig,
    error::{BeamError, Result},
    selection::largest_contour,
    source::{Resolved, Source},
    types::Contour,
};

/// Raw (`m`), central (`mu`) and normalized central (`nu`) moments
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,
    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
    pub mu30: f64,
    pub mu21: f64,
    pub mu12: f64,
    pub mu03: f64,
    pub nu20: f64,
    pub nu11: f64,
    pub nu02: f64,
    pub nu30: f64,
    pub nu21: f64,
    pub nu12: f64,
    pub nu03: f64,
}

impl Moments {
    pub const NAMES: [&'static str; 24] = [
        "m00", "m10", "m01", "m20", "m11", "m02", "m30", "m21", "m12", "m03",
        "mu20", "mu11", "mu02", "mu30", "mu21", "mu12", "mu03",
        "nu20", "nu11", "nu02", "nu30", "nu21", "nu12", "nu03",
    ];

    pub fn of_contour(contour: &Contour) -> Self {
        let raw = RawMoments::of_points(&contour.points);
        raw.complete()
    }

    fn values(&self) -> [f64; 24] {
        [
            self.m00, self.m10, self.m01, self.m20, self.m11, self.m02,
            self.m30, self.m21, self.m12, self.m03,
            self.mu20, self.mu11, self.mu02, self.mu30, self.mu21, self.mu12, self.mu03,
            self.nu20, self.nu11, self.nu02, self.nu30, self.nu21, self.nu12, self.nu03,
        ]
    }

    /// Look a moment up by name, e.g. `"m10"` or `"nu21"`
    pub fn get(&self, name: &str) -> Option<f64> {
        Self::NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.values()[i])
    }

    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        Self::NAMES.into_iter().zip(self.values()).collect()
    }

    /// Centroid `(m10 / m00, m01 / m00)`, truncated toward zero.
    ///
    /// Requires `m00 != 0`; contours surviving [`largest_contour`] always
    /// satisfy it.
    pub fn centroid(&self) -> Result<(i64, i64)> {
        if self.m00 == 0.0 || !self.m00.is_finite() {
            return Err(BeamError::DegenerateMoments { m00: self.m00 });
        }
        let cx = (self.m10 / self.m00).trunc();
        let cy = (self.m01 / self.m00).trunc();
        Ok((cx as i64, cy as i64))
    }

    /// The seven Hu invariants built from the normalized central moments
    pub fn hu(&self) -> [f64; 7] {
        let (nu20, nu11, nu02) = (self.nu20, self.nu11, self.nu02);
        let (nu30, nu21, nu12, nu03) = (self.nu30, self.nu21, self.nu12, self.nu03);

        let mut t0 = nu30 + nu12;
        let mut t1 = nu21 + nu03;
        let q0 = t0 * t0;
        let q1 = t1 * t1;
        let n4 = 4.0 * nu11;
        let s = nu20 + nu02;
        let d = nu20 - nu02;

        let hu0 = s;
        let hu1 = d * d + n4 * nu11;
        let hu3 = q0 + q1;
        let hu5 = d * (q0 - q1) + n4 * t0 * t1;

        t0 *= q0 - 3.0 * q1;
        t1 *= 3.0 * q0 - q1;

        let r0 = nu30 - 3.0 * nu12;
        let r1 = 3.0 * nu21 - nu03;

        let hu2 = r0 * r0 + r1 * r1;
        let hu4 = r0 * t0 + r1 * t1;
        let hu6 = r1 * t0 - r0 * t1;

        [hu0, hu1, hu2, hu3, hu4, hu5, hu6]
    }
}

/// Moments of the contour in `source`, or of the largest contour of its image.
pub fn moments(source: Source<'_, Contour>, config: &ContourConfig) -> Result<Moments> {
    match source.resolve("contour")? {
        Resolved::Image(image) => {
            let (contour, _) = largest_contour(Source::image(image), config)?;
            Ok(Moments::of_contour(&contour))
        }
        Resolved::Given(contour) => Ok(Moments::of_contour(contour)),
    }
}

/// Integer centroid of `moments`; see [`Moments::centroid`]
pub fn centroid(moments: &Moments) -> Result<(i64, i64)> {
    moments.centroid()
}

struct RawMoments {
    a00: f64,
    a10: f64,
    a01: f64,
    a20: f64,
    a11: f64,
    a02: f64,
    a30: f64,
    a21: f64,
    a12: f64,
    a03: f64,
}

impl RawMoments {
    // Accumulates the doubled, scaled edge integrals; `complete` divides them out.
    fn of_points(points: &[[i32; 2]]) -> Self {
        let mut acc = Self {
            a00: 0.0, a10: 0.0, a01: 0.0, a20: 0.0, a11: 0.0,
            a02: 0.0, a30: 0.0, a21: 0.0, a12: 0.0, a03: 0.0,
        };
        let Some(&[lx, ly]) = points.last() else {
            return acc;
        };

        let (mut xp, mut yp) = (f64::from(lx), f64::from(ly));
        for &[x, y] in points {
            let (xi, yi) = (f64::from(x), f64::from(y));
            let xi2 = xi * xi;
            let yi2 = yi * yi;
            let dxy = xp * yi - xi * yp;
            let xs = xp + xi;
            let ys = yp + yi;

            acc.a00 += dxy;
            acc.a10 += dxy * xs;
            acc.a01 += dxy * ys;
            acc.a20 += dxy * (xp * xs + xi2);
            acc.a11 += dxy * (xp * (ys + yp) + xi * (ys + yi));
            acc.a02 += dxy * (yp * ys + yi2);
            acc.a30 += dxy * xs * (xp * xp + xi2);
            acc.a03 += dxy * ys * (yp * yp + yi2);
            acc.a21 += dxy * (xp * xp * (3.0 * yp + yi) + 2.0 * xi * xp * ys + xi2 * (yp + 3.0 * yi));
            acc.a12 += dxy * (yp * yp * (3.0 * xp + xi) + 2.0 * yi * yp * xs + yi2 * (xp + 3.0 * xi));

            xp = xi;
            yp = yi;
        }
        acc
    }

    fn complete(&self) -> Moments {
        let mut m = Moments::default();
        if self.a00.abs() <= f64::from(f32::EPSILON) {
            return m;
        }

        let sign = self.a00.signum();
        m.m00 = sign * self.a00 / 2.0;
        m.m10 = sign * self.a10 / 6.0;
        m.m01 = sign * self.a01 / 6.0;
        m.m20 = sign * self.a20 / 12.0;
        m.m11 = sign * self.a11 / 24.0;
        m.m02 = sign * self.a02 / 12.0;
        m.m30 = sign * self.a30 / 20.0;
        m.m21 = sign * self.a21 / 60.0;
        m.m12 = sign * self.a12 / 60.0;
        m.m03 = sign * self.a03 / 20.0;

        let (cx, cy, inv_m00) = if m.m00.abs() > f64::EPSILON {
            (m.m10 / m.m00, m.m01 / m.m00, 1.0 / m.m00)
        } else {
            (0.0, 0.0, 0.0)
        };

        m.mu20 = m.m20 - m.m10 * cx;
        m.mu11 = m.m11 - m.m10 * cy;
        m.mu02 = m.m02 - m.m01 * cy;
        m.mu30 = m.m30 - cx * (3.0 * m.mu20 + cx * m.m10);
        m.mu21 = m.m21 - cx * (2.0 * m.mu11 + cx * m.m01) - cy * m.mu20;
        m.mu12 = m.m12 - cy * (2.0 * m.mu11 + cy * m.m10) - cx * m.mu02;
        m.mu03 = m.m03 - cy * (3.0 * m.mu02 + cy * m.m01);

        let s2 = inv_m00 * inv_m00;
        let s3 = s2 * inv_m00.abs().sqrt();
        m.nu20 = m.mu20 * s2;
        m.nu11 = m.mu11 * s2;
        m.nu02 = m.mu02 * s2;
        m.nu30 = m.mu30 * s3;
        m.nu21 = m.mu21 * s3;
        m.nu12 = m.mu12 * s3;
        m.nu03 = m.mu03 * s3;

        m
    }
}
