//! Projective transform between the source and target page scans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;

/// Denominators smaller than this are treated as points at infinity.
pub const MIN_W: f32 = 1e-6;

/// 3x3 row-major homography mapping source UV into target UV.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Homography([f32; 9]);

/// Where the warped target should be read for one fragment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetLookup {
    Sample([f32; 2]),
    Grey,
}

impl Homography {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// All-ones matrix the projective overlay starts with before a pair is
    /// chosen. Every UV maps to `(1, 1)` since both numerators equal the
    /// denominator `x + y + 1`.
    pub const PLACEHOLDER: Self = Self([1.0; 9]);

    pub const fn new(rows: [f32; 9]) -> Self {
        Self(rows)
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, OverlayError> {
        if values.len() != 9 {
            return Err(OverlayError::HomographyLength(values.len()));
        }
        let mut m = [0.0f32; 9];
        for (dst, src) in m.iter_mut().zip(values) {
            *dst = *src as f32;
        }
        Ok(Self(m))
    }

    pub fn as_array(&self) -> &[f32; 9] {
        &self.0
    }

    /// Divide the translation terms by the canvas size so a matrix estimated
    /// in pixels moves in UV units inside the shader.
    pub fn scaled_to_canvas(mut self, width: u32, height: u32) -> Self {
        if width > 0 {
            self.0[2] /= width as f32;
        }
        if height > 0 {
            self.0[5] /= height as f32;
        }
        self
    }

    /// `H · [x, y, 1]` before the projective divide.
    pub fn apply(&self, x: f32, y: f32) -> [f32; 3] {
        let m = &self.0;
        [
            m[0] * x + m[1] * y + m[2],
            m[3] * x + m[4] * y + m[5],
            m[6] * x + m[7] * y + m[8],
        ]
    }

    /// Map `(x, y)` through the matrix; `None` at infinity.
    pub fn project(&self, x: f32, y: f32) -> Option<[f32; 2]> {
        let [px, py, w] = self.apply(x, y);
        if w.abs() < MIN_W {
            return None;
        }
        Some([px / w, py / w])
    }

    /// Target lookup for a fragment at `uv`, grey outside `[0, 1]²`.
    pub fn lookup(&self, uv: [f32; 2]) -> TargetLookup {
        match self.project(uv[0], uv[1]) {
            Some(p) if p.iter().all(|c| (0.0..=1.0).contains(c)) => TargetLookup::Sample(p),
            _ => TargetLookup::Grey,
        }
    }
}

impl Default for Homography {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

impl TryFrom<Vec<f64>> for Homography {
    type Error = OverlayError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl From<Homography> for Vec<f64> {
    fn from(h: Homography) -> Self {
        h.0.iter().map(|v| f64::from(*v)).collect()
    }
}

impl fmt::Display for Homography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.0;
        write!(
            f,
            "[{} {} {}; {} {} {}; {} {} {}]",
            m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8]
        )
    }
}
