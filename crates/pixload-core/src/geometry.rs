//! Dimension and rotation value types shared by the planner and transforms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width and height exchanged.
    #[inline]
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// True if either side is zero.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Per-axis truncating ratio `self / target`, as `(width_scale, height_scale)`.
    ///
    /// `target` must have no zero side.
    #[inline]
    pub fn integer_ratio(self, target: Dimensions) -> (u32, u32) {
        (self.width / target.width, self.height / target.height)
    }

    /// Per-axis floating ratio `self / target`, as `(width_scale, height_scale)`.
    #[inline]
    pub fn float_ratio(self, target: Dimensions) -> (f32, f32) {
        (
            self.width as f32 / target.width as f32,
            self.height as f32 / target.height as f32,
        )
    }

    /// Dimensions after decoding with the given subsampling factor.
    ///
    /// Each side is rounded up so that no edge pixel row/column is lost.
    pub fn subsampled(self, factor: u32) -> Self {
        let factor = factor.max(1);
        Self {
            width: self.width.div_ceil(factor).max(1),
            height: self.height.div_ceil(factor).max(1),
        }
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationAngle {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    /// Map a degree value to an angle; only multiples of 90 are accepted.
    ///
    /// Negative and over-full turns are normalized first, so `-90` is `Deg270`
    /// and `450` is `Deg90`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(RotationAngle::Deg0),
            90 => Some(RotationAngle::Deg90),
            180 => Some(RotationAngle::Deg180),
            270 => Some(RotationAngle::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            RotationAngle::Deg0 => 0,
            RotationAngle::Deg90 => 90,
            RotationAngle::Deg180 => 180,
            RotationAngle::Deg270 => 270,
        }
    }

    /// Returns true if rotating by this angle exchanges width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, RotationAngle::Deg90 | RotationAngle::Deg270)
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == RotationAngle::Deg0
    }

    /// Dimensions of a `width`x`height` raster after this rotation.
    pub fn rotated(self, dims: Dimensions) -> Dimensions {
        if self.swaps_dimensions() {
            dims.swapped()
        } else {
            dims
        }
    }
}

impl fmt::Display for RotationAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Round a non-negative float to the nearest integer pixel count.
#[inline]
pub(crate) fn round_px(value: f32) -> u32 {
    value.round().max(0.0) as u32
}
