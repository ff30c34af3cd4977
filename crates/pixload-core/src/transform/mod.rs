//! Raster transforms applied after decoding: exact-size scaling and
//! orientation correction.
//!
//! # Ownership
//!
//! Every transform takes its input raster by value and returns a
//! [`Transformed`]. When the transform is a no-op the input comes back as
//! `image` and nothing is superseded. Otherwise the new raster is `image` and
//! the input is handed back in `superseded`, so the caller releases it exactly
//! once.

mod rotation;
mod scale;

pub use rotation::rotate;
pub use scale::{exact_destination, resize, scale_exactly, should_resize};

use crate::raster::RasterImage;

/// Result of a transform step.
#[derive(Debug)]
#[must_use = "a superseded raster must be released"]
pub struct Transformed {
    /// The raster to continue with.
    pub image: RasterImage,
    /// The input raster, if `image` replaced it.
    pub superseded: Option<RasterImage>,
}

impl Transformed {
    /// The input was returned as-is.
    pub fn unchanged(image: RasterImage) -> Self {
        Self {
            image,
            superseded: None,
        }
    }

    /// `image` replaces `old`.
    pub fn replaced(image: RasterImage, old: RasterImage) -> Self {
        Self {
            image,
            superseded: Some(old),
        }
    }

    pub fn is_replaced(&self) -> bool {
        self.superseded.is_some()
    }

    /// Hand the superseded raster, if any, to `release` and return the result.
    pub fn finish(self, release: impl FnOnce(RasterImage)) -> RasterImage {
        if let Some(old) = self.superseded {
            release(old);
        }
        self.image
    }
}
