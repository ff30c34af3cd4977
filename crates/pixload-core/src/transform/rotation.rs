//! Quarter-turn rotation for orientation correction.

use super::Transformed;
use crate::geometry::RotationAngle;
use crate::raster::RasterImage;

/// Rotate `image` clockwise by `angle` around its center.
///
/// The whole raster is the rotation source. Any non-zero angle produces a new
/// buffer and supersedes the input; `Deg0` returns the input unchanged.
pub fn rotate(image: RasterImage, angle: RotationAngle) -> Transformed {
    let rotated = match angle {
        RotationAngle::Deg0 => return Transformed::unchanged(image),
        RotationAngle::Deg90 => image.as_dynamic().rotate90(),
        RotationAngle::Deg180 => image.as_dynamic().rotate180(),
        RotationAngle::Deg270 => image.as_dynamic().rotate270(),
    };
    Transformed::replaced(RasterImage::from_dynamic(rotated), image)
}
