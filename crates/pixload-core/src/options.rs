//! Caller-supplied decode options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How subsampling and post-decode scaling behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScalePolicy {
    /// Decode at native resolution, no scaling.
    None,
    /// Subsample by a power of two, keeping the result at least target-sized.
    #[default]
    PowerOfTwoSubsample,
    /// Subsample by an integer factor, then shrink to the exact target box.
    ExactFit,
    /// Subsample by an integer factor, then conform to the exact target box,
    /// growing or shrinking as needed.
    ExactFitStretched,
}

impl ScalePolicy {
    /// Returns true for policies that scale after decoding.
    #[inline]
    pub fn scales_exactly(self) -> bool {
        matches!(self, ScalePolicy::ExactFit | ScalePolicy::ExactFitStretched)
    }
}

/// Whether the result must fit inside the target box or cover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitPolicy {
    #[default]
    FitInside,
    Crop,
}

/// Pixel layout of the decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    #[default]
    Rgba8,
    Rgb8,
    Luma8,
    LumaA8,
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Opaque key/value parameters forwarded to the byte-stream source.
pub type ExtraParams = BTreeMap<String, String>;

/// Pixel-format and resampling hints for a decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Preferred pixel layout of the final raster.
    pub pixel_format: PixelFormat,
    /// Interpolation used when exact scaling resizes the raster.
    pub filter: FilterType,
    /// Parameters handed to every stream open for this decode.
    #[serde(default)]
    pub extra: ExtraParams,
}

impl DecodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = pixel_format;
        self
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
