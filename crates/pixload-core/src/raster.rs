//! Owned decoded rasters.

use image::DynamicImage;

use crate::geometry::Dimensions;
use crate::options::PixelFormat;

/// A decoded image that owns its pixel buffer.
///
/// A raster has exactly one owner. Transforms take it by value and hand back
/// either the same raster or a new one; in the latter case the superseded
/// raster is passed to [`RasterImage::release`].
#[derive(Debug, Clone)]
pub struct RasterImage {
    image: DynamicImage,
}

impl RasterImage {
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Create an RGBA raster from raw bytes. Returns `None` if the buffer length
    /// does not match `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        image::RgbaImage::from_raw(width, height, pixels)
            .map(|buf| Self::from_dynamic(DynamicImage::ImageRgba8(buf)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    /// Pixel layout, or `None` for layouts outside [`PixelFormat`].
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        match self.image {
            DynamicImage::ImageRgba8(_) => Some(PixelFormat::Rgba8),
            DynamicImage::ImageRgb8(_) => Some(PixelFormat::Rgb8),
            DynamicImage::ImageLuma8(_) => Some(PixelFormat::Luma8),
            DynamicImage::ImageLumaA8(_) => Some(PixelFormat::LumaA8),
            _ => None,
        }
    }

    /// Raw pixel bytes in row-major order.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_bytes()
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.image.as_bytes().len()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Convert to the given layout. A raster already in that layout is returned
    /// as-is without copying.
    pub fn into_format(self, format: PixelFormat) -> Self {
        if self.pixel_format() == Some(format) {
            return self;
        }
        let image = match format {
            PixelFormat::Rgba8 => DynamicImage::ImageRgba8(self.image.into_rgba8()),
            PixelFormat::Rgb8 => DynamicImage::ImageRgb8(self.image.into_rgb8()),
            PixelFormat::Luma8 => DynamicImage::ImageLuma8(self.image.into_luma8()),
            PixelFormat::LumaA8 => DynamicImage::ImageLumaA8(self.image.into_luma_alpha8()),
        };
        Self { image }
    }

    /// Free the pixel buffer. Consumes the raster so it cannot be released twice.
    pub fn release(self) {
        drop(self.image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> RasterImage {
        RasterImage::from_rgba8(width, height, vec![200u8; (width * height * 4) as usize])
            .unwrap()
    }

    #[test]
    fn test_raster_creation() {
        let img = solid(100, 50);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.dimensions(), Dimensions::new(100, 50));
        assert_eq!(img.byte_size(), 100 * 50 * 4);
        assert_eq!(img.pixel_format(), Some(PixelFormat::Rgba8));
    }

    #[test]
    fn test_from_rgba8_rejects_bad_length() {
        assert!(RasterImage::from_rgba8(10, 10, vec![0u8; 12]).is_none());
    }

    #[test]
    fn test_into_format_same_layout_keeps_buffer() {
        let img = solid(4, 4);
        let ptr = img.as_bytes().as_ptr();
        let converted = img.into_format(PixelFormat::Rgba8);
        assert_eq!(converted.as_bytes().as_ptr(), ptr);
    }

    #[test]
    fn test_into_format_converts() {
        let rgb = solid(4, 3).into_format(PixelFormat::Rgb8);
        assert_eq!(rgb.pixel_format(), Some(PixelFormat::Rgb8));
        assert_eq!(rgb.byte_size(), 4 * 3 * 3);

        let luma = rgb.into_format(PixelFormat::Luma8);
        assert_eq!(luma.pixel_format(), Some(PixelFormat::Luma8));
        assert_eq!(luma.byte_size(), 12);
    }
}
