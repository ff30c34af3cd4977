//! Exact-size scaling of a subsampled raster.
//!
//! Subsampling only reaches integer fractions of the native size. Exact
//! scaling then fits the raster to the target box, keeping aspect ratio:
//! `FitInside` matches the box on the dominant axis, `Crop` on the other one.

use super::Transformed;
use crate::geometry::{round_px, Dimensions};
use crate::options::{FilterType, FitPolicy, ScalePolicy};
use crate::raster::RasterImage;

/// Destination box for scaling `source` to `target` under `fit_policy`.
///
/// `target` must have no zero side. Each returned side is at least 1.
pub fn exact_destination(source: Dimensions, target: Dimensions, fit_policy: FitPolicy) -> Dimensions {
    let (width_scale, height_scale) = source.float_ratio(target);

    let match_width = match fit_policy {
        FitPolicy::FitInside => width_scale >= height_scale,
        FitPolicy::Crop => width_scale < height_scale,
    };

    if match_width {
        Dimensions::new(
            target.width,
            round_px(source.height as f32 / width_scale).max(1),
        )
    } else {
        Dimensions::new(
            round_px(source.width as f32 / height_scale).max(1),
            target.height,
        )
    }
}

/// Whether `scale_policy` resizes a `source` raster to `destination`.
///
/// `ExactFit` only ever shrinks, and only when both sides get smaller.
/// `ExactFitStretched` resizes whenever both sides differ. Other policies never
/// resize.
pub fn should_resize(scale_policy: ScalePolicy, source: Dimensions, destination: Dimensions) -> bool {
    match scale_policy {
        ScalePolicy::ExactFit => {
            destination.width < source.width && destination.height < source.height
        }
        ScalePolicy::ExactFitStretched => {
            destination.width != source.width && destination.height != source.height
        }
        ScalePolicy::None | ScalePolicy::PowerOfTwoSubsample => false,
    }
}

/// Resize `image` to `size`, keeping its pixel layout.
///
/// A raster already of that size is returned unchanged; a zero-sized target
/// also leaves the raster untouched.
pub fn resize(image: RasterImage, size: Dimensions, filter: FilterType) -> Transformed {
    if size.is_empty() || image.dimensions() == size {
        return Transformed::unchanged(image);
    }
    let resized = image
        .as_dynamic()
        .resize_exact(size.width, size.height, filter.to_image_filter());
    Transformed::replaced(RasterImage::from_dynamic(resized), image)
}

/// Scale `image` toward `target` per the exact scale policies.
///
/// Returns the input unchanged when the policy does not call for a resize.
pub fn scale_exactly(
    image: RasterImage,
    target: Dimensions,
    scale_policy: ScalePolicy,
    fit_policy: FitPolicy,
    filter: FilterType,
) -> Transformed {
    if target.is_empty() {
        return Transformed::unchanged(image);
    }
    let source = image.dimensions();
    let destination = exact_destination(source, target, fit_policy);

    if should_resize(scale_policy, source, destination) {
        resize(image, destination, filter)
    } else {
        Transformed::unchanged(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> RasterImage {
        // Simple gradient so resampling has something to do
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
                pixels.push(255);
            }
        }
        RasterImage::from_rgba8(width, height, pixels).unwrap()
    }

    fn d(width: u32, height: u32) -> Dimensions {
        Dimensions::new(width, height)
    }

    #[test]
    fn test_destination_fit_inside_landscape() {
        // width_scale 5.0 >= height_scale 2.5: match width
        assert_eq!(exact_destination(d(1000, 500), d(200, 200), FitPolicy::FitInside), d(200, 100));
    }

    #[test]
    fn test_destination_fit_inside_portrait() {
        assert_eq!(exact_destination(d(500, 1000), d(200, 200), FitPolicy::FitInside), d(100, 200));
    }

    #[test]
    fn test_destination_crop() {
        assert_eq!(exact_destination(d(1000, 500), d(200, 200), FitPolicy::Crop), d(400, 200));
        assert_eq!(exact_destination(d(500, 1000), d(200, 200), FitPolicy::Crop), d(200, 400));
    }

    #[test]
    fn test_destination_rounds() {
        // 6000x4000 into 2560x2560: 4000 / (6000/2560) = 1706.67
        assert_eq!(exact_destination(d(6000, 4000), d(2560, 2560), FitPolicy::FitInside), d(2560, 1707));
    }

    #[test]
    fn test_destination_never_zero() {
        let dest = exact_destination(d(10_000, 1), d(100, 100), FitPolicy::FitInside);
        assert_eq!(dest, d(100, 1));
    }

    #[test]
    fn test_should_resize_exact_fit_only_shrinks() {
        assert!(should_resize(ScalePolicy::ExactFit, d(400, 200), d(200, 100)));
        assert!(!should_resize(ScalePolicy::ExactFit, d(100, 50), d(200, 100)));
        assert!(!should_resize(ScalePolicy::ExactFit, d(200, 150), d(200, 100)));
    }

    #[test]
    fn test_should_resize_stretched_both_directions() {
        assert!(should_resize(ScalePolicy::ExactFitStretched, d(400, 200), d(200, 100)));
        assert!(should_resize(ScalePolicy::ExactFitStretched, d(100, 50), d(200, 100)));
        assert!(!should_resize(ScalePolicy::ExactFitStretched, d(200, 50), d(200, 100)));
    }

    #[test]
    fn test_should_resize_other_policies_never() {
        assert!(!should_resize(ScalePolicy::None, d(400, 200), d(200, 100)));
        assert!(!should_resize(ScalePolicy::PowerOfTwoSubsample, d(400, 200), d(200, 100)));
    }

    #[test]
    fn test_resize_basic() {
        let result = resize(create_test_image(100, 50), d(50, 25), FilterType::Bilinear);
        assert!(result.is_replaced());
        assert_eq!(result.image.dimensions(), d(50, 25));
        assert_eq!(result.image.byte_size(), 50 * 25 * 4);
    }

    #[test]
    fn test_resize_same_dimensions_is_unchanged() {
        let img = create_test_image(100, 50);
        let ptr = img.as_bytes().as_ptr();
        let result = resize(img, d(100, 50), FilterType::Lanczos3);
        assert!(!result.is_replaced());
        assert_eq!(result.image.as_bytes().as_ptr(), ptr);
    }

    #[test]
    fn test_resize_zero_size_is_unchanged() {
        let result = resize(create_test_image(10, 10), d(0, 5), FilterType::Nearest);
        assert!(!result.is_replaced());
    }

    #[test]
    fn test_all_filter_types() {
        for filter in [FilterType::Nearest, FilterType::Bilinear, FilterType::Lanczos3] {
            let result = resize(create_test_image(100, 50), d(50, 25), filter);
            assert_eq!(result.image.dimensions(), d(50, 25));
        }
    }

    #[test]
    fn test_exact_fit_never_upsizes() {
        let img = create_test_image(100, 50);
        let ptr = img.as_bytes().as_ptr();
        let result = scale_exactly(img, d(400, 400), ScalePolicy::ExactFit, FitPolicy::FitInside, FilterType::Lanczos3);
        assert!(!result.is_replaced());
        assert_eq!(result.image.as_bytes().as_ptr(), ptr);
        assert_eq!(result.image.dimensions(), d(100, 50));
    }

    #[test]
    fn test_exact_fit_shrinks() {
        let result = scale_exactly(
            create_test_image(400, 200),
            d(100, 100),
            ScalePolicy::ExactFit,
            FitPolicy::FitInside,
            FilterType::Lanczos3,
        );
        assert!(result.is_replaced());
        assert_eq!(result.image.dimensions(), d(100, 50));
        assert_eq!(result.superseded.map(|old| old.dimensions()), Some(d(400, 200)));
    }

    #[test]
    fn test_exact_fit_stretched_grows() {
        let result = scale_exactly(
            create_test_image(100, 50),
            d(400, 400),
            ScalePolicy::ExactFitStretched,
            FitPolicy::FitInside,
            FilterType::Bilinear,
        );
        assert!(result.is_replaced());
        assert_eq!(result.image.dimensions(), d(400, 200));
    }

    #[test]
    fn test_exact_fit_stretched_crop() {
        let result = scale_exactly(
            create_test_image(100, 50),
            d(300, 300),
            ScalePolicy::ExactFitStretched,
            FitPolicy::Crop,
            FilterType::Bilinear,
        );
        assert_eq!(result.image.dimensions(), d(600, 300));
    }

    #[test]
    fn test_exact_scaling_keeps_pixel_format() {
        let img = create_test_image(40, 20).into_format(crate::options::PixelFormat::Rgb8);
        let result = scale_exactly(img, d(10, 10), ScalePolicy::ExactFit, FitPolicy::FitInside, FilterType::Lanczos3);
        assert_eq!(result.image.pixel_format(), Some(crate::options::PixelFormat::Rgb8));
        assert_eq!(result.image.dimensions(), d(10, 5));
    }
}
