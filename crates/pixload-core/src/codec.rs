//! Header probing and subsampled pixel decoding.
//!
//! JPEG frames are scaled inside the DCT by `jpeg-decoder`, so a large photo
//! never materializes at native resolution. Other formats decode through the
//! `image` crate and are subsampled afterwards.

use std::io::{Seek, SeekFrom};

use image::imageops::FilterType as ResampleFilter;
use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, RgbImage};
use jpeg_decoder::{Decoder as JpegDecoder, PixelFormat as JpegPixelFormat};

use crate::error::{DecodeError, StreamError};
use crate::geometry::Dimensions;
use crate::options::PixelFormat;
use crate::raster::RasterImage;
use crate::source::ImageStream;

/// Largest DCT scale denominator the JPEG decoder supports.
const MAX_DCT_SCALE: u32 = 8;

fn guessed_reader(stream: Box<dyn ImageStream>) -> Result<ImageReader<Box<dyn ImageStream>>, DecodeError> {
    let reader = ImageReader::new(stream)
        .with_guessed_format()
        .map_err(|e| DecodeError::Stream(e.into()))?;
    if reader.format().is_none() {
        return Err(DecodeError::UnknownFormat);
    }
    Ok(reader)
}

/// Read only the image header and return its dimensions.
///
/// No pixel data is decoded. The stream is dropped on return; callers open
/// a new one for the full decode.
pub fn probe_dimensions(stream: Box<dyn ImageStream>) -> Result<Dimensions, DecodeError> {
    let (width, height) = guessed_reader(stream)?.into_dimensions()?;
    Ok(Dimensions::new(width, height))
}

/// Part of `factor` applied inside the JPEG DCT: the largest power of two
/// not above `factor`, capped at 8.
pub(crate) fn dct_scale_for(factor: u32) -> u32 {
    let capped = factor.clamp(1, MAX_DCT_SCALE);
    1 << (u32::BITS - 1 - capped.leading_zeros())
}

/// Decode pixels subsampled by `factor`, converting to `pixel_format`.
///
/// The result is `ceil(native / factor)` on each axis. A factor of 1 keeps
/// the native size. The stream is dropped on every exit path.
pub fn decode_subsampled(
    stream: Box<dyn ImageStream>,
    factor: u32,
    pixel_format: PixelFormat,
) -> Result<RasterImage, DecodeError> {
    let reader = guessed_reader(stream)?;
    let frame = if reader.format() == Some(ImageFormat::Jpeg) {
        decode_jpeg_scaled(reader.into_inner(), factor)?
    } else {
        subsample_decoded(reader.decode()?, factor)?
    };
    Ok(RasterImage::from_dynamic(frame).into_format(pixel_format))
}

/// Nearest-neighbour subsampling of a fully decoded frame.
fn subsample_decoded(decoded: DynamicImage, factor: u32) -> Result<DynamicImage, DecodeError> {
    let native = Dimensions::new(decoded.width(), decoded.height());
    if native.is_empty() {
        return Err(DecodeError::Malformed(format!("empty frame {}", native)));
    }
    Ok(subsample_remainder(decoded, native.subsampled(factor)))
}

fn subsample_remainder(frame: DynamicImage, size: Dimensions) -> DynamicImage {
    if (frame.width(), frame.height()) == (size.width, size.height) {
        return frame;
    }
    frame.resize_exact(size.width, size.height, ResampleFilter::Nearest)
}

fn decode_jpeg_scaled(mut stream: Box<dyn ImageStream>, factor: u32) -> Result<DynamicImage, DecodeError> {
    let mut decoder = JpegDecoder::new(&mut stream);
    decoder.read_info().map_err(jpeg_error)?;
    let info = decoder
        .info()
        .ok_or_else(|| DecodeError::Malformed("JPEG header without frame info".to_string()))?;
    let native = Dimensions::new(u32::from(info.width), u32::from(info.height));
    if native.is_empty() {
        return Err(DecodeError::Malformed(format!("empty frame {}", native)));
    }

    // 16-bit grey and CMYK have no direct `image` buffer here.
    if matches!(info.pixel_format, JpegPixelFormat::L16 | JpegPixelFormat::CMYK32) {
        drop(decoder);
        stream.seek(SeekFrom::Start(0)).map_err(StreamError::from)?;
        return subsample_decoded(guessed_reader(stream)?.decode()?, factor);
    }

    let dct = dct_scale_for(factor);
    if dct > 1 {
        let requested = native.subsampled(dct);
        decoder
            .scale(clamp_u16(requested.width), clamp_u16(requested.height))
            .map_err(jpeg_error)?;
    }
    let pixels = decoder.decode().map_err(jpeg_error)?;
    let info = decoder
        .info()
        .ok_or_else(|| DecodeError::Malformed("JPEG frame info lost after decode".to_string()))?;
    let (width, height) = (u32::from(info.width), u32::from(info.height));

    let frame = match info.pixel_format {
        JpegPixelFormat::L8 => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        _ => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
    }
    .ok_or_else(|| DecodeError::Malformed(format!("JPEG pixel buffer does not fill {}x{}", width, height)))?;

    Ok(subsample_remainder(frame, native.subsampled(factor)))
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn jpeg_error(e: jpeg_decoder::Error) -> DecodeError {
    match e {
        jpeg_decoder::Error::Io(source) => DecodeError::Stream(StreamError::Io(source)),
        other => DecodeError::Malformed(other.to_string()),
    }
}
