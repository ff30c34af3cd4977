//! Pixload Core - orientation-aware, subsampling image decoder
//!
//! This crate decodes an encoded image from an abstract byte-stream source
//! into an in-memory raster at or near a requested size. It covers:
//!
//! - Orientation resolution from EXIF data or an external metadata store
//! - Subsampling-factor planning from a bounds-only header probe
//! - Exact-size scaling under fit-inside or crop semantics
//! - Rotation correction of the final raster
//!
//! Fetching, caching and request dispatch belong to the caller; they plug in
//! through [`ByteStreamSource`], [`MetadataStore`] and [`ObservabilitySink`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pixload_core::{DecodeConfig, Dimensions, FileSource, FitPolicy, ImageDecoder, ImageLocator, ScalePolicy};
//!
//! let decoder = ImageDecoder::new(Arc::new(FileSource));
//! let raster = decoder.decode(
//!     &ImageLocator::new("file:///mnt/sdcard/photo.jpg"),
//!     Dimensions::new(480, 320),
//!     ScalePolicy::ExactFit,
//!     FitPolicy::FitInside,
//!     &DecodeConfig::default(),
//! )?;
//! ```

pub mod codec;
pub mod decoder;
pub mod error;
pub mod geometry;
pub mod locator;
pub mod observe;
pub mod options;
pub mod orientation;
pub mod raster;
pub mod source;
pub mod subsample;
pub mod transform;

pub use decoder::{ImageDecoder, ImageDecoderBuilder};
pub use error::{DecodeError, MetadataReadError, StreamError};
pub use geometry::{Dimensions, RotationAngle};
pub use locator::{ImageLocator, Scheme};
pub use observe::{Event, LogSink, NullSink, ObservabilitySink, RecordingSink};
pub use options::{DecodeConfig, ExtraParams, FilterType, FitPolicy, PixelFormat, ScalePolicy};
pub use orientation::{
    EmbeddedMetadataReader, EmptyMetadataStore, ExifMetadataReader, MetadataStore,
    OrientationResolver, OrientationTag,
};
pub use raster::RasterImage;
pub use source::{ByteStreamSource, FileSource, ImageStream, MemorySource};
pub use subsample::{compute_factor, SubsamplePlan, SubsamplePlanner};
