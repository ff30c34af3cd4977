//! Decode orchestration: orientation, subsampling, exact scaling, rotation.
//!
//! # Pipeline
//!
//! 0. Reject a zero-sized target before touching the locator.
//! 1. Resolve the rotation angle; for 90°/270° swap the target so that it
//!    describes the unrotated source pixels.
//! 2. Probe the bounds and plan the subsampling factor.
//! 3. Open a fresh stream and decode the subsampled raster.
//! 4. Apply exact scaling for `ExactFit`/`ExactFitStretched`.
//! 5. Rotate to the upright orientation.
//!
//! A failed probe is an error. A failed full decode is reported to the sink
//! and yields `Ok(None)`, so one bad image does not abort a batch.
//!
//! Every raster superseded by steps 4 and 5 goes through
//! [`RasterImage::release`] exactly once.

use std::sync::Arc;

use crate::codec::decode_subsampled;
use crate::error::DecodeError;
use crate::geometry::Dimensions;
use crate::locator::ImageLocator;
use crate::observe::{Event, LogSink, ObservabilitySink};
use crate::options::{DecodeConfig, FitPolicy, ScalePolicy};
use crate::orientation::{
    EmbeddedMetadataReader, EmptyMetadataStore, ExifMetadataReader, MetadataStore,
    OrientationResolver,
};
use crate::raster::RasterImage;
use crate::source::ByteStreamSource;
use crate::subsample::SubsamplePlanner;
use crate::transform::{rotate, scale_exactly};

/// Decodes images from a byte-stream source at or near a target size.
///
/// Holds no per-request state; one decoder can serve concurrent calls from
/// several worker threads.
#[derive(Clone)]
pub struct ImageDecoder {
    source: Arc<dyn ByteStreamSource>,
    resolver: OrientationResolver,
    planner: SubsamplePlanner,
    sink: Arc<dyn ObservabilitySink>,
}

/// Builder for [`ImageDecoder`].
pub struct ImageDecoderBuilder {
    source: Arc<dyn ByteStreamSource>,
    store: Arc<dyn MetadataStore>,
    reader: Arc<dyn EmbeddedMetadataReader>,
    sink: Arc<dyn ObservabilitySink>,
}

impl ImageDecoderBuilder {
    /// Metadata store consulted for `content://` locators.
    pub fn metadata_store(mut self, store: Arc<dyn MetadataStore>) -> Self {
        self.store = store;
        self
    }

    /// Embedded-metadata reader used for `file://` locators.
    pub fn metadata_reader(mut self, reader: Arc<dyn EmbeddedMetadataReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Sink receiving diagnostic events. Defaults to [`LogSink`].
    pub fn sink(mut self, sink: Arc<dyn ObservabilitySink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn build(self) -> ImageDecoder {
        ImageDecoder {
            resolver: OrientationResolver::new(self.store, self.reader, self.sink.clone()),
            planner: SubsamplePlanner::new(self.source.clone(), self.sink.clone()),
            source: self.source,
            sink: self.sink,
        }
    }
}

impl ImageDecoder {
    /// Decoder with no metadata store, the EXIF reader and the `log` sink.
    pub fn new(source: Arc<dyn ByteStreamSource>) -> Self {
        Self::builder(source).build()
    }

    pub fn builder(source: Arc<dyn ByteStreamSource>) -> ImageDecoderBuilder {
        ImageDecoderBuilder {
            source,
            store: Arc::new(EmptyMetadataStore),
            reader: Arc::new(ExifMetadataReader),
            sink: Arc::new(LogSink),
        }
    }

    /// Decode `locator` at or near `target_size`, upright.
    ///
    /// # Returns
    ///
    /// `Ok(Some(raster))` on success, `Ok(None)` if the stream could not be
    /// reopened or the pixel data could not be decoded.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the target is zero-sized or the bounds probe
    /// fails. No full decode is attempted in that case.
    pub fn decode(
        &self,
        locator: &ImageLocator,
        target_size: Dimensions,
        scale_policy: ScalePolicy,
        fit_policy: FitPolicy,
        config: &DecodeConfig,
    ) -> Result<Option<RasterImage>, DecodeError> {
        if target_size.is_empty() {
            return Err(DecodeError::InvalidTarget {
                width: target_size.width,
                height: target_size.height,
            });
        }

        let rotation = self.resolver.resolve(locator);
        let target = rotation.rotated(target_size);

        let plan = self
            .planner
            .plan(locator, &config.extra, target, scale_policy, fit_policy)?;

        let decoded = self
            .source
            .open_stream(locator, &config.extra)
            .map_err(DecodeError::from)
            .and_then(|stream| decode_subsampled(stream, plan.factor, config.pixel_format));
        let mut raster = match decoded {
            Ok(raster) => raster,
            Err(e) => {
                self.sink.emit(&Event::DecodeFailed {
                    locator: locator.to_string(),
                    reason: e.to_string(),
                });
                return Ok(None);
            }
        };

        if scale_policy.scales_exactly() {
            let source = raster.dimensions();
            let scaled = scale_exactly(raster, target, scale_policy, fit_policy, config.filter);
            if scaled.is_replaced() {
                self.sink.emit(&Event::Scaled {
                    source,
                    destination: scaled.image.dimensions(),
                });
            }
            raster = scaled.finish(|old| self.release(old));
        }

        if !rotation.is_identity() {
            raster = rotate(raster, rotation).finish(|old| self.release(old));
            self.sink.emit(&Event::Rotated {
                angle: rotation,
                dimensions: raster.dimensions(),
            });
        }

        Ok(Some(raster))
    }

    fn release(&self, raster: RasterImage) {
        self.sink.emit(&Event::RasterReleased {
            dimensions: raster.dimensions(),
        });
        raster.release();
    }
}
