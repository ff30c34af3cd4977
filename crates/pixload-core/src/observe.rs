//! Diagnostic events and the sinks that receive them.
//!
//! Components never log directly; they emit [`Event`]s to an injected
//! [`ObservabilitySink`]. [`LogSink`] forwards to the `log` facade, so the
//! host application picks the logger.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::geometry::{Dimensions, RotationAngle};

/// A diagnostic event emitted while decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A subsampling factor was chosen.
    Subsampling {
        native: Dimensions,
        target: Dimensions,
        factor: u32,
    },
    /// The raster was resized by exact scaling.
    Scaled {
        source: Dimensions,
        destination: Dimensions,
    },
    /// The raster was rotated to correct orientation.
    Rotated {
        angle: RotationAngle,
        dimensions: Dimensions,
    },
    /// The full decode produced no raster.
    DecodeFailed { locator: String, reason: String },
    /// Embedded metadata could not be read; orientation resolved to 0.
    MetadataReadFailed { path: PathBuf, reason: String },
    /// A metadata store returned an orientation that is not a quarter turn.
    UnsupportedOrientation { locator: String, degrees: i32 },
    /// A superseded raster was released.
    RasterReleased { dimensions: Dimensions },
}

/// Receiver of diagnostic events. Implementations must not block or panic.
pub trait ObservabilitySink: Send + Sync {
    fn emit(&self, event: &Event);
}

impl<S: ObservabilitySink + ?Sized> ObservabilitySink for Arc<S> {
    fn emit(&self, event: &Event) {
        (**self).emit(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ObservabilitySink for NullSink {
    fn emit(&self, _event: &Event) {}
}

/// Forwards events to the `log` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ObservabilitySink for LogSink {
    fn emit(&self, event: &Event) {
        match event {
            Event::Subsampling {
                native,
                target,
                factor,
            } => log::info!(
                "Subsample image {} to {} (scale = {})",
                native,
                target,
                factor
            ),
            Event::Scaled {
                source,
                destination,
            } => log::info!("Scale subsampled image {} to {}", source, destination),
            Event::Rotated { angle, dimensions } => {
                log::info!("Rotate image by {} to {}", angle, dimensions)
            }
            Event::DecodeFailed { locator, reason } => {
                log::warn!("Image can't be decoded [{}]: {}", locator, reason)
            }
            Event::MetadataReadFailed { path, reason } => log::warn!(
                "Error loading exif info from file {}: {}",
                path.display(),
                reason
            ),
            Event::UnsupportedOrientation { locator, degrees } => log::warn!(
                "Ignoring orientation {} for [{}]: not a quarter turn",
                degrees,
                locator
            ),
            Event::RasterReleased { dimensions } => {
                log::debug!("Released {} raster", dimensions)
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl ObservabilitySink for RecordingSink {
    fn emit(&self, event: &Event) {
        let mut guard = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(event.clone());
    }
}
