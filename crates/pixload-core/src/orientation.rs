//! Orientation resolution from image metadata.
//!
//! File locators are inspected with an embedded-metadata (EXIF) reader;
//! content handles are looked up in an external metadata store. Every other
//! scheme, and every read failure, resolves to no rotation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use exif::{In, Reader, Tag};
use serde::{Deserialize, Serialize};

use crate::error::MetadataReadError;
use crate::geometry::RotationAngle;
use crate::locator::{ImageLocator, Scheme};
use crate::observe::{Event, NullSink, ObservabilitySink};

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrientationTag {
    /// Tag missing or out of range.
    #[default]
    Undefined,
    /// Normal (no transformation needed).
    Normal,
    /// Horizontal flip.
    FlipHorizontal,
    /// Rotate 180 degrees.
    Rotate180,
    /// Vertical flip.
    FlipVertical,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose,
    /// Rotate 90 degrees clockwise.
    Rotate90,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270,
}

impl OrientationTag {
    /// Clockwise rotation that displays the image upright.
    ///
    /// Mirrored variants carry no pure rotation and map to `Deg0`.
    pub fn rotation(self) -> RotationAngle {
        match self {
            OrientationTag::Rotate90 => RotationAngle::Deg90,
            OrientationTag::Rotate180 => RotationAngle::Deg180,
            OrientationTag::Rotate270 => RotationAngle::Deg270,
            OrientationTag::Undefined
            | OrientationTag::Normal
            | OrientationTag::FlipHorizontal
            | OrientationTag::FlipVertical
            | OrientationTag::Transpose
            | OrientationTag::Transverse => RotationAngle::Deg0,
        }
    }
}

impl From<u32> for OrientationTag {
    fn from(value: u32) -> Self {
        match value {
            1 => OrientationTag::Normal,
            2 => OrientationTag::FlipHorizontal,
            3 => OrientationTag::Rotate180,
            4 => OrientationTag::FlipVertical,
            5 => OrientationTag::Transpose,
            6 => OrientationTag::Rotate90,
            7 => OrientationTag::Transverse,
            8 => OrientationTag::Rotate270,
            _ => OrientationTag::Undefined,
        }
    }
}

/// Reads orientation tags embedded in local image files.
pub trait EmbeddedMetadataReader: Send + Sync {
    fn read_orientation_tag(&self, path: &Path) -> Result<OrientationTag, MetadataReadError>;
}

/// Looks up orientation for opaque content handles.
pub trait MetadataStore: Send + Sync {
    /// Orientation in degrees, or `None` if the store has no record.
    fn query_orientation_degrees(&self, locator: &ImageLocator) -> Option<i32>;
}

/// A store with no records.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyMetadataStore;

impl MetadataStore for EmptyMetadataStore {
    fn query_orientation_degrees(&self, _locator: &ImageLocator) -> Option<i32> {
        None
    }
}

/// EXIF reader backed by `kamadak-exif`.
///
/// A file that opens but carries no EXIF block, or whose container format
/// has no EXIF support (GIF, BMP), reports [`OrientationTag::Undefined`].
/// Other read failures are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataReader;

impl EmbeddedMetadataReader for ExifMetadataReader {
    fn read_orientation_tag(&self, path: &Path) -> Result<OrientationTag, MetadataReadError> {
        let file = File::open(path).map_err(|source| MetadataReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(exif
                .get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
                .map(OrientationTag::from)
                .unwrap_or_default()),
            // No EXIF block, or a container kamadak-exif cannot parse.
            Err(exif::Error::NotFound(_) | exif::Error::InvalidFormat(_)) => {
                Ok(OrientationTag::Undefined)
            }
            Err(exif::Error::Io(source)) => Err(MetadataReadError::Io {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) => Err(MetadataReadError::Exif(e.to_string())),
        }
    }
}

/// Determines the clockwise rotation needed to display an image upright.
#[derive(Clone)]
pub struct OrientationResolver {
    store: Arc<dyn MetadataStore>,
    reader: Arc<dyn EmbeddedMetadataReader>,
    sink: Arc<dyn ObservabilitySink>,
}

impl Default for OrientationResolver {
    fn default() -> Self {
        Self::new(
            Arc::new(EmptyMetadataStore),
            Arc::new(ExifMetadataReader),
            Arc::new(NullSink),
        )
    }
}

impl OrientationResolver {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        reader: Arc<dyn EmbeddedMetadataReader>,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Self {
        Self {
            store,
            reader,
            sink,
        }
    }

    /// Resolve the rotation for `locator`. Never fails; unknown means `Deg0`.
    pub fn resolve(&self, locator: &ImageLocator) -> RotationAngle {
        match locator.scheme() {
            Scheme::Content => self.resolve_content(locator),
            Scheme::File => match locator.file_path() {
                Some(path) => self.resolve_file(&path),
                None => RotationAngle::Deg0,
            },
            Scheme::Http
            | Scheme::Https
            | Scheme::Assets
            | Scheme::Drawable
            | Scheme::Other(_) => RotationAngle::Deg0,
        }
    }

    fn resolve_content(&self, locator: &ImageLocator) -> RotationAngle {
        let Some(degrees) = self.store.query_orientation_degrees(locator) else {
            return RotationAngle::Deg0;
        };
        RotationAngle::from_degrees(degrees).unwrap_or_else(|| {
            self.sink.emit(&Event::UnsupportedOrientation {
                locator: locator.to_string(),
                degrees,
            });
            RotationAngle::Deg0
        })
    }

    fn resolve_file(&self, path: &Path) -> RotationAngle {
        match self.reader.read_orientation_tag(path) {
            Ok(tag) => tag.rotation(),
            Err(e) => {
                self.sink.emit(&Event::MetadataReadFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                RotationAngle::Deg0
            }
        }
    }
}
