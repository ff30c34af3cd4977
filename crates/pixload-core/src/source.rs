//! Byte-stream sources.
//!
//! Decoding reads each image twice (bounds probe, then full decode), so a
//! source hands out a fresh, independently readable stream on every call
//! instead of rewinding a shared one.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::sync::{Arc, RwLock};

use crate::error::StreamError;
use crate::locator::{ImageLocator, Scheme};
use crate::options::ExtraParams;

/// A readable, seekable image byte stream.
pub trait ImageStream: BufRead + Seek + Send {}

impl<T: BufRead + Seek + Send> ImageStream for T {}

/// Supplies byte streams for locators.
pub trait ByteStreamSource: Send + Sync {
    /// Open a new stream positioned at the start of the resource.
    fn open_stream(
        &self,
        locator: &ImageLocator,
        extra: &ExtraParams,
    ) -> Result<Box<dyn ImageStream>, StreamError>;
}

impl<S: ByteStreamSource + ?Sized> ByteStreamSource for Arc<S> {
    fn open_stream(
        &self,
        locator: &ImageLocator,
        extra: &ExtraParams,
    ) -> Result<Box<dyn ImageStream>, StreamError> {
        (**self).open_stream(locator, extra)
    }
}

/// Serves `file://` locators from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl ByteStreamSource for FileSource {
    fn open_stream(
        &self,
        locator: &ImageLocator,
        _extra: &ExtraParams,
    ) -> Result<Box<dyn ImageStream>, StreamError> {
        let path = match locator.scheme() {
            Scheme::File => locator
                .file_path()
                .ok_or_else(|| StreamError::NotFound(locator.to_string()))?,
            _ => return Err(StreamError::UnsupportedScheme(locator.to_string())),
        };
        let file = File::open(&path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Serves registered in-memory buffers, for any scheme.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: RwLock<HashMap<String, Arc<[u8]>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `locator`, replacing any previous entry.
    pub fn insert(&self, locator: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(locator.into(), bytes.into());
    }

    pub fn with_entry(self, locator: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(locator, bytes);
        self
    }
}

/// Cursor over a shared buffer; each open gets its own position.
struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ByteStreamSource for MemorySource {
    fn open_stream(
        &self,
        locator: &ImageLocator,
        _extra: &ExtraParams,
    ) -> Result<Box<dyn ImageStream>, StreamError> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let bytes = entries
            .get(locator.as_str())
            .cloned()
            .ok_or_else(|| StreamError::NotFound(locator.to_string()))?;
        Ok(Box::new(Cursor::new(SharedBytes(bytes))))
    }
}
