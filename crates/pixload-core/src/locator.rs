//! Image resource locators.
//!
//! A locator is a URI (`scheme://rest`) parsed with the `url` crate. The scheme
//! is mapped once into a [`Scheme`] variant so that every decision point
//! matches on a closed set instead of comparing strings.

use std::fmt;
use std::path::PathBuf;

use url::Url;

/// The origin kind of an image resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
    /// Local filesystem path (`file:///mnt/sdcard/photo.jpg`).
    File,
    /// Opaque content handle resolved through a metadata store.
    Content,
    /// Bundled application asset.
    Assets,
    /// Bundled drawable resource.
    Drawable,
    /// Any other scheme, lowercased. Empty when the locator is not a valid URI.
    Other(String),
}

impl Scheme {
    fn from_url(url: &Url) -> Self {
        match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            "file" => Scheme::File,
            "content" => Scheme::Content,
            "assets" => Scheme::Assets,
            "drawable" => Scheme::Drawable,
            other => Scheme::Other(other.to_string()),
        }
    }
}

/// Immutable identifier for an image resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageLocator {
    uri: String,
    url: Option<Url>,
    scheme: Scheme,
}

impl ImageLocator {
    /// Parse a locator. Strings that are not absolute URIs keep their text but
    /// get an empty `Other` scheme.
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let url = Url::parse(&uri).ok();
        let scheme = url
            .as_ref()
            .map(Scheme::from_url)
            .unwrap_or_else(|| Scheme::Other(String::new()));
        Self { uri, url, scheme }
    }

    /// The locator text as given by the caller.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Parsed URI, if the locator is a valid absolute URI.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Filesystem path for `file://` locators.
    ///
    /// Percent-escapes are decoded, a `localhost` host is accepted, and query
    /// and fragment are ignored. Returns `None` for other schemes, remote
    /// hosts, and locators naming no file.
    pub fn file_path(&self) -> Option<PathBuf> {
        if self.scheme != Scheme::File {
            return None;
        }
        self.url
            .as_ref()?
            .to_file_path()
            .ok()
            .filter(|path| path.file_name().is_some())
    }
}

impl fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl From<&str> for ImageLocator {
    fn from(uri: &str) -> Self {
        ImageLocator::new(uri)
    }
}

impl From<String> for ImageLocator {
    fn from(uri: String) -> Self {
        ImageLocator::new(uri)
    }
}
