//! Product image references.
//!
//! Products store images as opaque strings. New references are validated to
//! be durable: an `http(s)` URL or an absolute filesystem path. Anything else
//! found in an existing snapshot (for example a `blob:` handle left behind by
//! a browser session) still loads, but reports itself as not durable.

use core::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors that can occur when validating an image reference.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageRefError {
    /// The reference is empty.
    #[error("image reference cannot be empty")]
    Empty,
    /// The URL uses a scheme that does not survive the session.
    #[error("unsupported image URL scheme: {0}")]
    UnsupportedScheme(String),
    /// The path is relative.
    #[error("image path must be absolute: {0}")]
    RelativePath(String),
}

/// An opaque reference to a product image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Validate and wrap a durable image reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, a URL with a scheme other than
    /// `http`/`https`/`file`, or a relative path.
    pub fn parse(s: &str) -> Result<Self, ImageRefError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ImageRefError::Empty);
        }

        if let Ok(url) = Url::parse(s) {
            // Windows drive letters parse as one-letter schemes.
            if url.scheme().len() > 1 {
                return match url.scheme() {
                    "http" | "https" | "file" => Ok(Self(url.to_string())),
                    other => Err(ImageRefError::UnsupportedScheme(other.to_owned())),
                };
            }
        }

        if Path::new(s).is_absolute() {
            Ok(Self(s.to_owned()))
        } else {
            Err(ImageRefError::RelativePath(s.to_owned()))
        }
    }

    /// The reference as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference remains meaningful after the current session.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        Self::parse(&self.0).is_ok()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
