//! Image reference - an opaque object-store URI

use std::fmt;

use serde::{Deserialize, Serialize};

/// URI of an uploaded image; the engine never touches image bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank URIs are treated as "no image"
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ImageRef {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl From<&str> for ImageRef {
    fn from(uri: &str) -> Self {
        Self(uri.to_string())
    }
}
