//! Pagination bookmark type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque continuation token produced by a paged ledger scan.
///
/// The store never looks inside a bookmark. The empty bookmark means
/// "start from the beginning"; any other value must have been returned by
/// an earlier scan of the same ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bookmark(String);

impl Bookmark {
    /// Wrap a token returned by a ledger.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The bookmark that starts a scan from the beginning.
    pub fn start() -> Self {
        Self::default()
    }

    /// Whether this bookmark starts from the beginning.
    pub fn is_start(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Bookmark {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Bookmark {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}
