//! Page envelope for paginated listing.

use serde::{Deserialize, Serialize};

use super::Record;
use crate::types::Bookmark;

/// One page of records from a bookmark-continued scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// The records in this page.
    pub data: Vec<Record>,

    /// The bookmark the caller supplied for this page.
    pub previous_bookmark: Bookmark,

    /// Bookmark to supply on the next call to continue.
    pub bookmark: Bookmark,
}

impl Page {
    /// Whether enumeration is finished: nothing came back, or the bookmark
    /// did not advance.
    ///
    /// A finished page may still hold records; read `data` before stopping.
    pub fn is_exhausted(&self) -> bool {
        self.data.is_empty() || self.bookmark == self.previous_bookmark
    }
}
