//! The electronic health record entity.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp};

/// A health record as stored on the ledger.
///
/// Fields are declared in lexicographic order of their wire names. Serde
/// emits struct fields in declaration order, which is what makes the
/// encoding canonical; keep the order when adding fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Encoded binary payload; may be empty.
    pub base64_string: String,

    /// Creation time, assigned once by the store.
    ///
    /// Absent values are omitted from the encoding, never written as `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Whether the record represents a document rather than plain text.
    pub doc: bool,

    /// Original file name; may be empty.
    pub file_name: String,

    /// MIME type or extension hint; may be empty.
    pub file_type: String,

    /// Ledger key and primary identity.
    pub id: RecordId,

    /// Subject display name.
    pub name: String,

    /// Human-readable size label. Opaque text, never parsed.
    pub size: String,

    /// Free-text payload.
    pub text_data: String,
}

/// Caller-supplied fields for a record that does not exist yet.
///
/// There is no `createdAt` here: the store assigns it. A `createdAt` key in
/// deserialized input is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub base64_string: String,
    pub doc: bool,
    pub file_name: String,
    pub file_type: String,
    pub id: RecordId,
    pub name: String,
    pub size: String,
    pub text_data: String,
}

impl NewRecord {
    /// A plain-text record with every string field empty.
    pub fn new(id: RecordId) -> Self {
        Self {
            base64_string: String::new(),
            doc: false,
            file_name: String::new(),
            file_type: String::new(),
            id,
            name: String::new(),
            size: String::new(),
            text_data: String::new(),
        }
    }

    /// Stamp the record with its creation time.
    pub fn into_record(self, created_at: Timestamp) -> Record {
        Record {
            base64_string: self.base64_string,
            created_at: Some(created_at),
            doc: self.doc,
            file_name: self.file_name,
            file_type: self.file_type,
            id: self.id,
            name: self.name,
            size: self.size,
            text_data: self.text_data,
        }
    }
}

impl From<Record> for NewRecord {
    fn from(record: Record) -> Self {
        Self {
            base64_string: record.base64_string,
            doc: record.doc,
            file_name: record.file_name,
            file_type: record.file_type,
            id: record.id,
            name: record.name,
            size: record.size,
            text_data: record.text_data,
        }
    }
}

/// Output from creating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// The record as written, including its assigned `created_at`.
    pub record: Record,

    /// The exact bytes put on the ledger.
    pub encoded: Vec<u8>,
}
