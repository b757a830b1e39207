//! Canonical record encoding.
//!
//! Records are stored as compact JSON objects whose keys appear in
//! lexicographic order:
//!
//! ```text
//! {"base64String":"","createdAt":"2024-01-02T03:04:05.678Z","doc":false,"fileName":"","fileType":"","id":"r1","name":"Annette KOEPP","size":"100 kB","textData":""}
//! ```
//!
//! Every node that encodes the same record produces these exact bytes, which
//! is what lets independently executing nodes agree on the world state.

use crate::Result;
use crate::error::{DecodeError, Error};

use super::Record;

/// Encode a record to its canonical bytes.
pub fn encode(record: &Record) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(Error::Encode)
}

/// Decode canonical (or any well-formed) record bytes.
///
/// Keys may appear in any order and unknown keys are ignored. A missing
/// `createdAt` and an explicit `null` both decode as absent.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the input is not JSON, a required field is
/// missing, a field has the wrong type, the id is empty, or the timestamp is
/// not RFC 3339.
pub fn decode(bytes: &[u8]) -> Result<Record> {
    serde_json::from_slice(bytes).map_err(|e| Error::Decode(DecodeError::from(e)))
}

/// Decode a value read from the ledger, tagging failures with its key.
pub(crate) fn decode_at(key: &str, bytes: &[u8]) -> Result<Record> {
    serde_json::from_slice(bytes).map_err(|e| Error::Decode(DecodeError::from(e).at_key(key)))
}
