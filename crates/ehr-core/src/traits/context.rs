//! Invocation context trait.

use crate::types::Timestamp;

/// Per-transaction values every executing node agrees on.
///
/// Writes that need a clock or an identity take them from here. Reading a
/// node-local clock inside an operation would make nodes disagree on the
/// bytes they write.
pub trait InvocationContext: Send + Sync {
    /// Identifier of the transaction being executed.
    fn tx_id(&self) -> &str;

    /// Timestamp assigned to the transaction by its submitter.
    fn tx_timestamp(&self) -> Timestamp;
}

/// A fixed invocation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    tx_id: String,
    timestamp: Timestamp,
}

impl TxContext {
    pub fn new(tx_id: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
        }
    }
}

impl InvocationContext for TxContext {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
