//! Record store operations over a ledger.

use std::collections::HashSet;
use std::pin::pin;

use futures_util::TryStreamExt;
use tracing::{debug, error, instrument};

use crate::Result;
use crate::error::{Error, LedgerError};
use crate::repo::codec;
use crate::repo::{NewRecord, Record, StoredRecord};
use crate::traits::{InvocationContext, KeyValue, Ledger, RangeScan};
use crate::types::RecordId;

/// Id of the record written by [`RecordStore::init_ledger`].
pub const SAMPLE_RECORD_ID: &str = "2bb3260-e24-f036-8c-360da8156";

/// Create, read and enumerate health records on a ledger.
///
/// The store keeps no state of its own: every read goes to the ledger, and
/// every write is a single `put` keyed by the record id.
#[derive(Debug, Clone)]
pub struct RecordStore<L> {
    ledger: L,
}

impl<L: Ledger> RecordStore<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Access the underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }

    /// Seed the ledger with a sample record.
    ///
    /// Fails with [`Error::AlreadyExists`] if it was seeded before.
    #[instrument(skip(self, ctx), fields(tx_id = ctx.tx_id()))]
    pub async fn init_ledger<C>(&self, ctx: &C) -> Result<StoredRecord>
    where
        C: InvocationContext + ?Sized,
    {
        let sample = NewRecord {
            text_data: "Sample Text Data".to_string(),
            name: "Annette KOEPP".to_string(),
            size: "100 kB".to_string(),
            ..NewRecord::new(RecordId::new(SAMPLE_RECORD_ID)?)
        };

        self.create(ctx, sample).await
    }

    /// Create a record.
    ///
    /// The record's `created_at` is taken from the invocation context. The
    /// returned [`StoredRecord`] carries the exact bytes written. The
    /// existence check and the write happen in one ledger step, so two
    /// racing creates of one id cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] and leaves the ledger unchanged if a
    /// record with the same id exists.
    #[instrument(skip(self, ctx, record), fields(id = %record.id, tx_id = ctx.tx_id()))]
    pub async fn create<C>(&self, ctx: &C, record: NewRecord) -> Result<StoredRecord>
    where
        C: InvocationContext + ?Sized,
    {
        let stored = stage(ctx, record)?;
        let written = self.ledger.insert_absent(vec![row(&stored)]).await?;

        if written.first() != Some(&true) {
            let err = Error::AlreadyExists {
                id: stored.record.id.to_string(),
            };
            error!("{}", err);
            return Err(err);
        }

        debug!("Created record");
        Ok(stored)
    }

    /// Create every record whose id is not taken yet.
    ///
    /// Ids already on the ledger, or repeated earlier in `records`, are
    /// skipped without error. Unlike [`create`](Self::create), a duplicate
    /// never stops the batch. The surviving records land in a single ledger
    /// step: if it fails, none of them are written.
    #[instrument(skip_all, fields(tx_id = ctx.tx_id()))]
    pub async fn create_batch<C, I>(&self, ctx: &C, records: I) -> Result<()>
    where
        C: InvocationContext + ?Sized,
        I: IntoIterator<Item = NewRecord>,
    {
        let mut seen = HashSet::new();
        let mut staged = Vec::new();
        let mut submitted = 0usize;

        for record in records {
            submitted += 1;
            if !seen.insert(record.id.clone()) {
                debug!(id = %record.id, "Skipping repeated id");
                continue;
            }
            staged.push(stage(ctx, record)?);
        }

        if staged.is_empty() {
            return Ok(());
        }

        let written = self
            .ledger
            .insert_absent(staged.iter().map(row).collect())
            .await?;

        for (stored, created) in staged.iter().zip(&written) {
            if !created {
                debug!(id = %stored.record.id, "Skipping existing record");
            }
        }

        let created = written.iter().filter(|w| **w).count();
        debug!(created, skipped = submitted - created, "Created record batch");
        Ok(())
    }

    /// Read a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing, or an empty value, is stored
    /// under `id`.
    #[instrument(skip(self), fields(%id))]
    pub async fn read(&self, id: &RecordId) -> Result<Record> {
        let bytes = match self.ledger.get(id.as_str()).await? {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                let err = Error::NotFound { id: id.to_string() };
                error!("{}", err);
                return Err(err);
            }
        };

        codec::decode_at(id.as_str(), &bytes)
    }

    /// Whether a non-empty value is stored under `id`.
    pub async fn exists(&self, id: &RecordId) -> Result<bool> {
        let value = self.ledger.get(id.as_str()).await?;
        Ok(value.is_some_and(|bytes| !bytes.is_empty()))
    }

    /// Every record on the ledger, in key order.
    ///
    /// # Errors
    ///
    /// Fails as a whole with [`Error::Decode`] if any stored value is not a
    /// record.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Record>> {
        let scan = self.ledger.scan("", "").await?;
        let records = decode_rows(scan, None).await?;
        debug!(count = records.len(), "Listed records");
        Ok(records)
    }
}

/// Stamp a draft with the transaction time and encode it.
fn stage<C>(ctx: &C, record: NewRecord) -> Result<StoredRecord>
where
    C: InvocationContext + ?Sized,
{
    let record = record.into_record(ctx.tx_timestamp());
    let encoded = codec::encode(&record)?;
    Ok(StoredRecord { record, encoded })
}

fn row(stored: &StoredRecord) -> KeyValue {
    KeyValue::new(stored.record.id.as_str(), stored.encoded.clone())
}

/// Drain a scan, decoding every row.
///
/// With a `limit`, a scan that yields more rows than allowed is a ledger
/// fault. The scan handle is dropped on every return path.
pub(crate) async fn decode_rows<S: RangeScan>(scan: S, limit: Option<u32>) -> Result<Vec<Record>> {
    let mut rows = pin!(scan);
    let mut records = Vec::new();

    while let Some(row) = rows.try_next().await? {
        if let Some(page_size) = limit
            && records.len() >= page_size as usize
        {
            return Err(LedgerError::Overfull { page_size }.into());
        }
        records.push(codec::decode_at(&row.key, &row.value)?);
    }

    Ok(records)
}
