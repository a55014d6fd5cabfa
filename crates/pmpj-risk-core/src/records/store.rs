use crate::error::PmpjError;
use crate::records::merge::{merge, ColumnLayout, MergeOutcome, RecordTable};
use crate::PmpjResult;

/// Tabular store holding every submission record.
///
/// `save_record` is a read-modify-write over the whole table. Callers must
/// serialise access to the store themselves; concurrent saves for different
/// identities can otherwise lose updates.
pub trait RecordStore {
    fn read_all(&self) -> PmpjResult<RecordTable>;
    fn overwrite_all(&mut self, table: &RecordTable) -> PmpjResult<()>;
}

/// Persists uploaded documents and hands back a stable reference.
pub trait DocumentStore {
    fn store(&self, bytes: &[u8], filename: &str) -> PmpjResult<String>;
}

/// Read the store, merge `record` in, and write the result back.
///
/// `record` is only borrowed so a failed write can be retried by the
/// caller without recomputing it.
pub fn save_record<S: RecordStore + ?Sized>(
    store: &mut S,
    record: &[(String, String)],
    layout: &ColumnLayout,
) -> PmpjResult<MergeOutcome> {
    let existing = store.read_all()?;
    let outcome = merge(existing, record, layout);
    store.overwrite_all(&outcome.table)?;
    tracing::info!(
        rows = outcome.table.len(),
        replaced = outcome.replaced,
        "record stored"
    );
    Ok(outcome)
}

/// Store kept in memory; optionally refuses writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    pub table: RecordTable,
    pub reject_writes: bool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn read_all(&self) -> PmpjResult<RecordTable> {
        Ok(self.table.clone())
    }

    fn overwrite_all(&mut self, table: &RecordTable) -> PmpjResult<()> {
        if self.reject_writes {
            return Err(PmpjError::Store("store is read-only".to_string()));
        }
        self.table = table.clone();
        Ok(())
    }
}
