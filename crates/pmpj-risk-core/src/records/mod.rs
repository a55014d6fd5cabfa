//! Submission records: replace-on-identity merge and the store seams.

pub mod merge;
pub mod store;

pub use merge::{merge, ColumnLayout, MergeOutcome, RecordTable, Row};
pub use store::{save_record, DocumentStore, InMemoryRecordStore, RecordStore};
