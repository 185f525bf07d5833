// ── File-backed record storage ──

mod record_store;
mod snapshot;

pub use record_store::{LoadOutcome, Quarantined, RecordStore};
pub use snapshot::SnapshotInfo;
