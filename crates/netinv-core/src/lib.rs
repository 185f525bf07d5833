//! Record store and query engine for the netinv device inventory.
//!
//! This crate owns the domain model and every rule about how device records
//! are validated, searched, changed and persisted:
//!
//! - **[`Inventory`]** -- Stateless facade. Each operation loads the data file,
//!   computes, and (for mutations) snapshots then rewrites it. Single-target
//!   edits resolve by Name/IP and refuse ambiguous matches.
//!
//! - **[`RecordStore`]** -- Whole-document JSON persistence with per-entry
//!   quarantine on load and timestamped snapshots before destructive writes.
//!
//! - **[`InventoryReport`]** -- Read-only aggregation by type, layer and
//!   service, ordered by descending count.
//!
//! - **Domain model** ([`model`]) -- [`DeviceRecord`] and its closed
//!   vocabularies, plus the pure field validators the CLI prompts reuse.
//!
//! Core never reads config files or talks to a terminal; the CLI builds an
//! [`InventoryConfig`] and renders whatever comes back.

pub mod config;
pub mod error;
pub mod inventory;
pub mod model;
pub mod report;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Catalog, InventoryConfig};
pub use error::CoreError;
pub use inventory::{ClearOutcome, DeleteOutcome, EditOutcome, Inventory};
pub use report::{EXAMPLES_PER_GROUP, Group, InventoryReport};
pub use store::{LoadOutcome, Quarantined, RecordStore, SnapshotInfo};

pub use model::{
    DeviceRecord, DeviceType, DeviceUpdate, NetworkLayer, NetworkService, NewDevice, RecordField,
    ValidationError,
};
