// ── Query & mutation engine ──
//
// Stateless facade over the record store. Every call is a fresh
// load → compute → (snapshot + save) cycle; nothing is cached between
// calls.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Catalog, InventoryConfig};
use crate::error::CoreError;
use crate::model::validate::{self, ValidationError};
use crate::model::{DeviceRecord, DeviceUpdate, NewDevice, RecordField};
use crate::report::InventoryReport;
use crate::store::RecordStore;

/// Result of a single-record edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// The record as saved.
    pub record: DeviceRecord,
    /// Fields that took a new value.
    pub applied: Vec<RecordField>,
    /// Fields whose input failed validation; their old values were kept.
    pub rejected: Vec<ValidationError>,
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted {
        removed: Vec<DeviceRecord>,
        snapshot: Option<PathBuf>,
    },
    /// Nothing matched; nothing was written.
    NotFound,
}

impl DeleteOutcome {
    pub fn count(&self) -> usize {
        match self {
            Self::Deleted { removed, .. } => removed.len(),
            Self::NotFound => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClearOutcome {
    /// The caller did not confirm; nothing was written.
    Cancelled,
    Cleared {
        removed: usize,
        snapshot: Option<PathBuf>,
    },
}

/// The device inventory: create, find, edit, delete, clear, report.
#[derive(Debug, Clone)]
pub struct Inventory {
    store: RecordStore,
    catalog: Catalog,
}

impl Inventory {
    pub fn new(config: InventoryConfig) -> Self {
        Self {
            store: RecordStore::from_config(&config),
            catalog: config.catalog,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Register a device, stamped with the current time.
    pub fn create(&self, device: NewDevice) -> Result<DeviceRecord, CoreError> {
        let name = validate::required_text(RecordField::Name, &device.name)?;
        let ip = validate::ip_address(&device.ip)?;
        let location = validate::required_text(RecordField::Location, &device.location)?;
        self.catalog.check_device_type(device.device_type)?;
        self.catalog.check_layer(device.layer)?;
        self.catalog.check_services(&device.services)?;

        let record = NewDevice {
            name,
            ip,
            location,
            vlans: device.vlans.trim().to_owned(),
            ..device
        }
        .into_record(Utc::now());

        self.store.append(record.clone())?;
        info!(name = %record.name, ip = %record.ip, "device registered");
        Ok(record)
    }

    /// Every record, in stored order.
    pub fn list(&self) -> Result<Vec<DeviceRecord>, CoreError> {
        self.store.records()
    }

    /// Records whose Name, IP, Type or Location contains `term`,
    /// case-insensitively. No matches is an empty vec, not an error.
    pub fn find(&self, term: &str) -> Result<Vec<DeviceRecord>, CoreError> {
        let needle = needle(term)?;
        let matches: Vec<_> = self
            .store
            .records()?
            .into_iter()
            .filter(|r| r.matches_search(&needle))
            .collect();
        debug!(term, count = matches.len(), "find");
        Ok(matches)
    }

    /// Records whose Name or IP contains `term`: exactly what
    /// [`delete`](Self::delete) would remove.
    pub fn find_by_identity(&self, term: &str) -> Result<Vec<DeviceRecord>, CoreError> {
        let needle = needle(term)?;
        Ok(self
            .store
            .records()?
            .into_iter()
            .filter(|r| r.matches_identity(&needle))
            .collect())
    }

    /// The single record whose Name or IP contains `term`.
    ///
    /// Fails with `NotFound` or `AmbiguousMatch` exactly as [`edit`](Self::edit)
    /// would, without writing anything.
    pub fn resolve(&self, term: &str) -> Result<DeviceRecord, CoreError> {
        let mut records = self.store.records()?;
        let index = resolve_index(&records, term)?;
        Ok(records.swap_remove(index))
    }

    /// Apply `update` to the single record whose Name or IP contains `term`.
    ///
    /// Invalid fields are rejected one by one and keep their old value; the
    /// remaining fields still apply. Registered-At is always refreshed.
    pub fn edit(&self, term: &str, update: &DeviceUpdate) -> Result<EditOutcome, CoreError> {
        let mut records = self.store.records()?;
        let index = resolve_index(&records, term)?;

        let Some(record) = records.get_mut(index) else {
            return Err(CoreError::NotFound { term: term.into() });
        };
        let (applied, rejected) = apply_update(record, update, &self.catalog);
        record.registered_at = Utc::now();
        let record = record.clone();

        let snapshot = self.store.replace_all(&records)?;
        info!(
            name = %record.name,
            applied = applied.len(),
            rejected = rejected.len(),
            "device updated"
        );
        Ok(EditOutcome {
            record,
            applied,
            rejected,
            snapshot,
        })
    }

    /// Remove every record whose Name or IP contains `term`.
    pub fn delete(&self, term: &str) -> Result<DeleteOutcome, CoreError> {
        let needle = needle(term)?;
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .store
            .records()?
            .into_iter()
            .partition(|r| r.matches_identity(&needle));

        if removed.is_empty() {
            debug!(term, "delete matched nothing");
            return Ok(DeleteOutcome::NotFound);
        }

        let snapshot = self.store.replace_all(&kept)?;
        info!(term, count = removed.len(), "devices deleted");
        Ok(DeleteOutcome::Deleted { removed, snapshot })
    }

    /// Empty the inventory. Does nothing unless `confirmed`.
    pub fn clear(&self, confirmed: bool) -> Result<ClearOutcome, CoreError> {
        if !confirmed {
            debug!("clear not confirmed");
            return Ok(ClearOutcome::Cancelled);
        }

        let removed = self.store.load()?.records().len();
        let snapshot = self.store.replace_all(&[])?;
        info!(removed, "inventory cleared");
        Ok(ClearOutcome::Cleared { removed, snapshot })
    }

    pub fn report(&self) -> Result<InventoryReport, CoreError> {
        Ok(InventoryReport::build(self.store.records()?))
    }
}

// ── Private helpers ──────────────────────────────────────────────────

fn needle(term: &str) -> Result<String, CoreError> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Err(CoreError::EmptySearchTerm);
    }
    Ok(needle)
}

fn resolve_index(records: &[DeviceRecord], term: &str) -> Result<usize, CoreError> {
    let needle = needle(term)?;
    let hits: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.matches_identity(&needle))
        .map(|(i, _)| i)
        .collect();

    match hits.as_slice() {
        [] => Err(CoreError::NotFound { term: term.into() }),
        [only] => Ok(*only),
        _ => Err(CoreError::AmbiguousMatch {
            term: term.into(),
            matches: hits
                .iter()
                .filter_map(|&i| records.get(i).cloned())
                .collect(),
        }),
    }
}

fn provided(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

fn apply_update(
    record: &mut DeviceRecord,
    update: &DeviceUpdate,
    catalog: &Catalog,
) -> (Vec<RecordField>, Vec<ValidationError>) {
    let mut applied = Vec::new();
    let mut rejected = Vec::new();
    let mut outcome = |field: RecordField, result: Result<(), ValidationError>| match result {
        Ok(()) => applied.push(field),
        Err(e) => rejected.push(e),
    };

    if let Some(raw) = provided(update.name.as_ref()) {
        let result = validate::required_text(RecordField::Name, raw).map(|v| record.name = v);
        outcome(RecordField::Name, result);
    }
    if let Some(raw) = provided(update.device_type.as_ref()) {
        let result = catalog.device_type(raw).map(|v| record.device_type = v);
        outcome(RecordField::Type, result);
    }
    if let Some(raw) = provided(update.ip.as_ref()) {
        let result = validate::ip_address(raw).map(|v| record.ip = v);
        outcome(RecordField::Ip, result);
    }
    if let Some(raw) = provided(update.location.as_ref()) {
        let result =
            validate::required_text(RecordField::Location, raw).map(|v| record.location = v);
        outcome(RecordField::Location, result);
    }
    if let Some(raw) = provided(update.vlans.as_ref()) {
        record.vlans = raw.trim().to_owned();
        outcome(RecordField::Vlans, Ok(()));
    }
    if let Some(services) = &update.services {
        let result = catalog
            .check_services(services)
            .map(|()| record.services.clone_from(services));
        outcome(RecordField::Services, result);
    }
    if let Some(raw) = provided(update.layer.as_ref()) {
        let result = catalog.layer(raw).map(|v| record.layer = v);
        outcome(RecordField::Layer, result);
    }

    (applied, rejected)
}
