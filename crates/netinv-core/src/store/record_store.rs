// ── Whole-document JSON record store ──
//
// The collection is read and written as one JSON array. There is no
// incremental patching: every write replaces the file wholesale, and
// every destructive write is preceded by a snapshot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::snapshot::{self, SnapshotInfo};
use crate::config::InventoryConfig;
use crate::error::CoreError;
use crate::model::DeviceRecord;

/// A document entry that failed to deserialize or validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quarantined {
    /// Position of the entry in the stored array.
    pub index: usize,
    pub reason: String,
}

/// Result of reading the data file.
///
/// Only I/O failures on an existing file are errors; everything else
/// resolves to some (possibly empty) collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The document parsed. Entries that did not validate are set aside.
    Loaded {
        records: Vec<DeviceRecord>,
        quarantined: Vec<Quarantined>,
    },
    /// No data file yet.
    Missing,
    /// The file exists but is not a JSON array. It is left on disk as-is.
    Corrupt { reason: String },
}

impl LoadOutcome {
    pub fn records(&self) -> &[DeviceRecord] {
        match self {
            Self::Loaded { records, .. } => records,
            Self::Missing | Self::Corrupt { .. } => &[],
        }
    }

    pub fn into_records(self) -> Vec<DeviceRecord> {
        match self {
            Self::Loaded { records, .. } => records,
            Self::Missing | Self::Corrupt { .. } => Vec::new(),
        }
    }

    /// True when the next save would drop something that is on disk now.
    pub fn is_degraded(&self) -> bool {
        match self {
            Self::Loaded { quarantined, .. } => !quarantined.is_empty(),
            Self::Corrupt { .. } => true,
            Self::Missing => false,
        }
    }
}

/// Decode a stored document, quarantining entries one by one.
pub(crate) fn decode(bytes: &[u8]) -> LoadOutcome {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return LoadOutcome::Loaded {
            records: Vec::new(),
            quarantined: Vec::new(),
        };
    }

    let entries: Vec<serde_json::Value> = match serde_json::from_slice(bytes) {
        Ok(entries) => entries,
        Err(e) => {
            return LoadOutcome::Corrupt {
                reason: e.to_string(),
            };
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut quarantined = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let decoded = serde_json::from_value::<DeviceRecord>(entry)
            .map_err(|e| e.to_string())
            .and_then(|record| record.check().map(|()| record).map_err(|e| e.to_string()));
        match decoded {
            Ok(record) => records.push(record),
            Err(reason) => quarantined.push(Quarantined { index, reason }),
        }
    }

    LoadOutcome::Loaded {
        records,
        quarantined,
    }
}

/// Durable home of the device collection.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_file: PathBuf,
    snapshot_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_file: impl Into<PathBuf>, snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            snapshot_dir: snapshot_dir.into(),
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.data_file.clone(), config.snapshot_dir.clone())
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    /// Read the full collection.
    pub fn load(&self) -> Result<LoadOutcome, CoreError> {
        let bytes = match fs::read(&self.data_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.data_file.display(), "no inventory file yet");
                return Ok(LoadOutcome::Missing);
            }
            Err(source) => {
                return Err(CoreError::Read {
                    path: self.data_file.clone(),
                    source,
                });
            }
        };

        let outcome = decode(&bytes);
        match &outcome {
            LoadOutcome::Corrupt { reason } => {
                warn!(
                    path = %self.data_file.display(),
                    %reason,
                    "inventory file is unreadable; treating it as empty (file left untouched)"
                );
            }
            LoadOutcome::Loaded {
                records,
                quarantined,
            } => {
                for q in quarantined {
                    warn!(index = q.index, reason = %q.reason, "skipping malformed device entry");
                }
                debug!(count = records.len(), "inventory loaded");
            }
            LoadOutcome::Missing => {}
        }
        Ok(outcome)
    }

    /// Read the collection, flattening every non-fatal outcome.
    pub fn records(&self) -> Result<Vec<DeviceRecord>, CoreError> {
        self.load().map(LoadOutcome::into_records)
    }

    /// Overwrite the data file with `records`.
    pub fn save(&self, records: &[DeviceRecord]) -> Result<(), CoreError> {
        let mut json = serde_json::to_vec_pretty(records)?;
        json.push(b'\n');
        self.write_document(&json)?;
        debug!(count = records.len(), path = %self.data_file.display(), "inventory saved");
        Ok(())
    }

    /// Load, push `record` at the end, save.
    ///
    /// Appending over a corrupt or partly quarantined document snapshots it
    /// first, since the save drops whatever did not load.
    pub fn append(&self, record: DeviceRecord) -> Result<(), CoreError> {
        let outcome = self.load()?;
        if outcome.is_degraded() {
            self.snapshot()?;
        }
        let mut records = outcome.into_records();
        records.push(record);
        self.save(&records)
    }

    /// Copy the current data file aside. `None` when there is no file yet.
    pub fn snapshot(&self) -> Result<Option<PathBuf>, CoreError> {
        snapshot::take(&self.data_file, &self.snapshot_dir)
    }

    /// Snapshot, then save. A failed snapshot aborts before anything is
    /// written.
    pub fn replace_all(&self, records: &[DeviceRecord]) -> Result<Option<PathBuf>, CoreError> {
        let snapshot = self.snapshot()?;
        self.save(records)?;
        Ok(snapshot)
    }

    /// Snapshots belonging to this data file, newest first.
    pub fn snapshots(&self) -> Result<Vec<SnapshotInfo>, CoreError> {
        snapshot::list(&self.data_file, &self.snapshot_dir)
    }

    /// Interpret `name` as a path if it exists, otherwise as a file name
    /// inside the snapshot directory.
    pub fn resolve_snapshot(&self, name: &str) -> PathBuf {
        let direct = PathBuf::from(name);
        if direct.is_file() {
            direct
        } else {
            self.snapshot_dir.join(name)
        }
    }

    /// Put a snapshot back in place of the data file.
    ///
    /// The current file is snapshotted first; returns that snapshot's path.
    pub fn restore(&self, snapshot: &Path) -> Result<Option<PathBuf>, CoreError> {
        let bytes = fs::read(snapshot).map_err(|source| CoreError::Read {
            path: snapshot.to_path_buf(),
            source,
        })?;
        if let LoadOutcome::Corrupt { reason } = decode(&bytes) {
            return Err(CoreError::InvalidSnapshot {
                path: snapshot.to_path_buf(),
                reason,
            });
        }

        let previous = self.snapshot()?;
        self.write_document(&bytes)?;
        info!(from = %snapshot.display(), "inventory restored from snapshot");
        Ok(previous)
    }

    fn write_document(&self, bytes: &[u8]) -> Result<(), CoreError> {
        let persist_err = |source: io::Error| CoreError::Persistence {
            path: self.data_file.clone(),
            source,
        };
        if let Some(parent) = self
            .data_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(persist_err)?;
        }
        fs::write(&self.data_file, bytes).map_err(persist_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GOOD: &str = r#"{
        "Name": "core-sw1",
        "Type": "switch",
        "IP": "10.0.0.1",
        "Location": "MDF",
        "VLANs": "10,20",
        "Network Services": ["OSPF", "SSH"],
        "Network Layer": "core",
        "Registered-At": "2024-05-01T12:00:00Z"
    }"#;

    #[test]
    fn blank_document_is_an_empty_collection() {
        assert_eq!(
            decode(b"  \n"),
            LoadOutcome::Loaded {
                records: Vec::new(),
                quarantined: Vec::new()
            }
        );
    }

    #[test]
    fn non_array_document_is_corrupt() {
        assert!(matches!(decode(b"{}"), LoadOutcome::Corrupt { .. }));
        assert!(matches!(
            decode(b"Nombre: sw1\n----"),
            LoadOutcome::Corrupt { .. }
        ));
    }

    #[test]
    fn bad_entries_are_quarantined_individually() {
        let doc = format!(
            r#"[{GOOD},
               {{"Name": "half"}},
               {{"Name": "x", "Type": "printer", "IP": "10.0.0.9", "Location": "a",
                 "VLANs": "", "Network Services": [], "Network Layer": "core",
                 "Registered-At": "2024-05-01T12:00:00Z"}},
               {{"Name": " ", "Type": "router", "IP": "10.0.0.8", "Location": "a",
                 "VLANs": "", "Network Services": [], "Network Layer": "core",
                 "Registered-At": "2024-05-01T12:00:00Z"}}]"#
        );
        let LoadOutcome::Loaded {
            records,
            quarantined,
        } = decode(doc.as_bytes())
        else {
            panic!("expected Loaded");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "core-sw1");
        let indexes: Vec<_> = quarantined.iter().map(|q| q.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn invalid_ip_entry_is_quarantined() {
        let doc = GOOD.replace("10.0.0.1", "999.1.1.1");
        let outcome = decode(format!("[{doc}]").as_bytes());
        assert!(outcome.records().is_empty());
        assert!(outcome.is_degraded());
    }

    #[test]
    fn outcome_accessors() {
        assert!(LoadOutcome::Missing.records().is_empty());
        assert!(!LoadOutcome::Missing.is_degraded());
        let corrupt = LoadOutcome::Corrupt {
            reason: "x".into(),
        };
        assert!(corrupt.is_degraded());
        assert!(corrupt.into_records().is_empty());
    }
}
