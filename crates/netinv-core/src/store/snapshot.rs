// ── Pre-write snapshots ──
//
// Full copies of the data file named `<stem>_<YYYYMMDD>_<HHMMSS>_<micros>.<ext>`.
// Names never collide: a numeric suffix is added if one is already taken.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;

/// A snapshot file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

pub(crate) fn take(data_file: &Path, dir: &Path) -> Result<Option<PathBuf>, CoreError> {
    if !data_file.exists() {
        debug!(path = %data_file.display(), "nothing to snapshot yet");
        return Ok(None);
    }

    let fail = |source: io::Error| CoreError::Snapshot {
        path: dir.to_path_buf(),
        source,
    };
    fs::create_dir_all(dir).map_err(fail)?;
    let target = unique_path(data_file, dir, Local::now());
    fs::copy(data_file, &target).map_err(fail)?;

    debug!(snapshot = %target.display(), "snapshot written");
    Ok(Some(target))
}

pub(crate) fn list(data_file: &Path, dir: &Path) -> Result<Vec<SnapshotInfo>, CoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(CoreError::Read {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let prefix = format!("{}_", stem(data_file));
    let ext = extension(data_file);
    let mut found = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !belongs_to(name, &prefix, &ext) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let file_name = name.to_owned();
        found.push(SnapshotInfo {
            file_name,
            path,
            size_bytes: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        });
    }

    found.sort_by(|a, b| b.file_name.cmp(&a.file_name));
    Ok(found)
}

/// `<prefix><digit>...<.ext>` -- the digit check keeps `devices_lab_*`
/// snapshots out of the `devices` listing.
fn belongs_to(name: &str, prefix: &str, ext: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        && name.ends_with(&format!(".{ext}"))
}

fn unique_path(data_file: &Path, dir: &Path, now: DateTime<Local>) -> PathBuf {
    let base = format!("{}_{}", stem(data_file), now.format("%Y%m%d_%H%M%S_%6f"));
    let ext = extension(data_file);
    let mut candidate = dir.join(format!("{base}.{ext}"));
    let mut n = 1u32;
    while candidate.exists() {
        candidate = dir.join(format!("{base}-{n}.{ext}"));
        n += 1;
    }
    candidate
}

fn stem(data_file: &Path) -> String {
    data_file
        .file_stem()
        .map_or_else(|| "inventory".into(), |s| s.to_string_lossy().into_owned())
}

fn extension(data_file: &Path) -> String {
    data_file
        .extension()
        .map_or_else(|| "json".into(), |s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_name_embeds_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let path = unique_path(Path::new("/data/devices.json"), dir.path(), now);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "devices_20240309_140507_000000.json"
        );
    }

    #[test]
    fn taken_names_get_a_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let first = unique_path(Path::new("devices.json"), dir.path(), now);
        fs::write(&first, "[]").unwrap();
        let second = unique_path(Path::new("devices.json"), dir.path(), now);
        assert_ne!(first, second);
        assert!(second.to_str().unwrap().ends_with("_000000-1.json"));
    }

    #[test]
    fn missing_data_file_is_not_snapshotted() {
        let dir = tempfile::tempdir().unwrap();
        let taken = take(&dir.path().join("devices.json"), &dir.path().join("snaps")).unwrap();
        assert!(taken.is_none());
        assert!(!dir.path().join("snaps").exists());
    }

    #[test]
    fn listing_filters_other_inventories() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "devices_20240101_000000_000000.json",
            "devices_20240102_000000_000000.json",
            "devices_lab_20240103_000000_000000.json",
            "devices_20240104_000000_000000.txt",
            "notes.md",
        ] {
            fs::write(dir.path().join(name), "[]").unwrap();
        }
        let names: Vec<_> = list(Path::new("devices.json"), dir.path())
            .unwrap()
            .into_iter()
            .map(|s| s.file_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "devices_20240102_000000_000000.json",
                "devices_20240101_000000_000000.json",
            ]
        );
    }

    #[test]
    fn listing_a_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            list(Path::new("devices.json"), &dir.path().join("nope"))
                .unwrap()
                .is_empty()
        );
    }
}
