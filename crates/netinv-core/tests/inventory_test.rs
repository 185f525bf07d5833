#![allow(clippy::unwrap_used)]
// End-to-end tests for `Inventory` against a real data file in a temp dir.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use netinv_core::{
    Catalog, ClearOutcome, CoreError, DeleteOutcome, DeviceRecord, DeviceType, DeviceUpdate,
    Inventory, InventoryConfig, LoadOutcome, NetworkLayer, NetworkService, NewDevice, RecordField,
    RecordStore, ValidationError,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn setup() -> (TempDir, Inventory) {
    let dir = tempfile::tempdir().unwrap();
    let inventory = Inventory::new(InventoryConfig::new(dir.path().join("devices.json")));
    (dir, inventory)
}

fn data_file(dir: &TempDir) -> PathBuf {
    dir.path().join("devices.json")
}

fn snapshot_count(dir: &Path) -> usize {
    fs::read_dir(dir).map_or(0, Iterator::count)
}

fn device(name: &str, ip: &str, device_type: DeviceType) -> NewDevice {
    NewDevice {
        name: name.into(),
        device_type,
        ip: ip.into(),
        location: "MDF".into(),
        vlans: "10,20".into(),
        services: vec![NetworkService::Ssh],
        layer: NetworkLayer::Core,
    }
}

fn seed(inventory: &Inventory) {
    inventory
        .create(device("core-sw1", "10.0.0.1", DeviceType::Switch))
        .unwrap();
    inventory
        .create(device("core-sw2", "10.0.0.2", DeviceType::Switch))
        .unwrap();
    inventory
        .create(device("edge-r1", "10.1.0.1", DeviceType::Router))
        .unwrap();
}

// ── Create / find ───────────────────────────────────────────────────

#[test]
fn test_create_then_find_round_trip() {
    let (_dir, inventory) = setup();
    let created = inventory
        .create(device("edge-r1", "192.168.1.1", DeviceType::Router))
        .unwrap();

    let found = inventory.find("EDGE").unwrap();
    assert_eq!(found, vec![created.clone()]);
    assert_eq!(found[0].device_type, DeviceType::Router);
    assert_eq!(found[0].vlans, "10,20");
    assert!(inventory.find("no-such-device").unwrap().is_empty());
}

#[test]
fn test_ipv6_text_is_stored_and_matched_as_entered() {
    let (dir, inventory) = setup();
    let typed = "2001:0DB8:0000:0000:0000:0000:0000:0001";
    let created = inventory
        .create(device("wan-r1", &format!(" {typed} "), DeviceType::Router))
        .unwrap();
    assert_eq!(created.ip, typed);

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_file(&dir)).unwrap()).unwrap();
    assert_eq!(doc[0]["IP"], typed);

    assert_eq!(inventory.find("0db8").unwrap(), vec![created.clone()]);
    assert_eq!(inventory.find("2001:0db8:0000").unwrap(), vec![created]);
    assert_eq!(inventory.find_by_identity("0DB8:0000").unwrap().len(), 1);
}

#[test]
fn test_created_file_uses_canonical_keys() {
    let (dir, inventory) = setup();
    inventory
        .create(device("ap-1", "fe80::1", DeviceType::AccessPoint))
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&fs::read(data_file(&dir)).unwrap()).unwrap();
    let entry = &raw[0];
    assert_eq!(entry["Name"], "ap-1");
    assert_eq!(entry["Type"], "access-point");
    assert_eq!(entry["IP"], "fe80::1");
    assert_eq!(entry["Network Services"], serde_json::json!(["SSH"]));
    assert_eq!(entry["Network Layer"], "core");
    assert!(
        DateTime::parse_from_rfc3339(entry["Registered-At"].as_str().unwrap()).is_ok(),
        "Registered-At should be RFC 3339"
    );
}

#[test]
fn test_create_rejects_blank_name() {
    let (dir, inventory) = setup();
    let result = inventory.create(device("   ", "10.0.0.1", DeviceType::Switch));
    assert!(matches!(
        result,
        Err(CoreError::Validation(ValidationError::Empty {
            field: RecordField::Name
        }))
    ));
    assert!(!data_file(&dir).exists());
}

#[test]
fn test_create_honours_narrow_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog {
        device_types: vec![DeviceType::Switch],
        ..Catalog::default()
    };
    let inventory = Inventory::new(
        InventoryConfig::new(dir.path().join("devices.json")).with_catalog(catalog),
    );
    let result = inventory.create(device("edge-r1", "10.0.0.1", DeviceType::Router));
    assert!(matches!(
        result,
        Err(CoreError::Validation(
            ValidationError::UnknownDeviceType { .. }
        ))
    ));
}

#[test]
fn test_find_matches_type_and_location() {
    let (_dir, inventory) = setup();
    seed(&inventory);
    assert_eq!(inventory.find("switch").unwrap().len(), 2);
    assert_eq!(inventory.find("mdf").unwrap().len(), 3);
    assert!(matches!(
        inventory.find(" "),
        Err(CoreError::EmptySearchTerm)
    ));
}

// ── Edit ────────────────────────────────────────────────────────────

#[test]
fn test_blank_edit_keeps_fields_and_refreshes_timestamp() {
    let (dir, inventory) = setup();
    let old = DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let original = DeviceRecord {
        name: "dist-sw1".into(),
        device_type: DeviceType::Switch,
        ip: "10.2.0.1".into(),
        location: "IDF-1".into(),
        vlans: "30".into(),
        services: vec![NetworkService::Snmp],
        layer: NetworkLayer::Distribution,
        registered_at: old,
    };
    RecordStore::new(data_file(&dir), dir.path().join("snapshots"))
        .save(std::slice::from_ref(&original))
        .unwrap();

    let outcome = inventory.edit("dist-sw1", &DeviceUpdate::default()).unwrap();
    assert!(outcome.applied.is_empty());
    assert!(outcome.rejected.is_empty());
    assert!(outcome.record.registered_at > old);
    assert_eq!(
        DeviceRecord {
            registered_at: old,
            ..outcome.record.clone()
        },
        original
    );
    assert!(outcome.snapshot.is_some());
    assert_eq!(inventory.list().unwrap(), vec![outcome.record]);
}

#[test]
fn test_edit_applies_valid_fields_and_reports_rejected() {
    let (_dir, inventory) = setup();
    seed(&inventory);

    let update = DeviceUpdate {
        ip: Some("10.9.9.9".into()),
        layer: Some("bogus".into()),
        services: Some(vec![NetworkService::Ospf, NetworkService::Dns]),
        ..DeviceUpdate::default()
    };
    let outcome = inventory.edit("edge-r1", &update).unwrap();

    assert_eq!(
        outcome.applied,
        vec![RecordField::Ip, RecordField::Services]
    );
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].field(), RecordField::Layer);

    let stored = inventory.resolve("10.9.9.9").unwrap();
    assert_eq!(stored.name, "edge-r1");
    assert_eq!(stored.layer, NetworkLayer::Core);
    assert_eq!(
        stored.services,
        vec![NetworkService::Ospf, NetworkService::Dns]
    );
}

#[test]
fn test_ambiguous_edit_leaves_file_untouched() {
    let (dir, inventory) = setup();
    seed(&inventory);
    let before = fs::read(data_file(&dir)).unwrap();

    let update = DeviceUpdate {
        location: Some("IDF-9".into()),
        ..DeviceUpdate::default()
    };
    match inventory.edit("core-sw", &update) {
        Err(CoreError::AmbiguousMatch { matches, .. }) => {
            let names: Vec<_> = matches.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["core-sw1", "core-sw2"]);
        }
        other => panic!("expected AmbiguousMatch, got: {other:?}"),
    }
    assert_eq!(fs::read(data_file(&dir)).unwrap(), before);
    assert_eq!(snapshot_count(&dir.path().join("snapshots")), 0);
}

#[test]
fn test_edit_without_match_is_not_found() {
    let (_dir, inventory) = setup();
    seed(&inventory);
    let result = inventory.edit("nothing", &DeviceUpdate::default());
    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

// ── Delete / clear ──────────────────────────────────────────────────

#[test]
fn test_delete_removes_every_match() {
    let (dir, inventory) = setup();
    seed(&inventory);

    assert_eq!(inventory.find_by_identity("10.0.0.").unwrap().len(), 2);
    let outcome = inventory.delete("10.0.0.").unwrap();
    assert_eq!(outcome.count(), 2);
    let DeleteOutcome::Deleted { removed, snapshot } = outcome else {
        panic!("expected Deleted");
    };
    assert_eq!(removed.len(), 2);
    assert!(snapshot.unwrap().exists());

    let remaining = inventory.list().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "edge-r1");

    let before = fs::read(data_file(&dir)).unwrap();
    let again = inventory.delete("10.0.0.").unwrap();
    assert_eq!(again, DeleteOutcome::NotFound);
    assert_eq!(again.count(), 0);
    assert_eq!(fs::read(data_file(&dir)).unwrap(), before);
}

#[test]
fn test_clear_requires_confirmation() {
    let (dir, inventory) = setup();
    seed(&inventory);
    let snapshots = dir.path().join("snapshots");
    let before = fs::read(data_file(&dir)).unwrap();

    assert_eq!(inventory.clear(false).unwrap(), ClearOutcome::Cancelled);
    assert_eq!(fs::read(data_file(&dir)).unwrap(), before);
    assert_eq!(snapshot_count(&snapshots), 0);

    let ClearOutcome::Cleared { removed, snapshot } = inventory.clear(true).unwrap() else {
        panic!("expected Cleared");
    };
    assert_eq!(removed, 3);
    assert_eq!(snapshot_count(&snapshots), 1);
    assert_eq!(fs::read(snapshot.unwrap()).unwrap(), before);
    assert!(inventory.list().unwrap().is_empty());
    assert_eq!(fs::read_to_string(data_file(&dir)).unwrap(), "[]\n");
}

// ── Degraded storage ────────────────────────────────────────────────

#[test]
fn test_missing_file_reads_as_empty() {
    let (_dir, inventory) = setup();
    assert_eq!(inventory.store().load().unwrap(), LoadOutcome::Missing);
    assert!(inventory.list().unwrap().is_empty());
    assert!(inventory.report().unwrap().is_empty());
}

#[test]
fn test_corrupt_file_reads_as_empty_and_is_preserved_on_write() {
    let (dir, inventory) = setup();
    fs::write(data_file(&dir), "Nombre: sw1\n-----\n").unwrap();

    assert!(inventory.list().unwrap().is_empty());
    assert!(matches!(
        inventory.store().load().unwrap(),
        LoadOutcome::Corrupt { .. }
    ));
    assert_eq!(
        fs::read_to_string(data_file(&dir)).unwrap(),
        "Nombre: sw1\n-----\n"
    );

    inventory
        .create(device("core-sw1", "10.0.0.1", DeviceType::Switch))
        .unwrap();
    let snapshots = inventory.store().snapshots().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(
        fs::read_to_string(&snapshots[0].path).unwrap(),
        "Nombre: sw1\n-----\n"
    );
    assert_eq!(inventory.list().unwrap().len(), 1);
}

#[test]
fn test_snapshot_failure_aborts_the_write() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let inventory = Inventory::new(
        InventoryConfig::new(dir.path().join("devices.json")).with_snapshot_dir(&blocker),
    );
    seed(&inventory);
    let before = fs::read(data_file(&dir)).unwrap();

    let relocate = DeviceUpdate {
        location: Some("IDF-9".into()),
        ..DeviceUpdate::default()
    };
    assert!(matches!(
        inventory.edit("edge-r1", &relocate),
        Err(CoreError::Snapshot { .. })
    ));
    assert!(matches!(
        inventory.delete("core-sw1"),
        Err(CoreError::Snapshot { .. })
    ));
    assert!(matches!(
        inventory.clear(true),
        Err(CoreError::Snapshot { .. })
    ));
    assert_eq!(fs::read(data_file(&dir)).unwrap(), before);
}

#[test]
fn test_unwritable_location_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "").unwrap();
    let store = RecordStore::new(blocker.join("devices.json"), dir.path().join("snapshots"));

    assert!(matches!(
        store.save(&[]),
        Err(CoreError::Persistence { .. })
    ));
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b").join("devices.json");
    let inventory = Inventory::new(InventoryConfig::new(&nested));
    inventory
        .create(device("core-sw1", "10.0.0.1", DeviceType::Switch))
        .unwrap();
    assert!(nested.is_file());
}

// ── Report / snapshots ──────────────────────────────────────────────

#[test]
fn test_report_groups_sum_to_total() {
    let (_dir, inventory) = setup();
    seed(&inventory);
    let report = inventory.report().unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.by_type.iter().map(|g| g.count).sum::<usize>(), 3);
    assert_eq!(report.by_layer.iter().map(|g| g.count).sum::<usize>(), 3);
    assert_eq!(report.by_type[0].key, DeviceType::Switch);
    assert_eq!(report.by_service[0].key, NetworkService::Ssh);
    assert_eq!(report.by_service[0].count, 3);
}

#[test]
fn test_restore_brings_back_deleted_devices() {
    let (dir, inventory) = setup();
    seed(&inventory);
    inventory.delete("core").unwrap();
    assert_eq!(inventory.list().unwrap().len(), 1);

    let snapshots = inventory.store().snapshots().unwrap();
    assert_eq!(snapshots.len(), 1);
    let target = inventory.store().resolve_snapshot(&snapshots[0].file_name);
    let previous = inventory.store().restore(&target).unwrap();

    assert!(previous.is_some());
    assert_eq!(inventory.list().unwrap().len(), 3);
    assert_eq!(snapshot_count(&dir.path().join("snapshots")), 2);
}

#[test]
fn test_restore_rejects_corrupt_snapshot() {
    let (dir, inventory) = setup();
    seed(&inventory);
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{not json").unwrap();

    assert!(matches!(
        inventory.store().restore(&bad),
        Err(CoreError::InvalidSnapshot { .. })
    ));
    assert_eq!(inventory.list().unwrap().len(), 3);
}
