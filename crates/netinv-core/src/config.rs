// ── Runtime inventory configuration ──
//
// These types describe *where* the inventory lives and *which*
// vocabularies operators may use. They never touch disk themselves.
// The CLI builds an `InventoryConfig` and hands it in.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::model::validate::normalize_token;
use crate::model::{DeviceType, NetworkLayer, NetworkService, ValidationError};

/// Allowed values for the enumerated record fields.
///
/// Defaults to every variant. A narrower catalog makes values outside it
/// fail validation on create and edit; records already on disk are not
/// affected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub device_types: Vec<DeviceType>,
    pub layers: Vec<NetworkLayer>,
    pub services: Vec<NetworkService>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            device_types: DeviceType::iter().collect(),
            layers: NetworkLayer::iter().collect(),
            services: NetworkService::iter().collect(),
        }
    }
}

impl Catalog {
    /// Parse a device type, case-insensitively, restricted to this catalog.
    pub fn device_type(&self, raw: &str) -> Result<DeviceType, ValidationError> {
        DeviceType::from_str(&normalize_token(raw))
            .ok()
            .filter(|t| self.device_types.contains(t))
            .ok_or_else(|| ValidationError::UnknownDeviceType {
                value: raw.trim().to_owned(),
                expected: join(&self.device_types),
            })
    }

    /// Parse a network layer, case-insensitively, restricted to this catalog.
    pub fn layer(&self, raw: &str) -> Result<NetworkLayer, ValidationError> {
        NetworkLayer::from_str(&normalize_token(raw))
            .ok()
            .filter(|l| self.layers.contains(l))
            .ok_or_else(|| ValidationError::UnknownLayer {
                value: raw.trim().to_owned(),
                expected: join(&self.layers),
            })
    }

    /// Parse a single network service, restricted to this catalog.
    pub fn service(&self, raw: &str) -> Result<NetworkService, ValidationError> {
        NetworkService::from_str(raw.trim())
            .ok()
            .filter(|s| self.services.contains(s))
            .ok_or_else(|| ValidationError::UnknownService {
                value: raw.trim().to_owned(),
                expected: join(&self.services),
            })
    }

    /// Parse a comma-separated service list, keeping first-mention order.
    ///
    /// Blank input yields an empty list; repeats are dropped.
    pub fn services(&self, raw: &str) -> Result<Vec<NetworkService>, ValidationError> {
        let mut selected = Vec::new();
        for token in raw.split(',').filter(|t| !t.trim().is_empty()) {
            let service = self.service(token)?;
            if !selected.contains(&service) {
                selected.push(service);
            }
        }
        Ok(selected)
    }

    pub fn check_device_type(&self, device_type: DeviceType) -> Result<(), ValidationError> {
        if self.device_types.contains(&device_type) {
            Ok(())
        } else {
            Err(ValidationError::UnknownDeviceType {
                value: device_type.to_string(),
                expected: join(&self.device_types),
            })
        }
    }

    pub fn check_layer(&self, layer: NetworkLayer) -> Result<(), ValidationError> {
        if self.layers.contains(&layer) {
            Ok(())
        } else {
            Err(ValidationError::UnknownLayer {
                value: layer.to_string(),
                expected: join(&self.layers),
            })
        }
    }

    /// Check an already-typed service selection against this catalog.
    pub fn check_services(&self, services: &[NetworkService]) -> Result<(), ValidationError> {
        for (i, service) in services.iter().enumerate() {
            if !self.services.contains(service) {
                return Err(ValidationError::UnknownService {
                    value: service.to_string(),
                    expected: join(&self.services),
                });
            }
            if services[..i].contains(service) {
                return Err(ValidationError::DuplicateService { service: *service });
            }
        }
        Ok(())
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Configuration for a single inventory.
///
/// Built by the CLI, passed to [`Inventory`](crate::Inventory) -- core never
/// reads config files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// JSON document holding the device collection.
    pub data_file: PathBuf,
    /// Directory receiving pre-write snapshots.
    pub snapshot_dir: PathBuf,
    /// Allowed enumerated values.
    pub catalog: Catalog,
}

impl InventoryConfig {
    /// Inventory at `data_file`, snapshots in a sibling `snapshots/`
    /// directory, full catalog.
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        let data_file = data_file.into();
        let snapshot_dir = default_snapshot_dir(&data_file);
        Self {
            data_file,
            snapshot_dir,
            catalog: Catalog::default(),
        }
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }
}

fn default_snapshot_dir(data_file: &Path) -> PathBuf {
    data_file
        .parent()
        .map_or_else(|| PathBuf::from("snapshots"), |p| p.join("snapshots"))
}
