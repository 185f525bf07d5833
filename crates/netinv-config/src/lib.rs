//! Shared configuration for the netinv CLI.
//!
//! TOML profiles (one per inventory), loading through figment, and
//! translation to `netinv_core::InventoryConfig`. The CLI layers its flag
//! overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netinv_core::{Catalog, InventoryConfig, ValidationError};

/// Profile used when neither the flag nor the config names one.
pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named inventory profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve `name` to an inventory configuration.
    ///
    /// The default profile works without a config entry; any other name
    /// must be declared.
    pub fn inventory_config(&self, name: &str) -> Result<InventoryConfig, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => profile_to_inventory_config(Some(profile), name),
            None if name == DEFAULT_PROFILE => profile_to_inventory_config(None, name),
            None => Err(ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.available(),
            }),
        }
    }

    /// Comma-separated profile names for error messages.
    pub fn available(&self) -> String {
        let names = self.profile_names();
        if names.is_empty() {
            "(none)".into()
        } else {
            names.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// JSON data file. Defaults to `<data dir>/<profile>.json`
    /// (`devices.json` for the default profile).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Snapshot directory. Defaults to `snapshots/` next to the data file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<PathBuf>,

    /// Restrict the allowed device types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_types: Option<Vec<String>>,

    /// Restrict the allowed network layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<String>>,

    /// Restrict the allowed network services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "netinv", "netinv")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding inventories that do not name their own data file.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("netinv");
    p
}

/// Default data file for a profile without an explicit `data_file`.
pub fn default_data_file(profile_name: &str) -> PathBuf {
    if profile_name == DEFAULT_PROFILE {
        data_dir().join("devices.json")
    } else {
        data_dir().join(format!("{profile_name}.json"))
    }
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still merging `NETINV_*` env on top.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETINV_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile translation ─────────────────────────────────────────────

/// Build an `InventoryConfig` from a profile, no CLI flag overrides.
///
/// `None` means "all defaults" for `profile_name`.
pub fn profile_to_inventory_config(
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<InventoryConfig, ConfigError> {
    let Some(profile) = profile else {
        return Ok(InventoryConfig::new(default_data_file(profile_name)));
    };

    let data_file = profile
        .data_file
        .clone()
        .unwrap_or_else(|| default_data_file(profile_name));
    let mut config = InventoryConfig::new(data_file).with_catalog(catalog(profile)?);
    if let Some(dir) = &profile.snapshot_dir {
        config = config.with_snapshot_dir(dir);
    }
    Ok(config)
}

fn catalog(profile: &Profile) -> Result<Catalog, ConfigError> {
    let full = Catalog::default();
    let mut catalog = full.clone();
    if let Some(types) = &profile.device_types {
        catalog.device_types = restrict("device_types", types, |s| full.device_type(s))?;
    }
    if let Some(layers) = &profile.layers {
        catalog.layers = restrict("layers", layers, |s| full.layer(s))?;
    }
    if let Some(services) = &profile.services {
        catalog.services = restrict("services", services, |s| full.service(s))?;
    }
    Ok(catalog)
}

fn restrict<T: PartialEq>(
    field: &str,
    raw: &[String],
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ConfigError> {
    let mut allowed = Vec::with_capacity(raw.len());
    for value in raw {
        let parsed = parse(value).map_err(|e| ConfigError::Validation {
            field: field.into(),
            reason: e.to_string(),
        })?;
        if !allowed.contains(&parsed) {
            allowed.push(parsed);
        }
    }
    if allowed.is_empty() {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must list at least one value".into(),
        });
    }
    Ok(allowed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netinv_core::{DeviceType, NetworkLayer, NetworkService};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                data_file: Some("/srv/lab.json".into()),
                layers: Some(vec!["core".into()]),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["lab"], cfg.profiles["lab"]);
    }

    #[test]
    fn default_profile_needs_no_entry() {
        let cfg = Config::default();
        let inv = cfg.inventory_config("default").unwrap();
        assert!(inv.data_file.ends_with("devices.json"));
        assert_eq!(inv.catalog, Catalog::default());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        match cfg.inventory_config("lab") {
            Err(ConfigError::ProfileNotFound { name, available }) => {
                assert_eq!(name, "lab");
                assert_eq!(available, "(none)");
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn profile_overrides_paths_and_catalog() {
        let profile = Profile {
            data_file: Some("/srv/lab.json".into()),
            snapshot_dir: Some("/srv/backups".into()),
            device_types: Some(vec!["Switch".into(), "router".into(), "switch".into()]),
            layers: None,
            services: Some(vec!["ssh".into(), "snmp".into()]),
        };
        let inv = profile_to_inventory_config(Some(&profile), "lab").unwrap();
        assert_eq!(inv.data_file, PathBuf::from("/srv/lab.json"));
        assert_eq!(inv.snapshot_dir, PathBuf::from("/srv/backups"));
        assert_eq!(
            inv.catalog.device_types,
            vec![DeviceType::Switch, DeviceType::Router]
        );
        assert_eq!(inv.catalog.layers.len(), 3);
        assert_eq!(
            inv.catalog.services,
            vec![NetworkService::Ssh, NetworkService::Snmp]
        );
        assert!(inv.catalog.layers.contains(&NetworkLayer::Access));
    }

    #[test]
    fn named_profile_defaults_its_file_name() {
        let inv = profile_to_inventory_config(Some(&Profile::default()), "lab").unwrap();
        assert!(inv.data_file.ends_with("lab.json"));
    }

    #[test]
    fn bad_catalog_values_are_rejected() {
        let profile = Profile {
            layers: Some(vec!["edge".into()]),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_inventory_config(Some(&profile), "x"),
            Err(ConfigError::Validation { field, .. }) if field == "layers"
        ));

        let empty = Profile {
            services: Some(Vec::new()),
            ..Profile::default()
        };
        assert!(profile_to_inventory_config(Some(&empty), "x").is_err());
    }
}
