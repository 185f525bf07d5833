//! CLI configuration -- thin wrapper around `netinv_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--profile, --data-file, --snapshot-dir).

use clap::parser::ValueSource;
use clap::{ArgMatches, ValueEnum};
use netinv_core::InventoryConfig;
use tracing::{debug, warn};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use netinv_config::{
    Config, DEFAULT_PROFILE, Profile, config_path, default_data_file,
    load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// Fill `--output` and `--color` from `[defaults]` when neither the flag
/// nor its env var was given.
pub fn apply_defaults(global: &mut GlobalOpts, matches: &ArgMatches) {
    let cfg = load_config_or_default();
    let unset = |id: &str| {
        matches!(
            matches.value_source(id),
            None | Some(ValueSource::DefaultValue)
        )
    };

    if unset("output") {
        match OutputFormat::from_str(&cfg.defaults.output, true) {
            Ok(format) => global.output = format,
            Err(_) => warn!(value = %cfg.defaults.output, "ignoring unknown defaults.output"),
        }
    }
    if unset("color") {
        match ColorMode::from_str(&cfg.defaults.color, true) {
            Ok(mode) => global.color = mode,
            Err(_) => warn!(value = %cfg.defaults.color, "ignoring unknown defaults.color"),
        }
    }
}

/// Build the `InventoryConfig` for this invocation.
///
/// Flags beat the profile. An explicit `--data-file` works even when the
/// named profile is not declared.
pub fn resolve_inventory(global: &GlobalOpts) -> Result<InventoryConfig, CliError> {
    let cfg = netinv_config::load_config()?;
    resolve_with(&cfg, global)
}

/// With `--data-file`, only the profile's catalog carries over. Its data
/// file and snapshot dir belong to a different inventory, so snapshots
/// default to a `snapshots/` dir beside the given file.
fn resolve_with(cfg: &Config, global: &GlobalOpts) -> Result<InventoryConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut inventory = match (&global.data_file, cfg.profiles.get(&profile_name)) {
        (Some(path), Some(profile)) => {
            let from_profile =
                netinv_config::profile_to_inventory_config(Some(profile), &profile_name)?;
            InventoryConfig::new(path).with_catalog(from_profile.catalog)
        }
        (Some(path), None) => InventoryConfig::new(path),
        (None, _) => cfg.inventory_config(&profile_name)?,
    };

    if let Some(dir) = &global.snapshot_dir {
        inventory = inventory.with_snapshot_dir(dir);
    }

    debug!(
        profile = %profile_name,
        data_file = %inventory.data_file.display(),
        snapshot_dir = %inventory.snapshot_dir.display(),
        "resolved inventory"
    );
    Ok(inventory)
}
