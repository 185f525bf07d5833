//! Config subcommand handlers.

use std::path::PathBuf;

use clap::ValueEnum;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, DEFAULT_PROFILE, Profile};
use crate::error::CliError;
use crate::output::{self, Status};

use super::util::{self, prompt_err};

// ── Helpers ─────────────────────────────────────────────────────────

fn to_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unable to render: {e}"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: &str) -> Result<(), CliError> {
    match key {
        "data_file" | "data-file" => profile.data_file = Some(PathBuf::from(value)),
        "snapshot_dir" | "snapshot-dir" => profile.snapshot_dir = Some(PathBuf::from(value)),
        "device_types" | "device-types" | "types" => profile.device_types = Some(split_list(value)),
        "layers" => profile.layers = Some(split_list(value)),
        "services" => profile.services = Some(split_list(value)),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: data_file, snapshot_dir, \
                     device_types, layers, services, output, color"
                ),
            });
        }
    }
    Ok(())
}

/// `output` and `color` live under `[defaults]`. Returns `false` for any
/// other key.
fn set_default_key(cfg: &mut Config, key: &str, value: &str) -> Result<bool, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: key.into(),
        reason,
    };
    match key {
        "output" => {
            let format = OutputFormat::from_str(value, true).map_err(invalid)?;
            cfg.defaults.output = format
                .to_possible_value()
                .map_or_else(|| value.to_owned(), |v| v.get_name().to_owned());
        }
        "color" => {
            let mode = ColorMode::from_str(value, true).map_err(invalid)?;
            cfg.defaults.color = mode
                .to_possible_value()
                .map_or_else(|| value.to_owned(), |v| v.get_name().to_owned());
        }
        _ => return Ok(false),
    }
    Ok(true)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let status = Status::new(global);
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            if !util::interactive() {
                return Err(CliError::InputRequired {
                    action: "config init".into(),
                    field: "a terminal".into(),
                });
            }
            let theme = ColorfulTheme::default();
            let config_path = config::config_path();
            eprintln!("netinv configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::with_theme(&theme)
                .with_prompt("Profile name")
                .default(DEFAULT_PROFILE.into())
                .interact_text()
                .map_err(prompt_err)?;

            let data_file: String = Input::with_theme(&theme)
                .with_prompt("Data file")
                .default(
                    config::default_data_file(&profile_name)
                        .display()
                        .to_string(),
                )
                .interact_text()
                .map_err(prompt_err)?;

            let snapshot_dir: String = Input::with_theme(&theme)
                .with_prompt("Snapshot directory (blank: next to the data file)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let mut cfg = config::load_config_or_default();
            if cfg.profiles.contains_key(&profile_name)
                && !Confirm::with_theme(&theme)
                    .with_prompt(format!("Profile '{profile_name}' exists. Overwrite?"))
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?
            {
                status.notice("Cancelled; configuration unchanged");
                return Ok(());
            }

            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    data_file: Some(data_file.into()),
                    snapshot_dir: (!snapshot_dir.trim().is_empty())
                        .then(|| snapshot_dir.trim().into()),
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;
            status.success(format!("Configuration written to {}", path.display()));
            status.notice(format!("Active profile: {profile_name}"));
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(global.output, &cfg, to_toml, |c| {
                c.default_profile.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            if set_default_key(&mut cfg, &key, &value)? {
                config::save_config(&cfg)?;
                status.success(format!("Set defaults.{key} = {value}"));
                return Ok(());
            }
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, &value)?;
            // Reject values the inventory could not use before writing them.
            netinv_config::profile_to_inventory_config(Some(profile), &profile_name)?;

            config::save_config(&cfg)?;
            status.success(format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or(DEFAULT_PROFILE);
            if cfg.profiles.is_empty() {
                status.notice("No profiles configured. Run: netinv config init");
            } else {
                for name in cfg.profile_names() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: cfg.available(),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            status.success(format!("Default profile set to '{name}'"));
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn list_values_are_split_and_trimmed() {
        assert_eq!(split_list("switch, router,,"), vec!["switch", "router"]);
    }

    #[test]
    fn known_keys_update_the_profile() {
        let mut profile = Profile::default();
        set_profile_key(&mut profile, "data-file", "/srv/devices.json").unwrap();
        set_profile_key(&mut profile, "layers", "core,distribution").unwrap();
        assert_eq!(profile.data_file, Some(PathBuf::from("/srv/devices.json")));
        assert_eq!(
            profile.layers,
            Some(vec!["core".to_owned(), "distribution".to_owned()])
        );
    }

    #[test]
    fn output_default_is_normalized() {
        let mut cfg = Config::default();
        assert!(set_default_key(&mut cfg, "output", "JSON").unwrap());
        assert_eq!(cfg.defaults.output, "json");
        assert!(!set_default_key(&mut cfg, "layers", "core").unwrap());
        assert!(matches!(
            set_default_key(&mut cfg, "color", "sometimes"),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut profile = Profile::default();
        assert!(matches!(
            set_profile_key(&mut profile, "timeout", "30"),
            Err(CliError::Validation { .. })
        ));
    }
}
