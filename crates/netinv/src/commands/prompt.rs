//! Interactive field prompts for `add`, `edit` and the menu.
//!
//! Validation lives in core; these helpers only loop until core accepts
//! the input.

use std::fmt::Display;

use dialoguer::{Input, MultiSelect, Select, theme::ColorfulTheme};

use netinv_core::model::validate;
use netinv_core::{
    Catalog, DeviceRecord, DeviceUpdate, NetworkService, NewDevice, RecordField, ValidationError,
};

use crate::cli::DeviceFields;
use crate::error::CliError;

use super::util::{self, prompt_err};

// ── Primitive prompts ───────────────────────────────────────────────

/// Free text, re-prompted until `check` accepts it.
pub fn validated<T>(
    label: &str,
    check: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<T, CliError> {
    let theme = ColorfulTheme::default();
    let raw: String = Input::<String>::with_theme(&theme)
        .with_prompt(label)
        .validate_with(|s: &String| check(s.as_str()).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()
        .map_err(prompt_err)?;
    Ok(check(&raw)?)
}

/// Free text that may be left blank.
pub fn optional(label: &str) -> Result<String, CliError> {
    let theme = ColorfulTheme::default();
    Input::<String>::with_theme(&theme)
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)
}

/// Non-empty search term.
pub fn term(label: &str) -> Result<String, CliError> {
    validated(label, |s| validate::required_text(RecordField::Name, s))
}

fn select_one<T: Copy + Display + PartialEq>(
    label: &str,
    options: &[T],
    current: Option<T>,
) -> Result<T, CliError> {
    let theme = ColorfulTheme::default();
    let items: Vec<String> = options.iter().map(ToString::to_string).collect();
    let default = current
        .and_then(|c| options.iter().position(|o| *o == c))
        .unwrap_or(0);
    let index = Select::with_theme(&theme)
        .with_prompt(label)
        .items(&items)
        .default(default)
        .interact()
        .map_err(prompt_err)?;
    options.get(index).copied().ok_or_else(|| CliError::Validation {
        field: label.into(),
        reason: "selection out of range".into(),
    })
}

/// Multi-select over the catalog's services, pre-checking `current`.
pub fn pick_services(
    options: &[NetworkService],
    current: &[NetworkService],
) -> Result<Vec<NetworkService>, CliError> {
    let theme = ColorfulTheme::default();
    let items: Vec<String> = options.iter().map(ToString::to_string).collect();
    let checked: Vec<bool> = options.iter().map(|s| current.contains(s)).collect();
    let picked = MultiSelect::with_theme(&theme)
        .with_prompt("Network Services (Space to toggle, Enter to confirm)")
        .items(&items)
        .defaults(&checked)
        .interact()
        .map_err(prompt_err)?;
    Ok(picked
        .into_iter()
        .filter_map(|i| options.get(i).copied())
        .collect())
}

/// Text for an edit: blank keeps the current value, anything else must pass
/// `check`.
fn keep_or<T>(
    field: RecordField,
    current: &str,
    check: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<Option<String>, CliError> {
    let theme = ColorfulTheme::default();
    let raw: String = Input::<String>::with_theme(&theme)
        .with_prompt(format!("{field} [{current}]"))
        .allow_empty(true)
        .validate_with(|s: &String| {
            if s.trim().is_empty() {
                Ok(())
            } else {
                check(s.as_str()).map(|_| ()).map_err(|e| e.to_string())
            }
        })
        .interact_text()
        .map_err(prompt_err)?;
    Ok(Some(raw))
}

// ── Record-level prompts ────────────────────────────────────────────

/// Build a `NewDevice` from flags, prompting for whatever is missing.
///
/// Without a terminal (or with `no_input`) missing required fields are an
/// error; VLANs and services default to empty.
pub fn new_device(
    fields: &DeviceFields,
    catalog: &Catalog,
    no_input: bool,
) -> Result<NewDevice, CliError> {
    let can_prompt = !no_input && util::interactive();
    let missing = |flag: &str| CliError::InputRequired {
        action: "add".into(),
        field: format!("--{flag}"),
    };

    let name = match &fields.name {
        Some(raw) => validate::required_text(RecordField::Name, raw)?,
        None if can_prompt => validated("Name", |s| validate::required_text(RecordField::Name, s))?,
        None => return Err(missing("name")),
    };
    let device_type = match &fields.device_type {
        Some(raw) => catalog.device_type(raw)?,
        None if can_prompt => select_one("Type", &catalog.device_types, None)?,
        None => return Err(missing("type")),
    };
    let ip = match &fields.ip {
        Some(raw) => validate::ip_address(raw)?,
        None if can_prompt => validated("IP", validate::ip_address)?,
        None => return Err(missing("ip")),
    };
    let location = match &fields.location {
        Some(raw) => validate::required_text(RecordField::Location, raw)?,
        None if can_prompt => validated("Location", |s| {
            validate::required_text(RecordField::Location, s)
        })?,
        None => return Err(missing("location")),
    };
    let vlans = match &fields.vlans {
        Some(raw) => raw.trim().to_owned(),
        None if can_prompt => optional("VLANs")?.trim().to_owned(),
        None => String::new(),
    };
    let services = match &fields.services {
        Some(raw) => catalog.services(raw)?,
        None if can_prompt => pick_services(&catalog.services, &[])?,
        None => Vec::new(),
    };
    let layer = match &fields.layer {
        Some(raw) => catalog.layer(raw)?,
        None if can_prompt => select_one("Network Layer", &catalog.layers, None)?,
        None => return Err(missing("layer")),
    };

    Ok(NewDevice {
        name,
        device_type,
        ip,
        location,
        vlans,
        services,
        layer,
    })
}

/// Walk every field of `current`; blank answers keep the stored value.
pub fn device_update(current: &DeviceRecord, catalog: &Catalog) -> Result<DeviceUpdate, CliError> {
    Ok(DeviceUpdate {
        name: keep_or(RecordField::Name, &current.name, |s| {
            validate::required_text(RecordField::Name, s)
        })?,
        device_type: keep_or(RecordField::Type, &current.device_type.to_string(), |s| {
            catalog.device_type(s)
        })?,
        ip: keep_or(RecordField::Ip, &current.ip, validate::ip_address)?,
        location: keep_or(RecordField::Location, &current.location, |s| {
            validate::required_text(RecordField::Location, s)
        })?,
        vlans: keep_or(RecordField::Vlans, &current.vlans, |s| {
            Ok::<_, ValidationError>(s.to_owned())
        })?,
        services: Some(pick_services(&catalog.services, &current.services)?),
        layer: keep_or(RecordField::Layer, &current.layer.to_string(), |s| {
            catalog.layer(s)
        })?,
    })
}
