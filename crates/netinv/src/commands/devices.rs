//! Device command handlers: add, find, list, edit, delete, clear.

use chrono::Local;
use tabled::Tabled;

use netinv_core::{
    Catalog, ClearOutcome, DeleteOutcome, DeviceRecord, DeviceUpdate, Inventory, ValidationError,
};

use crate::cli::{AddArgs, DeviceFields, EditArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Status};

use super::{prompt, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "VLANs")]
    vlans: String,
    #[tabled(rename = "Services")]
    services: String,
    #[tabled(rename = "Layer")]
    layer: String,
    #[tabled(rename = "Registered")]
    registered: String,
}

impl From<&DeviceRecord> for DeviceRow {
    fn from(d: &DeviceRecord) -> Self {
        Self {
            name: d.name.clone(),
            dtype: d.device_type.to_string(),
            ip: d.ip.clone(),
            location: d.location.clone(),
            vlans: dash(&d.vlans),
            services: services(d),
            layer: d.layer.to_string(),
            registered: registered(d),
        }
    }
}

fn dash(s: &str) -> String {
    if s.is_empty() { "-".into() } else { s.into() }
}

fn services(d: &DeviceRecord) -> String {
    if d.services.is_empty() {
        return "-".into();
    }
    d.services
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn registered(d: &DeviceRecord) -> String {
    d.registered_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub(crate) fn detail(d: &DeviceRecord) -> String {
    [
        format!("Name:       {}", d.name),
        format!("Type:       {}", d.device_type),
        format!("IP:         {}", d.ip),
        format!("Location:   {}", d.location),
        format!("VLANs:      {}", dash(&d.vlans)),
        format!("Services:   {}", services(d)),
        format!("Layer:      {}", d.layer),
        format!("Registered: {}", registered(d)),
    ]
    .join("\n")
}

/// Render records, or a notice when there are none in table mode.
pub(crate) fn print_records(
    records: &[DeviceRecord],
    empty_notice: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if records.is_empty() && global.output == OutputFormat::Table {
        Status::new(global).notice(empty_notice);
        return Ok(());
    }
    let out = output::render_list(
        global.output,
        records,
        |d| DeviceRow::from(d),
        |d| d.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn add(inventory: &Inventory, args: &AddArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device = prompt::new_device(&args.fields, inventory.catalog(), args.no_input)?;
    let record = inventory.create(device)?;

    Status::new(global).success(format!("Registered {} ({})", record.name, record.ip));
    let out = output::render_single(global.output, &record, detail, |d| d.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn find(inventory: &Inventory, term: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let matches = inventory.find(term)?;
    print_records(&matches, &format!("No devices match '{term}'"), global)
}

pub fn list(inventory: &Inventory, global: &GlobalOpts) -> Result<(), CliError> {
    let records = inventory.list()?;
    print_records(&records, "Inventory is empty. Add one with: netinv add", global)
}

pub fn edit(inventory: &Inventory, args: &EditArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let status = Status::new(global);

    let (update, mut rejected) = if args.fields.is_empty() && !args.clear_services {
        // Resolve first so an ambiguous term fails before any prompting.
        let current = inventory.resolve(&args.term)?;
        if !util::interactive() {
            return Err(CliError::InputRequired {
                action: "edit".into(),
                field: "at least one field flag".into(),
            });
        }
        (prompt::device_update(&current, inventory.catalog())?, Vec::new())
    } else {
        update_from_flags(&args.fields, args.clear_services, inventory.catalog())
    };

    let outcome = inventory.edit(&args.term, &update)?;
    rejected.extend(outcome.rejected.iter().cloned());
    for err in &rejected {
        status.warn(format!("{} kept: {err}", err.field()));
    }
    status.success(format!(
        "Updated {} ({} changed, {} rejected)",
        outcome.record.name,
        outcome.applied.len(),
        rejected.len()
    ));

    let out = output::render_single(
        global.output,
        &outcome,
        |o| detail(&o.record),
        |o| o.record.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Translate flags into a `DeviceUpdate`.
///
/// Services are typed in `DeviceUpdate`, so a bad `--services` list is
/// rejected here and reported alongside the engine's own rejections.
fn update_from_flags(
    fields: &DeviceFields,
    clear_services: bool,
    catalog: &Catalog,
) -> (DeviceUpdate, Vec<ValidationError>) {
    let mut rejected = Vec::new();
    let services = if clear_services {
        Some(Vec::new())
    } else {
        match fields.services.as_deref().map(|raw| catalog.services(raw)) {
            Some(Ok(list)) => Some(list),
            Some(Err(e)) => {
                rejected.push(e);
                None
            }
            None => None,
        }
    };

    let update = DeviceUpdate {
        name: fields.name.clone(),
        device_type: fields.device_type.clone(),
        ip: fields.ip.clone(),
        location: fields.location.clone(),
        vlans: fields.vlans.clone(),
        services,
        layer: fields.layer.clone(),
    };
    (update, rejected)
}

pub fn delete(inventory: &Inventory, term: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let status = Status::new(global);
    let matches = inventory.find_by_identity(term)?;
    if matches.is_empty() {
        return Err(CliError::NotFound { term: term.into() });
    }

    if global.output == OutputFormat::Table && !global.quiet {
        eprintln!("{}", output::render_table(&rows(&matches)));
    }
    let prompt = format!("Delete {}?", util::devices(matches.len()));
    if !util::confirm("delete", &prompt, global.yes)? {
        status.notice("Cancelled; nothing was deleted");
        return Ok(());
    }

    let outcome = inventory.delete(term)?;
    if let DeleteOutcome::Deleted {
        snapshot: Some(path),
        ..
    } = &outcome
    {
        status.notice(format!("Snapshot saved to {}", path.display()));
    }
    let out = output::render_single(
        global.output,
        &outcome,
        |o| format!("Deleted {}", util::devices(o.count())),
        |o| o.count().to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn clear(inventory: &Inventory, global: &GlobalOpts) -> Result<(), CliError> {
    let status = Status::new(global);
    let count = inventory.list()?.len();
    let prompt = format!(
        "Remove all {} from {}?",
        util::devices(count),
        inventory.store().data_file().display()
    );
    let confirmed = util::confirm("clear", &prompt, global.yes)?;

    match inventory.clear(confirmed)? {
        ClearOutcome::Cancelled => status.notice("Cancelled; nothing was changed"),
        ClearOutcome::Cleared { removed, snapshot } => {
            if let Some(path) = snapshot {
                status.notice(format!("Snapshot saved to {}", path.display()));
            }
            status.success(format!("Cleared {}", util::devices(removed)));
        }
    }
    Ok(())
}

pub(crate) fn rows(records: &[DeviceRecord]) -> Vec<DeviceRow> {
    records.iter().map(DeviceRow::from).collect()
}
