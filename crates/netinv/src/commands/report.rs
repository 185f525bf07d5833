//! Report command: aggregate view by type, layer and service.

use std::fmt::{Display, Write};

use netinv_core::{DeviceRecord, Group, Inventory, InventoryReport};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{devices, util};

/// Group sections as text. The device table is appended separately.
fn render_groups(report: &InventoryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Inventory report: {}", util::devices(report.total));
    section(&mut out, "By type", &report.by_type, name_only);
    section(&mut out, "By layer", &report.by_layer, with_services);
    section(&mut out, "By service", &report.by_service, name_only);
    out.trim_end().to_owned()
}

fn name_only(record: &DeviceRecord) -> String {
    record.name.clone()
}

/// `name [SVC, SVC]`, or just the name when it runs no services.
fn with_services(record: &DeviceRecord) -> String {
    if record.services.is_empty() {
        return record.name.clone();
    }
    let services: Vec<String> = record.services.iter().map(ToString::to_string).collect();
    format!("{} [{}]", record.name, services.join(", "))
}

fn section<K: Display>(
    out: &mut String,
    title: &str,
    groups: &[Group<K>],
    example: fn(&DeviceRecord) -> String,
) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    if groups.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for g in groups {
        let names: Vec<String> = g.examples.iter().map(example).collect();
        let more = if g.overflow > 0 {
            format!(" (+{} more)", g.overflow)
        } else {
            String::new()
        };
        let key = g.key.to_string();
        let _ = writeln!(out, "  {key:<14} {:>4}  {}{more}", g.count, names.join(", "));
    }
}

fn render_text(report: &InventoryReport) -> String {
    if report.is_empty() {
        return render_groups(report);
    }
    format!(
        "{}\n\nDevices\n{}",
        render_groups(report),
        output::render_table(&devices::rows(&report.devices))
    )
}

pub fn handle(inventory: &Inventory, global: &GlobalOpts) -> Result<(), CliError> {
    let report = inventory.report()?;
    let out = output::render_single(global.output, &report, render_text, |r| {
        r.total.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
