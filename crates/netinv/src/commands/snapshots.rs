//! Snapshot command handlers.

use chrono::Local;
use tabled::Tabled;

use netinv_core::{Inventory, SnapshotInfo};

use crate::cli::{GlobalOpts, OutputFormat, SnapshotsArgs, SnapshotsCommand};
use crate::error::CliError;
use crate::output::{self, Status};

use super::util;

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

impl From<&SnapshotInfo> for SnapshotRow {
    fn from(s: &SnapshotInfo) -> Self {
        Self {
            file: s.file_name.clone(),
            size: format!("{} B", s.size_bytes),
            modified: s.modified.map_or_else(
                || "-".into(),
                |t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
        }
    }
}

pub fn handle(
    inventory: &Inventory,
    args: &SnapshotsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match &args.command {
        SnapshotsCommand::List => list(inventory, global),
        SnapshotsCommand::Restore { file } => restore(inventory, file, global),
    }
}

pub fn list(inventory: &Inventory, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshots = inventory.store().snapshots()?;
    if snapshots.is_empty() && global.output == OutputFormat::Table {
        Status::new(global).notice(format!(
            "No snapshots in {}",
            inventory.store().snapshot_dir().display()
        ));
        return Ok(());
    }
    let out = output::render_list(
        global.output,
        &snapshots,
        |s| SnapshotRow::from(s),
        |s| s.file_name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn restore(inventory: &Inventory, file: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let status = Status::new(global);
    let source = inventory.store().resolve_snapshot(file);
    if !source.is_file() {
        return Err(CliError::SnapshotNotFound { name: file.into() });
    }

    let prompt = format!(
        "Replace {} with {}?",
        inventory.store().data_file().display(),
        source.display()
    );
    if !util::confirm("snapshots restore", &prompt, global.yes)? {
        status.notice("Cancelled; nothing was changed");
        return Ok(());
    }

    let previous = inventory.store().restore(&source)?;
    if let Some(path) = previous {
        status.notice(format!("Previous contents saved to {}", path.display()));
    }
    status.success(format!(
        "Restored {} ({})",
        source.display(),
        util::devices(inventory.list()?.len())
    ));
    Ok(())
}
