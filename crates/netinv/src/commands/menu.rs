//! Interactive menu: the classic numbered loop over every operation.
//!
//! A failing action is reported and the menu comes back; only Quit (or
//! Esc) leaves.

use dialoguer::{Select, theme::ColorfulTheme};
use tracing::debug;

use netinv_core::Inventory;

use crate::cli::{AddArgs, DeviceFields, EditArgs, GlobalOpts};
use crate::error::CliError;

use super::util::{self, prompt_err};
use super::{devices, prompt, report, snapshots};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Find,
    List,
    Edit,
    Delete,
    Report,
    Snapshots,
    Restore,
    Clear,
    Quit,
}

impl Action {
    const ALL: [Action; 10] = [
        Action::Add,
        Action::Find,
        Action::List,
        Action::Edit,
        Action::Delete,
        Action::Report,
        Action::Snapshots,
        Action::Restore,
        Action::Clear,
        Action::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::Add => "Add a device",
            Action::Find => "Find devices",
            Action::List => "List all devices",
            Action::Edit => "Edit a device",
            Action::Delete => "Delete devices",
            Action::Report => "Inventory report",
            Action::Snapshots => "List snapshots",
            Action::Restore => "Restore a snapshot",
            Action::Clear => "Clear the inventory",
            Action::Quit => "Quit",
        }
    }
}

pub fn run(inventory: &Inventory, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::interactive() {
        return Err(CliError::InputRequired {
            action: "menu".into(),
            field: "a terminal".into(),
        });
    }

    // Inside the menu the operator answers every prompt, `--yes` included.
    let global = GlobalOpts {
        yes: false,
        ..global.clone()
    };
    let theme = ColorfulTheme::default();
    let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();

    loop {
        eprintln!();
        let choice = Select::with_theme(&theme)
            .with_prompt(format!(
                "netinv: {}",
                inventory.store().data_file().display()
            ))
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(prompt_err)?;

        let Some(action) = choice.and_then(|i| Action::ALL.get(i).copied()) else {
            return Ok(());
        };
        if action == Action::Quit {
            return Ok(());
        }

        debug!(?action, "menu action");
        if let Err(err) = dispatch(action, inventory, &global) {
            eprintln!("{:?}", miette::Report::new(err));
        }
    }
}

fn dispatch(action: Action, inventory: &Inventory, global: &GlobalOpts) -> Result<(), CliError> {
    match action {
        Action::Add => devices::add(
            inventory,
            &AddArgs {
                fields: DeviceFields::default(),
                no_input: false,
            },
            global,
        ),
        Action::Find => devices::find(inventory, &prompt::term("Search term")?, global),
        Action::List => devices::list(inventory, global),
        Action::Edit => devices::edit(
            inventory,
            &EditArgs {
                term: prompt::term("Name or IP of the device to edit")?,
                fields: DeviceFields::default(),
                clear_services: false,
            },
            global,
        ),
        Action::Delete => devices::delete(
            inventory,
            &prompt::term("Name or IP to delete")?,
            global,
        ),
        Action::Report => report::handle(inventory, global),
        Action::Snapshots => snapshots::list(inventory, global),
        Action::Restore => {
            snapshots::restore(inventory, &prompt::term("Snapshot file")?, global)
        }
        Action::Clear => devices::clear(inventory, global),
        Action::Quit => Ok(()),
    }
}
