//! Command dispatch: bridges CLI args -> inventory operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod menu;
pub mod prompt;
pub mod report;
pub mod snapshots;
pub mod util;

use clap::CommandFactory;
use clap_complete::Shell;
use tracing::debug;

use netinv_core::Inventory;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Route a parsed command to its handler.
///
/// The inventory is only resolved for commands that read or write it, so
/// `config` and `completions` work even when the active profile is broken.
pub fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let open = || -> Result<Inventory, CliError> {
        Ok(Inventory::new(config::resolve_inventory(global)?))
    };

    debug!(command = ?cmd, "dispatching command");
    match cmd {
        Command::Add(args) => devices::add(&open()?, &args, global),
        Command::Find { term } => devices::find(&open()?, &term, global),
        Command::List => devices::list(&open()?, global),
        Command::Edit(args) => devices::edit(&open()?, &args, global),
        Command::Delete { term } => devices::delete(&open()?, &term, global),
        Command::Clear => devices::clear(&open()?, global),
        Command::Report => report::handle(&open()?, global),
        Command::Snapshots(args) => snapshots::handle(&open()?, &args, global),
        Command::Menu => menu::run(&open()?, global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            completions(args.shell);
            Ok(())
        }
    }
}

/// Write a completion script for `shell` to stdout.
pub fn completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "netinv", &mut std::io::stdout());
}
