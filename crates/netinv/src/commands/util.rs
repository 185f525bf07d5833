//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use crate::error::CliError;

/// True when prompts can be shown.
pub fn interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: dialoguer::Error) -> CliError {
    CliError::Io(io::Error::other(e))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal the prompt cannot be answered, so `--yes` is required.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !interactive() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Singular or plural "device" with its count.
pub fn devices(n: usize) -> String {
    if n == 1 {
        "1 device".into()
    } else {
        format!("{n} devices")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_counts_read_naturally() {
        assert_eq!(devices(0), "0 devices");
        assert_eq!(devices(1), "1 device");
        assert_eq!(devices(12), "12 devices");
    }

    #[test]
    fn yes_flag_skips_the_prompt() {
        assert!(confirm("clear", "Really?", true).unwrap_or(false));
    }
}
