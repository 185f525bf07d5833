//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Status lines go to stderr so stdout stays machine-readable.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Status-line printer honouring `--color` and `--quiet`.
#[derive(Debug, Clone, Copy)]
pub struct Status {
    color: bool,
    quiet: bool,
}

impl Status {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            color: should_color(global.color),
            quiet: global.quiet,
        }
    }

    /// `✓ message`, suppressed by `--quiet`.
    pub fn success(&self, message: impl Display) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{} {message}", "✓".green().bold());
        } else {
            eprintln!("✓ {message}");
        }
    }

    /// Neutral notice, suppressed by `--quiet`.
    pub fn notice(&self, message: impl Display) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{}", message.dimmed());
        } else {
            eprintln!("{message}");
        }
    }

    /// Warnings are never suppressed.
    pub fn warn(&self, message: impl Display) {
        if self.color {
            eprintln!("{} {}", "!".yellow().bold(), message.yellow());
        } else {
            eprintln!("! {message}");
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Validation {
        field: "output".into(),
        reason: format!("YAML encoding failed: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![Item { name: "sw1" }, Item { name: "sw2" }]
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(
            OutputFormat::Plain,
            &items(),
            |i| Row { name: i.name },
            |i| i.name.into(),
        )
        .unwrap();
        assert_eq!(out, "sw1\nsw2");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(
            OutputFormat::JsonCompact,
            &items(),
            |i| Row { name: i.name },
            |i| i.name.into(),
        )
        .unwrap();
        assert_eq!(out, r#"[{"name":"sw1"},{"name":"sw2"}]"#);
    }

    #[test]
    fn table_has_header_and_rows() {
        let out = render_list(
            OutputFormat::Table,
            &items(),
            |i| Row { name: i.name },
            |i| i.name.into(),
        )
        .unwrap();
        assert!(out.contains("Name"));
        assert!(out.contains("sw2"));
    }

    #[test]
    fn forced_color_modes() {
        assert!(should_color(ColorMode::Always));
        assert!(!should_color(ColorMode::Never));
    }
}
