use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::cli_args::FormatOutputOpts;

/// Prints `data` as JSON, or `plain_text` when the text format is selected.
/// Falls back to pretty JSON when no text rendering exists.
pub fn print_data_or_text<T: Serialize>(
    data: &T,
    plain_text: Option<String>,
    format_opts: &FormatOutputOpts,
    default_format: &str,
) -> Result<()> {
    let format = format_opts
        .format
        .as_deref()
        .unwrap_or(default_format)
        .to_lowercase();

    if format == "text" {
        match plain_text {
            Some(text) => write_to_stdout(&text),
            None => write_to_stdout(&serialize_json(data, true)?),
        }
    } else {
        write_to_stdout(&serialize_json(data, format_opts.pretty)?)
    }
}

pub fn serialize_json<T: Serialize>(data: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(data)
    } else {
        serde_json::to_string(data)
    };
    text.context("Failed to serialize output as JSON")
}

/// Warnings go to stderr so stdout stays machine-readable.
pub fn print_warnings(warnings: &[String], quiet: bool) {
    if quiet {
        return;
    }
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning.yellow());
    }
}

pub fn print_notice(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{} {}", "info:".blue().bold(), message);
    }
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Asks before replacing an existing file. Quiet mode never overwrites.
pub fn confirm_overwrite(path: &Path, what: &str, quiet: bool) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    if quiet {
        anyhow::bail!(
            "Target file '{}' exists. Overwrite prevented in quiet mode.",
            path.display()
        );
    }
    print!(
        "{} {} already exists at '{}'. Overwrite? [{}/{}] ",
        "⚠️".yellow(),
        what,
        path.display().to_string().cyan(),
        "y".green(),
        "N".red()
    );
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read user input")?;
    if response.trim().eq_ignore_ascii_case("y") {
        Ok(true)
    } else {
        println!("Save cancelled.");
        Ok(false)
    }
}
