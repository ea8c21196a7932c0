//! Check CLI command.

use crate::config::SplitterConfig;
use crate::services::{CheckOutcome, SplitService};
use crate::{Error, Result};
use std::io::{self, Write};
use std::str::FromStr;

/// Output format for the check command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidInput(format!(
                "unknown output format '{other}' (expected text or json)"
            ))),
        }
    }
}

/// Writes a check result as text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_check_text<W: Write>(writer: &mut W, outcome: &CheckOutcome) -> io::Result<()> {
    let summary = &outcome.summary;
    writeln!(writer, "Input:          {}", summary.input_path.display())?;
    writeln!(
        writer,
        "Encoding:       {}{}",
        summary.encoding,
        if summary.encoding_fallback {
            " (replacement characters substituted)"
        } else {
            ""
        }
    )?;
    writeln!(writer, "Job code:       {}", summary.job_code)?;
    writeln!(writer, "Metadata lines: {}", summary.metadata_lines)?;
    writeln!(writer, "Data-items:     {}", summary.item_count)?;

    let declared = summary.declared_count;
    let matches = usize::try_from(declared).is_ok_and(|n| n == summary.item_count);
    writeln!(
        writer,
        "Footer count:   {declared}{}",
        if matches { "" } else { " (mismatch)" }
    )?;

    writeln!(
        writer,
        "Planned files:  {} ({} items per file)",
        outcome.chunks.len(),
        outcome.items_per_file
    )?;
    for chunk in &outcome.chunks {
        writeln!(
            writer,
            "  #{:<4} items {}..{} ({})",
            chunk.index,
            chunk.start + 1,
            chunk.end,
            chunk.len()
        )?;
    }
    Ok(())
}

/// Writes a check result as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_check_json<W: Write>(writer: &mut W, outcome: &CheckOutcome) -> io::Result<()> {
    let json = serde_json::to_string_pretty(outcome).map_err(io::Error::other)?;
    writeln!(writer, "{json}")
}

/// Executes the check command.
///
/// # Errors
///
/// Returns any read, parse or batch-size error, or an I/O error writing to
/// stdout.
pub fn cmd_check(config: SplitterConfig, format: OutputFormat) -> Result<CheckOutcome> {
    let outcome = SplitService::new(config).check()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let written = match format {
        OutputFormat::Text => write_check_text(&mut handle, &outcome),
        OutputFormat::Json => write_check_json(&mut handle, &outcome),
    };
    written.map_err(|e| Error::io("write_stdout", "<stdout>", &e))?;

    Ok(outcome)
}
