//! Split CLI command.

use crate::Result;
use crate::config::SplitterConfig;
use crate::services::{SplitOutcome, SplitService};
use std::io::{self, Write};

/// Writes the per-file report of a split run.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_split_report<W: Write>(writer: &mut W, outcome: &SplitOutcome) -> io::Result<()> {
    let summary = &outcome.summary;
    writeln!(
        writer,
        "Total data-items found: {} (job {}, encoding {})",
        summary.item_count, summary.job_code, summary.encoding
    )?;
    for file in &outcome.report.files {
        writeln!(writer, "Written: {} ({} items)", file.path.display(), file.items)?;
    }
    if outcome.report.files.is_empty() {
        writeln!(writer, "No data-items; no files written")?;
    }
    Ok(())
}

/// Executes the split command.
///
/// # Errors
///
/// Returns any pipeline error, or an I/O error writing to stdout.
pub fn cmd_split(config: SplitterConfig) -> Result<SplitOutcome> {
    let outcome = SplitService::new(config).run()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_split_report(&mut handle, &outcome)
        .map_err(|e| crate::Error::io("write_stdout", "<stdout>", &e))?;

    Ok(outcome)
}
