//! Config CLI command.

use crate::config::SplitterConfig;
use crate::io::Encoding;
use crate::{Error, Result};
use std::io::{self, Write};

/// Writes the resolved configuration.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_config<W: Write>(writer: &mut W, config: &SplitterConfig) -> io::Result<()> {
    writeln!(writer, "Current Configuration")?;
    writeln!(writer, "=====================")?;
    writeln!(writer)?;

    writeln!(writer, "App Directory: {}", config.app_dir.display())?;
    writeln!(writer, "Input File: {}", config.input_path().display())?;
    writeln!(writer, "Items Per File: {}", config.items_per_file)?;
    writeln!(writer, "Output Directory: {}", config.output_dir.display())?;
    writeln!(writer, "Output Prefix: {}", config.output_prefix)?;
    writeln!(writer)?;

    writeln!(writer, "Parser:")?;
    writeln!(writer, "  Item Policy: {}", config.parser.item_policy)?;
    writeln!(
        writer,
        "  Require Metadata: {}",
        config.parser.require_metadata
    )?;
    writeln!(writer)?;

    let encodings: Vec<&str> = config.reader.encodings.iter().map(Encoding::as_str).collect();
    writeln!(writer, "Reader:")?;
    writeln!(writer, "  Encodings: {}", encodings.join(", "))?;
    writeln!(writer)?;

    writeln!(writer, "Logging:")?;
    writeln!(
        writer,
        "  Format: {}",
        config.logging.format.as_deref().unwrap_or("(default)")
    )?;
    writeln!(
        writer,
        "  Filter: {}",
        config.logging.filter.as_deref().unwrap_or("(default)")
    )?;
    match &config.logging.file {
        Some(path) => writeln!(writer, "  File: {}", path.display()),
        None => writeln!(writer, "  File: (stderr)"),
    }
}

/// Executes the config command.
///
/// # Errors
///
/// Returns an error if `show` is not set or writing to stdout fails.
pub fn cmd_config(config: &SplitterConfig, show: bool) -> Result<()> {
    if !show {
        return Err(Error::InvalidInput(
            "nothing to do; use `config --show`".to_string(),
        ));
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_config(&mut handle, config).map_err(|e| Error::io("write_stdout", "<stdout>", &e))
}
