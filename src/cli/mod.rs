//! CLI command implementations.
//!
//! Each submodule implements one command. Results are written to stdout;
//! logs go to stderr through `tracing`.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `split` | Read, parse and write the input in chunks |
//! | `check` | Read and parse only, report the planned chunk layout |
//! | `config` | Show the resolved configuration |
//!
//! # Example Usage
//!
//! ```bash
//! # Split with the configured defaults
//! jobsplit split
//!
//! # One item per file, explicit input
//! jobsplit split --input data/NTF_SAMPLE.csv --batch-size 1
//!
//! # Validate without writing
//! jobsplit check --format json
//! ```

mod check;
mod config;
mod split;

pub use check::{OutputFormat, cmd_check, write_check_json, write_check_text};
pub use config::{cmd_config, write_config};
pub use split::{cmd_split, write_split_report};

use crate::config::{ItemPolicy, SplitterConfig};
use clap::Args;
use std::path::PathBuf;

/// Input, output and parser flags shared by `split` and `check`.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Input file path (overrides `--input-dir` and `--input-filename`).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory holding the input file.
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Input file name inside the input directory.
    #[arg(long)]
    pub input_filename: Option<String>,

    /// Items per output file.
    #[arg(short, long, allow_negative_numbers = true)]
    pub batch_size: Option<i64>,

    /// Output file name prefix.
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Output directory.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Require exactly one role line then one plan line per item.
    #[arg(long)]
    pub strict_items: bool,

    /// Accept files with no `META_*` lines.
    #[arg(long)]
    pub allow_missing_metadata: bool,
}

impl InputArgs {
    /// Applies the flags on top of a loaded configuration.
    #[must_use]
    pub fn apply(&self, mut config: SplitterConfig) -> SplitterConfig {
        if let Some(dir) = &self.input_dir {
            config = config.with_input_dir(dir);
        }
        if let Some(name) = &self.input_filename {
            config = config.with_input_filename(name);
        }
        if let Some(path) = &self.input {
            config = config.with_input_path(path);
        }
        if let Some(n) = self.batch_size {
            config = config.with_items_per_file(n);
        }
        if let Some(prefix) = &self.prefix {
            config = config.with_output_prefix(prefix);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }

        let mut parser = config.parser;
        if self.strict_items {
            parser = parser.with_item_policy(ItemPolicy::Strict);
        }
        if self.allow_missing_metadata {
            parser = parser.with_require_metadata(false);
        }
        config.with_parser(parser)
    }
}
