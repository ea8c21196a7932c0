//! # Jobsplit
//!
//! Splits structured, pipe-delimited JOB record files into smaller files of
//! the same structure, each with a recomputed footer.
//!
//! An input file looks like this:
//!
//! ```text
//! JOB|<job_code>|...
//! META_*|...
//! CLNT_CORR|...            one per item
//! CLNT_ROLE|... / PLAN|... at least one of each, any order
//! FOOTER|<job_code>|<item_count>
//! ```
//!
//! The pipeline is strictly sequential:
//!
//! 1. [`io::read_lines`] loads the file, trying several text encodings.
//! 2. [`parser::StructuralParser`] regroups the flat lines into a [`Document`].
//! 3. [`io::BatchWriter`] writes the items out in fixed-size chunks.
//!
//! ## Example
//!
//! ```rust,ignore
//! use jobsplit::{SplitService, SplitterConfig};
//!
//! let config = SplitterConfig::load_default()?.with_items_per_file(500);
//! let outcome = SplitService::new(config).run()?;
//! println!("wrote {} files", outcome.report.files.len());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod parser;
pub mod services;

// Re-exports for convenience
pub use config::{ItemPolicy, ParserOptions, ReaderOptions, SplitterConfig};
pub use io::{BatchWriter, Encoding, ReadOutput, WriteReport, read_lines};
pub use models::{Document, Item, LineTag};
pub use parser::StructuralParser;
pub use services::{CheckOutcome, DocumentSummary, SplitOutcome, SplitService};

/// Error type for jobsplit operations.
///
/// Every structural variant carries enough context (1-based line number
/// and/or the offending content) to locate the malformed input line.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `FileNotFound` | Input path does not exist |
/// | `MalformedHeader` | First line missing, not `JOB|`, or lacks a job code |
/// | `MissingMetadata` | No `META_*` line follows the header (when required) |
/// | `ExpectedCorrelation` | An item does not open with `CLNT_CORR|` |
/// | `IncompleteItem` | An item lacks a role or a plan line |
/// | `UnexpectedLine` | A line inside an item is not a role/plan line |
/// | `MissingFooter` | Input ends before a `FOOTER|` line |
/// | `MalformedFooter` | Footer field count or count value is invalid |
/// | `FooterJobMismatch` | Footer job code differs from the header's |
/// | `InvalidBatchSize` | Items per file is zero or negative |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The input file does not exist.
    #[error("input file not found: {}", path.display())]
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The first line is not a usable `JOB|` header.
    #[error("malformed header at line 1: {reason}")]
    MalformedHeader {
        /// What was wrong with the header.
        reason: String,
    },

    /// No metadata line follows the header.
    #[error("expected one or more META_* lines after JOB at line {line}, found: {content}")]
    MissingMetadata {
        /// 1-based line number where metadata was expected.
        line: usize,
        /// Content found there (empty at end of input).
        content: String,
    },

    /// An item did not start with a correlation line.
    #[error("expected 'CLNT_CORR|' at line {line}, found: {content}")]
    ExpectedCorrelation {
        /// 1-based line number.
        line: usize,
        /// Offending content.
        content: String,
    },

    /// An item is missing its role or plan lines.
    #[error(
        "incomplete data-item starting at line {line} with '{correlation}' (roles={roles}, plans={plans})"
    )]
    IncompleteItem {
        /// 1-based line number of the item's correlation line.
        line: usize,
        /// The correlation line content.
        correlation: String,
        /// Role lines observed.
        roles: usize,
        /// Plan lines observed.
        plans: usize,
    },

    /// A line that does not belong where it was found.
    #[error("unexpected line at {line}: {content} ({expected})")]
    UnexpectedLine {
        /// 1-based line number.
        line: usize,
        /// Offending content.
        content: String,
        /// What the parser would have accepted instead.
        expected: String,
    },

    /// Input ended without a footer.
    #[error("missing FOOTER line (input ended after line {last_line})")]
    MissingFooter {
        /// 1-based number of the last line read.
        last_line: usize,
    },

    /// The footer is not `FOOTER|<job_code>|<count>`.
    #[error("malformed footer at line {line}: {content} ({reason})")]
    MalformedFooter {
        /// 1-based line number.
        line: usize,
        /// Footer content.
        content: String,
        /// What was wrong.
        reason: String,
    },

    /// Footer job code differs from the header's.
    #[error("FOOTER job_code '{footer}' at line {line} does not match JOB '{header}'")]
    FooterJobMismatch {
        /// 1-based line number of the footer.
        line: usize,
        /// Job code declared in the footer.
        footer: String,
        /// Job code declared in the header.
        header: String,
    },

    /// Items per file must be a positive integer.
    #[error("items per file must be a positive integer, got {0}")]
    InvalidBatchSize(i64),

    /// A filesystem operation failed.
    #[error("operation '{operation}' failed for {}: {cause}", path.display())]
    Io {
        /// The operation that failed.
        operation: String,
        /// Path involved.
        path: PathBuf,
        /// The underlying cause.
        cause: String,
    },

    /// Configuration could not be loaded.
    #[error("invalid configuration in {}: {cause}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided on the command line or in configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns true for structural failures raised while parsing input lines.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader { .. }
                | Self::MissingMetadata { .. }
                | Self::ExpectedCorrelation { .. }
                | Self::IncompleteItem { .. }
                | Self::UnexpectedLine { .. }
                | Self::MissingFooter { .. }
                | Self::MalformedFooter { .. }
                | Self::FooterJobMismatch { .. }
        )
    }

    /// Builds an [`Error::Io`] from a `std::io::Error`.
    pub(crate) fn io(operation: &str, path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            operation: operation.to_string(),
            path: path.into(),
            cause: err.to_string(),
        }
    }
}

/// Result type alias for jobsplit operations.
pub type Result<T> = std::result::Result<T, Error>;
