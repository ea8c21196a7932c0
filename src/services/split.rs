//! Split service.
//!
//! Runs the Reader → Parser → Writer pipeline for one configured input file.

use crate::config::SplitterConfig;
use crate::io::{self, BatchWriter, ChunkPlan, WriteReport};
use crate::models::Document;
use crate::parser::StructuralParser;
use crate::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::instrument;

/// What was found in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    /// Input file path.
    pub input_path: PathBuf,
    /// Encoding label used to decode the input.
    pub encoding: String,
    /// Whether the lossy fallback decoder was used.
    pub encoding_fallback: bool,
    /// Job code from the header.
    pub job_code: String,
    /// Number of metadata lines.
    pub metadata_lines: usize,
    /// Items actually parsed.
    pub item_count: usize,
    /// Item count declared in the input footer.
    pub declared_count: i64,
}

/// Result of a `split` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitOutcome {
    /// Input summary.
    pub summary: DocumentSummary,
    /// Files written.
    pub report: WriteReport,
}

/// Result of a `check` run: the input summary and the chunk layout a
/// `split` would produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Input summary.
    pub summary: DocumentSummary,
    /// Items per output file used for the plan.
    pub items_per_file: i64,
    /// Planned chunks.
    pub chunks: Vec<ChunkPlan>,
}

/// Orchestrates reading, parsing and writing.
#[derive(Debug, Clone)]
pub struct SplitService {
    config: SplitterConfig,
}

impl SplitService {
    /// Creates a service for the given configuration.
    #[must_use]
    pub const fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Reads and parses the configured input file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileNotFound`] if the input is missing, or the
    /// first structural error in the file.
    #[instrument(skip(self), fields(input = %self.config.input_path().display()))]
    pub fn load(&self) -> Result<(Document, DocumentSummary)> {
        let input_path = self.config.input_path();
        let read = io::read_lines(&input_path, &self.config.reader)?;
        let document = StructuralParser::new(self.config.parser).parse(&read.lines)?;

        let summary = DocumentSummary {
            input_path,
            encoding: read.encoding_label().to_string(),
            encoding_fallback: read.used_fallback(),
            job_code: document.job_code.clone(),
            metadata_lines: document.metadata_lines.len(),
            item_count: document.item_count(),
            declared_count: document.declared_count,
        };

        tracing::info!(
            job_code = %summary.job_code,
            items = summary.item_count,
            encoding = %summary.encoding,
            "Total data-items found"
        );

        Ok((document, summary))
    }

    /// Parses the input and reports the planned chunk layout without
    /// writing anything.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::load`], or
    /// [`crate::Error::InvalidBatchSize`].
    pub fn check(&self) -> Result<CheckOutcome> {
        let (document, summary) = self.load()?;
        let chunks = io::plan_batches(document.item_count(), self.config.items_per_file)?;
        Ok(CheckOutcome {
            summary,
            items_per_file: self.config.items_per_file,
            chunks,
        })
    }

    /// Runs the full pipeline and writes the output files.
    ///
    /// The batch size is validated before the input is read. Nothing is
    /// written unless the whole input parses.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidBatchSize`], any error from
    /// [`Self::load`], or an I/O error from the writer.
    pub fn run(&self) -> Result<SplitOutcome> {
        io::validate_batch_size(self.config.items_per_file)?;

        let (document, summary) = self.load()?;
        let writer = BatchWriter::new(&self.config.output_dir, &self.config.output_prefix);
        let report = writer.write(&document, self.config.items_per_file)?;

        tracing::info!(
            files = report.files.len(),
            output_dir = %self.config.output_dir.display(),
            "Split complete"
        );

        Ok(SplitOutcome { summary, report })
    }
}
