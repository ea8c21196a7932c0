//! Batch writer.
//!
//! Partitions a document's items into contiguous fixed-size chunks and writes
//! each chunk as a standalone document with a recomputed footer.
//!
//! Each file is written to a temporary file in the output directory and then
//! atomically persisted over `<prefix><k>.csv`, so a failed write never
//! leaves a truncated chunk behind.

use crate::models::Document;
use crate::{Error, Result};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension of every output file.
pub const OUTPUT_EXTENSION: &str = ".csv";

/// One planned output chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkPlan {
    /// 1-based chunk number, used in the file name.
    pub index: usize,
    /// First item (0-based, inclusive).
    pub start: usize,
    /// One past the last item.
    pub end: usize,
}

impl ChunkPlan {
    /// Number of items in the chunk.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a chunk with no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// A file produced by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    /// Destination path.
    pub path: PathBuf,
    /// Items written to this file.
    pub items: usize,
}

/// Summary of a write run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    /// Files in chunk order.
    pub files: Vec<WrittenFile>,
}

impl WriteReport {
    /// Total items across all files.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files.iter().map(|f| f.items).sum()
    }
}

/// Validates a batch size from configuration.
///
/// # Errors
///
/// Returns [`Error::InvalidBatchSize`] if `batch_size` is zero or negative.
pub fn validate_batch_size(batch_size: i64) -> Result<usize> {
    if batch_size <= 0 {
        return Err(Error::InvalidBatchSize(batch_size));
    }
    usize::try_from(batch_size).map_err(|_| Error::InvalidBatchSize(batch_size))
}

/// Computes the chunk layout for `total` items in batches of `batch_size`.
///
/// Produces `ceil(total / batch_size)` chunks; all but the last hold exactly
/// `batch_size` items.
///
/// # Errors
///
/// Returns [`Error::InvalidBatchSize`] if `batch_size` is zero or negative.
pub fn plan_batches(total: usize, batch_size: i64) -> Result<Vec<ChunkPlan>> {
    let size = validate_batch_size(batch_size)?;
    Ok((0..total)
        .step_by(size)
        .enumerate()
        .map(|(i, start)| ChunkPlan {
            index: i + 1,
            start,
            end: total.min(start + size),
        })
        .collect())
}

/// Writes document chunks to `<output_dir>/<prefix><k>.csv`.
#[derive(Debug, Clone)]
pub struct BatchWriter {
    output_dir: PathBuf,
    prefix: String,
}

impl BatchWriter {
    /// Creates a writer for `output_dir` using file name `prefix`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Path of the `index`-th (1-based) output file.
    #[must_use]
    pub fn file_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}{index}{OUTPUT_EXTENSION}", self.prefix))
    }

    /// Writes every chunk of `document`, creating the output directory if
    /// needed and overwriting existing files of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBatchSize`] before touching the filesystem if
    /// `batch_size` is not positive, or [`Error::Io`] if any file cannot be
    /// written.
    pub fn write(&self, document: &Document, batch_size: i64) -> Result<WriteReport> {
        let plan = plan_batches(document.item_count(), batch_size)?;

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| Error::io("create_output_dir", &self.output_dir, &e))?;

        if plan.is_empty() {
            tracing::warn!(
                job_code = %document.job_code,
                "Document has no items; no output files written"
            );
        }

        let mut report = WriteReport::default();
        for chunk in plan {
            let path = self.file_path(chunk.index);
            write_atomically(&path, &self.output_dir, |out| {
                document.write_to(&document.items[chunk.start..chunk.end], out)
            })?;

            tracing::info!(path = %path.display(), items = chunk.len(), "Written");
            report.files.push(WrittenFile {
                path,
                items: chunk.len(),
            });
        }

        Ok(report)
    }
}

/// Writes through a temp file in `dir` and persists it to `path`.
fn write_atomically<F>(path: &Path, dir: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> std::io::Result<()>,
{
    let temp = NamedTempFile::new_in(dir).map_err(|e| Error::io("create_temp_file", dir, &e))?;
    let mut out = BufWriter::new(temp);

    write(&mut out).map_err(|e| Error::io("write_output", path, &e))?;
    out.flush().map_err(|e| Error::io("flush_output", path, &e))?;

    let temp = out
        .into_inner()
        .map_err(|e| Error::io("flush_output", path, e.error()))?;
    temp.persist(path)
        .map_err(|e| Error::io("persist_output", path, &e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(5, 2 => vec![(1, 0, 2), (2, 2, 4), (3, 4, 5)]; "uneven tail")]
    #[test_case(4, 2 => vec![(1, 0, 2), (2, 2, 4)]; "exact multiple")]
    #[test_case(3, 10 => vec![(1, 0, 3)]; "batch larger than total")]
    #[test_case(0, 3 => Vec::<(usize, usize, usize)>::new(); "no items")]
    fn test_plan_batches(total: usize, batch: i64) -> Vec<(usize, usize, usize)> {
        plan_batches(total, batch)
            .unwrap()
            .into_iter()
            .map(|c| (c.index, c.start, c.end))
            .collect()
    }

    #[test_case(0; "zero")]
    #[test_case(-3; "negative")]
    fn test_plan_batches_rejects_non_positive(batch: i64) {
        assert!(matches!(
            plan_batches(10, batch),
            Err(Error::InvalidBatchSize(n)) if n == batch
        ));
    }

    #[test]
    fn test_file_path() {
        let writer = BatchWriter::new("/out", "output_file");
        assert_eq!(writer.file_path(3), PathBuf::from("/out/output_file3.csv"));
    }

    #[test]
    fn test_chunk_plan_len() {
        let chunk = ChunkPlan { index: 1, start: 4, end: 6 };
        assert_eq!(chunk.len(), 2);
        assert!(!chunk.is_empty());
    }
}
