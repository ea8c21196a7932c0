//! File I/O for jobsplit.
//!
//! - [`read_lines`] loads an input file into lines, tolerating several text
//!   encodings with a lossy fallback.
//! - [`BatchWriter`] writes a parsed document out in fixed-size chunks.

pub mod encoding;
pub mod reader;
pub mod writer;

// Re-exports for convenience
pub use encoding::Encoding;
pub use reader::{ReadOutput, decode_lines, read_lines, split_lines};
pub use writer::{
    BatchWriter, ChunkPlan, OUTPUT_EXTENSION, WriteReport, WrittenFile, plan_batches,
    validate_batch_size,
};
