//! Line reader.
//!
//! Loads a whole file into memory and splits it into lines, stripping only
//! line terminators. Field padding and other whitespace are kept verbatim.

use super::encoding::Encoding;
use crate::config::ReaderOptions;
use crate::{Error, Result};
use std::path::Path;

/// Lines read from a file plus how they were decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutput {
    /// Lines in file order, terminators removed.
    pub lines: Vec<String>,
    /// Encoding that decoded the file, or `None` for the lossy fallback.
    pub encoding: Option<Encoding>,
    /// Failed attempts, `"<label>: <reason>"`, in the order tried.
    pub attempts: Vec<String>,
}

impl ReadOutput {
    /// Returns true when no configured encoding could decode the file.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.encoding.is_none()
    }

    /// Label of the decoding used.
    #[must_use]
    pub fn encoding_label(&self) -> &'static str {
        self.encoding
            .map_or("cp1252-lossy", |encoding| encoding.as_str())
    }
}

/// Reads `path` into lines using the encodings in `options`, in order.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the path does not exist and
/// [`Error::Io`] if it cannot be read. Decoding never fails.
pub fn read_lines(path: &Path, options: &ReaderOptions) -> Result<ReadOutput> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::io("read_input", path, &e),
    })?;
    Ok(decode_lines(&bytes, &options.encodings))
}

/// Decodes raw bytes into lines, trying `encodings` in order.
#[must_use]
pub fn decode_lines(bytes: &[u8], encodings: &[Encoding]) -> ReadOutput {
    let mut attempts = Vec::new();

    for encoding in encodings {
        match encoding.decode(bytes) {
            Ok(text) => {
                tracing::debug!(encoding = %encoding, bytes = bytes.len(), "Decoded input");
                return ReadOutput {
                    lines: split_lines(&text),
                    encoding: Some(*encoding),
                    attempts,
                };
            },
            Err(reason) => attempts.push(format!("{encoding}: {reason}")),
        }
    }

    tracing::warn!(
        tried = %attempts.join("; "),
        "Fell back to lossy cp1252 decoding with replacement characters"
    );
    let text = Encoding::decode_lossy(bytes);
    ReadOutput {
        lines: split_lines(&text),
        encoding: None,
        attempts,
    }
}

/// Splits text on universal newlines (`\r\n`, `\n`, lone `\r`).
///
/// A trailing terminator does not yield an extra empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(end) => {
                lines.push(rest[..end].to_string());
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
            },
            None => {
                lines.push(rest.to_string());
                break;
            },
        }
    }

    lines
}
