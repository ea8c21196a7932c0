//! Text encodings accepted by the line reader.

use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// UTF-8 byte-order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Bytes with no cp1252 mapping.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// A text encoding the reader can try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Strict UTF-8. A leading BOM fails the attempt.
    Utf8,
    /// UTF-8 with an optional leading BOM removed.
    Utf8Sig,
    /// Windows code page 1252, strict about its undefined bytes.
    Cp1252,
    /// ISO-8859-1; decodes any byte sequence.
    Latin1,
}

impl Encoding {
    /// Default attempt order.
    #[must_use]
    pub const fn default_order() -> &'static [Self] {
        &[Self::Utf8, Self::Utf8Sig, Self::Cp1252, Self::Latin1]
    }

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Sig => "utf-8-sig",
            Self::Cp1252 => "cp1252",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decodes `bytes` in full.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when any byte cannot be decoded.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> std::result::Result<Cow<'a, str>, String> {
        match self {
            Self::Utf8 => {
                if bytes.starts_with(UTF8_BOM) {
                    return Err("byte-order mark present at position 0".to_string());
                }
                decode_utf8(bytes)
            },
            Self::Utf8Sig => decode_utf8(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)),
            Self::Cp1252 => {
                if let Some(pos) = bytes.iter().position(|b| CP1252_UNDEFINED.contains(b)) {
                    return Err(format!(
                        "can't decode byte 0x{:02x} in position {pos}: character maps to <undefined>",
                        bytes[pos]
                    ));
                }
                let (text, _had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                Ok(text)
            },
            Self::Latin1 => Ok(encoding_rs::mem::decode_latin1(bytes)),
        }
    }

    /// Decodes byte for byte as cp1252, replacing undefined bytes with U+FFFD.
    #[must_use]
    pub fn decode_lossy(bytes: &[u8]) -> String {
        let (text, _had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
        // encoding_rs maps the undefined bytes to the matching C1 controls.
        text.chars()
            .map(|c| match c {
                '\u{81}' | '\u{8D}' | '\u{8F}' | '\u{90}' | '\u{9D}' => char::REPLACEMENT_CHARACTER,
                other => other,
            })
            .collect()
    }
}

fn decode_utf8(bytes: &[u8]) -> std::result::Result<Cow<'_, str>, String> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|e| format!("invalid utf-8 at byte {}: {e}", e.valid_up_to()))
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-8-sig" | "utf8-sig" | "utf-8-bom" => Ok(Self::Utf8Sig),
            "cp1252" | "windows-1252" => Ok(Self::Cp1252),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            other => Err(Error::InvalidInput(format!("unknown encoding: {other}"))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
