//! Parser and reader options.

use crate::io::Encoding;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How the lines inside an item are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemPolicy {
    /// At least one role and one plan line, in any order and number.
    #[default]
    AnyOrder,
    /// Exactly one role line followed by exactly one plan line.
    Strict,
}

impl ItemPolicy {
    /// Returns the policy as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnyOrder => "any-order",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for ItemPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "any-order" | "any_order" | "anyorder" | "permissive" => Ok(Self::AnyOrder),
            "strict" | "fixed" => Ok(Self::Strict),
            other => Err(Error::InvalidInput(format!(
                "unknown item policy '{other}' (expected 'any-order' or 'strict')"
            ))),
        }
    }
}

impl fmt::Display for ItemPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural strictness knobs for [`crate::parser::StructuralParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParserOptions {
    /// Item-internal validation policy.
    pub item_policy: ItemPolicy,
    /// Whether at least one `META_*` line is required after the header.
    pub require_metadata: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            item_policy: ItemPolicy::AnyOrder,
            require_metadata: true,
        }
    }
}

impl ParserOptions {
    /// Options matching the fixed-order variant of the format.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            item_policy: ItemPolicy::Strict,
            require_metadata: true,
        }
    }

    /// Sets the item policy.
    #[must_use]
    pub const fn with_item_policy(mut self, policy: ItemPolicy) -> Self {
        self.item_policy = policy;
        self
    }

    /// Sets whether metadata lines are required.
    #[must_use]
    pub const fn with_require_metadata(mut self, required: bool) -> Self {
        self.require_metadata = required;
        self
    }
}

/// Options for [`crate::io::read_lines`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReaderOptions {
    /// Encodings tried in order before the lossy fallback.
    pub encodings: Vec<Encoding>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            encodings: Encoding::default_order().to_vec(),
        }
    }
}

impl ReaderOptions {
    /// Parses a list of encoding labels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown label or an empty list.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::InvalidInput(
                "reader encodings list must not be empty".to_string(),
            ));
        }
        let encodings = labels
            .iter()
            .map(|l| l.as_ref().parse())
            .collect::<Result<Vec<Encoding>>>()?;
        Ok(Self { encodings })
    }
}
