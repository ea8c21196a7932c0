//! Line tags.

use serde::Serialize;
use std::fmt;

/// Field delimiter used throughout JOB record files.
pub const DELIMITER: char = '|';

/// Classification of a raw input line by its leading tag token.
///
/// Only the prefix is interpreted; the rest of the line is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    /// `JOB|` file header.
    Header,
    /// `META_*` descriptive line following the header.
    Metadata,
    /// `CLNT_CORR|` line opening an item.
    Correlation,
    /// `CLNT_ROLE|` (or the short `CLNT_ROL|`) line inside an item.
    Role,
    /// `PLAN|` line inside an item.
    Plan,
    /// `FOOTER|` trailer.
    Footer,
    /// Anything else.
    Unknown,
}

/// Prefix table, checked in order.
const PREFIXES: &[(&str, LineTag)] = &[
    ("JOB|", LineTag::Header),
    ("META_", LineTag::Metadata),
    ("CLNT_CORR|", LineTag::Correlation),
    ("CLNT_ROLE|", LineTag::Role),
    ("CLNT_ROL|", LineTag::Role),
    ("PLAN|", LineTag::Plan),
    ("FOOTER|", LineTag::Footer),
];

impl LineTag {
    /// Classifies a line by its prefix.
    #[must_use]
    pub fn classify(line: &str) -> Self {
        PREFIXES
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix))
            .map_or(Self::Unknown, |(_, tag)| *tag)
    }

    /// Returns the canonical prefix written for this tag.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Header => "JOB|",
            Self::Metadata => "META_",
            Self::Correlation => "CLNT_CORR|",
            Self::Role => "CLNT_ROLE|",
            Self::Plan => "PLAN|",
            Self::Footer => "FOOTER|",
            Self::Unknown => "",
        }
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Metadata => "metadata",
            Self::Correlation => "correlation",
            Self::Role => "role",
            Self::Plan => "plan",
            Self::Footer => "footer",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true for the tags allowed after an item's correlation line.
    #[must_use]
    pub const fn is_item_body(&self) -> bool {
        matches!(self, Self::Role | Self::Plan)
    }
}

impl fmt::Display for LineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A borrowed input line with its tag and 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedLine<'a> {
    /// 1-based position in the input file.
    pub number: usize,
    /// Tag computed from the line prefix.
    pub tag: LineTag,
    /// The raw line, terminator stripped.
    pub text: &'a str,
}

impl<'a> TaggedLine<'a> {
    /// Tags every line of `lines`, numbering from 1.
    #[must_use]
    pub fn tag_all(lines: &'a [String]) -> Vec<Self> {
        lines
            .iter()
            .enumerate()
            .map(|(i, text)| Self {
                number: i + 1,
                tag: LineTag::classify(text),
                text,
            })
            .collect()
    }

    /// Splits the line on the field delimiter.
    pub fn fields(&self) -> std::str::Split<'a, char> {
        self.text.split(DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_prefixes() {
        assert_eq!(LineTag::classify("JOB|J1|x"), LineTag::Header);
        assert_eq!(LineTag::classify("META_A|y"), LineTag::Metadata);
        assert_eq!(LineTag::classify("META_"), LineTag::Metadata);
        assert_eq!(LineTag::classify("CLNT_CORR|1"), LineTag::Correlation);
        assert_eq!(LineTag::classify("CLNT_ROLE|r"), LineTag::Role);
        assert_eq!(LineTag::classify("CLNT_ROL|r"), LineTag::Role);
        assert_eq!(LineTag::classify("PLAN|p"), LineTag::Plan);
        assert_eq!(LineTag::classify("FOOTER|J1|2"), LineTag::Footer);
    }

    #[test]
    fn test_classify_requires_delimiter() {
        assert_eq!(LineTag::classify("JOB"), LineTag::Unknown);
        assert_eq!(LineTag::classify("PLANX|p"), LineTag::Unknown);
        assert_eq!(LineTag::classify("CLNT_CORRX|1"), LineTag::Unknown);
        assert_eq!(LineTag::classify(" JOB|J1"), LineTag::Unknown);
        assert_eq!(LineTag::classify(""), LineTag::Unknown);
    }

    #[test]
    fn test_tag_all_numbers_from_one() {
        let lines = vec!["JOB|J1".to_string(), "PLAN|p".to_string()];
        let tagged = TaggedLine::tag_all(&lines);
        assert_eq!(tagged[0].number, 1);
        assert_eq!(tagged[1].number, 2);
        assert_eq!(tagged[1].tag, LineTag::Plan);
        assert_eq!(tagged[0].fields().collect::<Vec<_>>(), vec!["JOB", "J1"]);
    }
}
