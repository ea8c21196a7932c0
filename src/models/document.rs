//! Parsed document and item types.

use super::tag::{DELIMITER, LineTag};
use serde::Serialize;
use std::io::{self, Write};

/// Line terminator written to every output file.
pub const LINE_TERMINATOR: &str = "\n";

/// One logical data record: a correlation line followed by its role and
/// plan lines, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    lines: Vec<String>,
    roles: usize,
    plans: usize,
}

impl Item {
    /// Creates an item from its raw lines and the role/plan counts tallied
    /// while they were tagged.
    ///
    /// The parser is the only producer; it guarantees `lines[0]` is a
    /// correlation line and the rest are role or plan lines.
    #[must_use]
    pub(crate) const fn from_lines(lines: Vec<String>, roles: usize, plans: usize) -> Self {
        Self {
            lines,
            roles,
            plans,
        }
    }

    /// Returns the correlation line that opens this item.
    #[must_use]
    pub fn correlation(&self) -> &str {
        self.lines.first().map_or("", String::as_str)
    }

    /// Returns every line of the item, correlation line first.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of role lines.
    #[must_use]
    pub const fn role_count(&self) -> usize {
        self.roles
    }

    /// Number of plan lines.
    #[must_use]
    pub const fn plan_count(&self) -> usize {
        self.plans
    }
}

/// A validated JOB record file held in memory.
///
/// Constructed once by [`crate::parser::StructuralParser`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// The raw `JOB|` line.
    pub header_line: String,
    /// Job code from the second header field.
    pub job_code: String,
    /// `META_*` lines in source order.
    pub metadata_lines: Vec<String>,
    /// Items in source order.
    pub items: Vec<Item>,
    /// Item count declared by the input footer. May differ from `items.len()`.
    pub declared_count: i64,
}

impl Document {
    /// Number of items actually parsed.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the footer's declared count matches the parsed items.
    #[must_use]
    pub fn declared_count_matches(&self) -> bool {
        i64::try_from(self.items.len()).is_ok_and(|n| n == self.declared_count)
    }

    /// Builds a footer line for `count` items under this document's job code.
    #[must_use]
    pub fn footer_for(&self, count: usize) -> String {
        format!(
            "{}{}{DELIMITER}{count}",
            LineTag::Footer.prefix(),
            self.job_code
        )
    }

    /// Every line of a standalone document holding only `items`, footer
    /// excluded.
    fn body_lines<'a>(&'a self, items: &'a [Item]) -> impl Iterator<Item = &'a str> {
        std::iter::once(self.header_line.as_str())
            .chain(self.metadata_lines.iter().map(String::as_str))
            .chain(items.iter().flat_map(|item| item.lines.iter().map(String::as_str)))
    }

    /// Writes a standalone document containing only `items` to `out`.
    ///
    /// The header and metadata are copied verbatim and the footer count is
    /// `items.len()`, never the originally declared count.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn write_to<W: Write>(&self, items: &[Item], out: &mut W) -> io::Result<()> {
        let footer = self.footer_for(items.len());
        for line in self.body_lines(items).chain(std::iter::once(footer.as_str())) {
            out.write_all(line.as_bytes())?;
            out.write_all(LINE_TERMINATOR.as_bytes())?;
        }
        Ok(())
    }

    /// Renders a standalone document containing only `items`.
    #[must_use]
    pub fn render(&self, items: &[Item]) -> String {
        let footer = self.footer_for(items.len());
        let mut text = String::new();
        for line in self.body_lines(items).chain(std::iter::once(footer.as_str())) {
            text.push_str(line);
            text.push_str(LINE_TERMINATOR);
        }
        text
    }

    /// Renders the whole document with a recomputed footer.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.render(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: u32) -> Item {
        Item::from_lines(
            vec![
                format!("CLNT_CORR|{n}"),
                format!("PLAN|p{n}"),
                format!("CLNT_ROLE|r{n}"),
                format!("PLAN|q{n}"),
            ],
            1,
            2,
        )
    }

    fn doc(items: Vec<Item>, declared: i64) -> Document {
        Document {
            header_line: "JOB|J1|x".to_string(),
            job_code: "J1".to_string(),
            metadata_lines: vec!["META_A|y".to_string()],
            items,
            declared_count: declared,
        }
    }

    #[test]
    fn test_item_counts() {
        let it = item(1);
        assert_eq!(it.correlation(), "CLNT_CORR|1");
        assert_eq!(it.role_count(), 1);
        assert_eq!(it.plan_count(), 2);
    }

    #[test]
    fn test_render_recomputes_footer() {
        let d = doc(vec![item(1), item(2)], 99);
        let text = d.render(&d.items[..1]);
        assert_eq!(
            text,
            "JOB|J1|x\nMETA_A|y\nCLNT_CORR|1\nPLAN|p1\nCLNT_ROLE|r1\nPLAN|q1\nFOOTER|J1|1\n"
        );
        assert!(!d.declared_count_matches());
    }

    #[test]
    fn test_write_to_matches_render() {
        let d = doc(vec![item(1), item(2), item(3)], 3);
        let mut buf = Vec::new();
        d.write_to(&d.items[1..], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), d.render(&d.items[1..]));
    }

    #[test]
    fn test_render_empty_slice() {
        let d = doc(vec![], 0);
        assert_eq!(d.to_text(), "JOB|J1|x\nMETA_A|y\nFOOTER|J1|0\n");
        assert!(d.declared_count_matches());
    }
}
