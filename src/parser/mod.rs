//! Structural parser.
//!
//! Rebuilds the implicit item boundaries of a JOB record file from its flat
//! line sequence:
//!
//! ```text
//! JOB|<job_code>|...             exactly one, first line
//! META_*|...                     one or more (optional when configured)
//! CLNT_CORR|...                  opens an item
//! CLNT_ROLE|... / PLAN|...       item body, validated by ItemPolicy
//! FOOTER|<job_code>|<count>      exactly one, last non-blank line
//! ```
//!
//! Any structural error aborts the parse; there is no resynchronization.

use crate::config::{ItemPolicy, ParserOptions};
use crate::models::{Document, Item, LineTag, TaggedLine};
use crate::{Error, Result};
use std::iter::Peekable;
use std::slice::Iter;

type Lines<'s, 'a> = Peekable<Iter<'s, TaggedLine<'a>>>;

const ITEM_BODY_EXPECTED: &str =
    "expected CLNT_ROLE/CLNT_ROL or PLAN, or start of next CLNT_CORR/FOOTER";

/// Parses raw lines into a [`Document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralParser {
    options: ParserOptions,
}

impl StructuralParser {
    /// Creates a parser with the given options.
    #[must_use]
    pub const fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Returns the parser options.
    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Validates `lines` and decomposes them into a [`Document`].
    ///
    /// A footer count that disagrees with the parsed items is logged as a
    /// warning; the document keeps the declared value for reporting.
    ///
    /// # Errors
    ///
    /// Returns the first structural error found, citing the 1-based line
    /// number and content where one exists.
    pub fn parse(&self, lines: &[String]) -> Result<Document> {
        let tagged = TaggedLine::tag_all(lines);
        let mut cursor = tagged.iter().peekable();

        let (header_line, job_code) = parse_header(cursor.next())?;
        let metadata_lines = self.parse_metadata(&mut cursor)?;
        let items = self.parse_items(&mut cursor)?;

        let footer = cursor.next().ok_or(Error::MissingFooter {
            last_line: lines.len(),
        })?;
        let declared_count = parse_footer(footer, &job_code)?;
        reject_trailing(cursor)?;

        let document = Document {
            header_line,
            job_code,
            metadata_lines,
            items,
            declared_count,
        };

        if !document.declared_count_matches() {
            tracing::warn!(
                declared = document.declared_count,
                actual = document.item_count(),
                "FOOTER count differs from actual items; using actual counts for outputs"
            );
        }

        Ok(document)
    }

    fn parse_metadata(&self, lines: &mut Lines<'_, '_>) -> Result<Vec<String>> {
        let mut metadata = Vec::new();
        while let Some(line) = lines.next_if(|l| l.tag == LineTag::Metadata) {
            metadata.push(line.text.to_string());
        }

        if metadata.is_empty() && self.options.require_metadata {
            let (line, content) = lines
                .peek()
                .map_or((2, String::new()), |l| (l.number, l.text.to_string()));
            return Err(Error::MissingMetadata { line, content });
        }

        Ok(metadata)
    }

    fn parse_items(&self, lines: &mut Lines<'_, '_>) -> Result<Vec<Item>> {
        let mut items = Vec::new();

        while let Some(corr) = lines.next_if(|l| l.tag != LineTag::Footer) {
            if corr.tag != LineTag::Correlation {
                return Err(Error::ExpectedCorrelation {
                    line: corr.number,
                    content: corr.text.to_string(),
                });
            }

            let mut body = Vec::new();
            while let Some(line) =
                lines.next_if(|l| !matches!(l.tag, LineTag::Correlation | LineTag::Footer))
            {
                if !line.tag.is_item_body() {
                    return Err(unexpected(line, ITEM_BODY_EXPECTED));
                }
                body.push(line);
            }

            let roles = body.iter().filter(|l| l.tag == LineTag::Role).count();
            let plans = body.len() - roles;

            match self.options.item_policy {
                ItemPolicy::AnyOrder => check_any_order(corr, roles, plans)?,
                ItemPolicy::Strict => check_strict(corr, &body, roles, plans)?,
            }

            let item_lines = std::iter::once(corr)
                .chain(body)
                .map(|l| l.text.to_string())
                .collect();
            items.push(Item::from_lines(item_lines, roles, plans));
        }

        tracing::debug!(items = items.len(), "Parsed data-items");
        Ok(items)
    }
}

/// Validates the header line and extracts the job code.
fn parse_header(first: Option<&TaggedLine<'_>>) -> Result<(String, String)> {
    let Some(header) = first else {
        return Err(Error::MalformedHeader {
            reason: "input is empty".to_string(),
        });
    };

    if header.tag != LineTag::Header {
        return Err(Error::MalformedHeader {
            reason: format!("first line must start with 'JOB|', found: {}", header.text),
        });
    }

    let job_code = header.fields().nth(1).ok_or_else(|| Error::MalformedHeader {
        reason: format!("need JOB|<job_code>|..., found: {}", header.text),
    })?;

    Ok((header.text.to_string(), job_code.to_string()))
}

/// Validates the footer against the header job code and returns the
/// declared item count.
fn parse_footer(footer: &TaggedLine<'_>, job_code: &str) -> Result<i64> {
    let malformed = |reason: String| Error::MalformedFooter {
        line: footer.number,
        content: footer.text.to_string(),
        reason,
    };

    let fields: Vec<&str> = footer.fields().collect();
    let [_, footer_job, count] = fields.as_slice() else {
        return Err(malformed(format!(
            "expected FOOTER|<job_code>|<count>, found {} fields",
            fields.len()
        )));
    };

    if *footer_job != job_code {
        return Err(Error::FooterJobMismatch {
            line: footer.number,
            footer: (*footer_job).to_string(),
            header: job_code.to_string(),
        });
    }

    // Padding around the count is tolerated, like every other field.
    count
        .trim()
        .parse::<i64>()
        .map_err(|_| malformed(format!("count '{count}' is not an integer")))
}

/// At least one role and one plan line, any order.
fn check_any_order(corr: &TaggedLine<'_>, roles: usize, plans: usize) -> Result<()> {
    if roles == 0 || plans == 0 {
        return Err(incomplete(corr, roles, plans));
    }
    Ok(())
}

/// Exactly one role line followed by exactly one plan line.
///
/// A third body line means the next item should have started there.
fn check_strict(
    corr: &TaggedLine<'_>,
    body: &[&TaggedLine<'_>],
    roles: usize,
    plans: usize,
) -> Result<()> {
    const SEQUENCE: [(LineTag, &str); 2] = [
        (LineTag::Role, "strict item policy expects CLNT_ROLE/CLNT_ROL after CLNT_CORR"),
        (LineTag::Plan, "strict item policy expects PLAN after CLNT_ROLE"),
    ];

    for (i, line) in body.iter().enumerate() {
        match SEQUENCE.get(i) {
            Some((tag, _)) if *tag == line.tag => {},
            Some((_, expected)) => return Err(unexpected(line, expected)),
            None => {
                return Err(Error::ExpectedCorrelation {
                    line: line.number,
                    content: line.text.to_string(),
                });
            },
        }
    }

    if body.len() < SEQUENCE.len() {
        return Err(incomplete(corr, roles, plans));
    }
    Ok(())
}

/// Blank lines may follow the footer; anything else is an error.
fn reject_trailing(rest: Lines<'_, '_>) -> Result<()> {
    for line in rest {
        if !line.text.trim().is_empty() {
            return Err(unexpected(line, "nothing may follow the FOOTER line"));
        }
    }
    Ok(())
}

fn unexpected(line: &TaggedLine<'_>, expected: &str) -> Error {
    Error::UnexpectedLine {
        line: line.number,
        content: line.text.to_string(),
        expected: expected.to_string(),
    }
}

fn incomplete(corr: &TaggedLine<'_>, roles: usize, plans: usize) -> Error {
    Error::IncompleteItem {
        line: corr.number,
        correlation: corr.text.to_string(),
        roles,
        plans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    fn parse(text: &str) -> Result<Document> {
        StructuralParser::default().parse(&lines(text))
    }

    fn parse_strict(text: &str) -> Result<Document> {
        StructuralParser::new(ParserOptions::strict()).parse(&lines(text))
    }

    const SAMPLE: &str = "JOB|J1|x\nMETA_A|y\nCLNT_CORR|1\nCLNT_ROLE|r1\nPLAN|p1\nCLNT_CORR|2\nCLNT_ROLE|r2\nPLAN|p2\nFOOTER|J1|2";

    #[test]
    fn test_parse_sample() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(doc.header_line, "JOB|J1|x");
        assert_eq!(doc.job_code, "J1");
        assert_eq!(doc.metadata_lines, vec!["META_A|y"]);
        assert_eq!(doc.item_count(), 2);
        assert_eq!(doc.items[1].lines(), ["CLNT_CORR|2", "CLNT_ROLE|r2", "PLAN|p2"]);
        assert_eq!(doc.declared_count, 2);
    }

    #[test]
    fn test_any_order_accepts_interleaved_lines() {
        let doc = parse(
            "JOB|J1\nMETA_A|y\nCLNT_CORR|1\nPLAN|p1\nCLNT_ROL|r1\nPLAN|p2\nCLNT_ROLE|r2\nFOOTER|J1|1",
        )
        .unwrap();
        assert_eq!(doc.items[0].lines().len(), 5);
        assert_eq!(doc.items[0].role_count(), 2);
        assert_eq!(doc.items[0].plan_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let err = StructuralParser::default().parse(&[]).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { .. }));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_header_must_be_first() {
        let err = parse("META_A|y\nJOB|J1").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { .. }));
    }

    #[test]
    fn test_missing_metadata() {
        let err = parse("JOB|J1\nCLNT_CORR|1\nCLNT_ROLE|r\nPLAN|p\nFOOTER|J1|1").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingMetadata { line: 2, ref content } if content == "CLNT_CORR|1"
        ));
    }

    #[test]
    fn test_metadata_optional_when_configured() {
        let parser =
            StructuralParser::new(ParserOptions::default().with_require_metadata(false));
        let doc = parser
            .parse(&lines("JOB|J1\nCLNT_CORR|1\nCLNT_ROLE|r\nPLAN|p\nFOOTER|J1|1"))
            .unwrap();
        assert!(doc.metadata_lines.is_empty());
        assert_eq!(doc.item_count(), 1);
    }

    #[test]
    fn test_expected_correlation() {
        let err = parse("JOB|J1\nMETA_A|y\nCLNT_ROLE|r\nFOOTER|J1|0").unwrap_err();
        assert!(matches!(err, Error::ExpectedCorrelation { line: 3, .. }));
    }

    #[test]
    fn test_incomplete_item_cites_correlation() {
        let err = parse(
            "JOB|J1\nMETA_A|y\nCLNT_CORR|1\nCLNT_ROLE|r\nPLAN|p\nCLNT_CORR|2\nPLAN|p2\nFOOTER|J1|2",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteItem { line: 6, roles: 0, plans: 1, ref correlation } if correlation == "CLNT_CORR|2"
        ));
    }

    #[test]
    fn test_unexpected_line_inside_item() {
        let err = parse("JOB|J1\nMETA_A|y\nCLNT_CORR|1\nCLNT_ROLE|r\nMETA_B|z\nPLAN|p\nFOOTER|J1|1")
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedLine { line: 5, .. }));
    }

    #[test]
    fn test_missing_footer() {
        let err = parse("JOB|J1\nMETA_A|y\nCLNT_CORR|1\nCLNT_ROLE|r\nPLAN|p").unwrap_err();
        assert!(matches!(err, Error::MissingFooter { last_line: 5 }));
    }

    #[test]
    fn test_malformed_footer() {
        let err = parse("JOB|J1\nMETA_A|y\nFOOTER|J1").unwrap_err();
        assert!(matches!(err, Error::MalformedFooter { line: 3, .. }));

        let err = parse("JOB|J1\nMETA_A|y\nFOOTER|J1|two").unwrap_err();
        assert!(matches!(err, Error::MalformedFooter { .. }));
        assert!(err.to_string().contains("not an integer"));

        let err = parse("JOB|J1\nMETA_A|y\nFOOTER|J1| 1 x").unwrap_err();
        assert!(err.to_string().contains("count ' 1 x' is not an integer"));
    }

    #[test]
    fn test_footer_count_padding_tolerated() {
        for footer in ["FOOTER|J1|1 ", "FOOTER|J1| 1", "FOOTER|J1|   1   "] {
            let text = format!("JOB|J1\nMETA_A|y\nCLNT_CORR|1\nCLNT_ROLE|r\nPLAN|p\n{footer}");
            let doc = parse(&text).unwrap();
            assert_eq!(doc.declared_count, 1);
            assert!(doc.declared_count_matches());
        }
    }

    #[test]
    fn test_footer_job_mismatch() {
        let err = parse("JOB|J1\nMETA_A|y\nFOOTER|J2|0").unwrap_err();
        assert!(matches!(err, Error::FooterJobMismatch { ref footer, ref header, .. } if footer == "J2" && header == "J1"));
    }

    #[test]
    fn test_footer_count_mismatch_is_not_fatal() {
        let doc = parse("JOB|J1\nMETA_A|y\nCLNT_CORR|1\nCLNT_ROLE|r\nPLAN|p\nFOOTER|J1|7").unwrap();
        assert_eq!(doc.item_count(), 1);
        assert_eq!(doc.declared_count, 7);
        assert!(!doc.declared_count_matches());
    }

    #[test]
    fn test_zero_items() {
        let doc = parse("JOB|J1\nMETA_A|y\nFOOTER|J1|0").unwrap();
        assert_eq!(doc.item_count(), 0);
    }

    #[test]
    fn test_trailing_lines_after_footer() {
        assert!(parse("JOB|J1\nMETA_A|y\nFOOTER|J1|0\n\n   ").is_ok());
        let err = parse("JOB|J1\nMETA_A|y\nFOOTER|J1|0\nCLNT_CORR|9").unwrap_err();
        assert!(matches!(err, Error::UnexpectedLine { line: 4, .. }));
    }

    #[test]
    fn test_strict_accepts_role_then_plan() {
        let doc = parse_strict(SAMPLE).unwrap();
        assert_eq!(doc.item_count(), 2);
    }

    #[test]
    fn test_strict_rejects_plan_first() {
        let err = parse_strict("JOB|J1\nMETA_A|y\nCLNT_CORR|1\nPLAN|p\nCLNT_ROLE|r\nFOOTER|J1|1")
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedLine { line: 4, .. }));
    }

    #[test]
    fn test_strict_rejects_extra_lines() {
        let err = parse_strict(
            "JOB|J1\nMETA_A|y\nCLNT_CORR|1\nCLNT_ROLE|r\nPLAN|p\nPLAN|q\nFOOTER|J1|1",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ExpectedCorrelation { line: 6, ref content } if content == "PLAN|q"
        ));
    }

    #[test]
    fn test_strict_incomplete() {
        let err = parse_strict("JOB|J1\nMETA_A|y\nCLNT_CORR|1\nCLNT_ROLE|r\nFOOTER|J1|1")
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteItem { roles: 1, plans: 0, .. }));
    }
}
