//! Content selection for include directives: `lines=` and `tag=`.

use std::fmt;

/// Inclusive, 1-based line range. `end` of `None` means end of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: Option<usize>,
}

/// Ranges of a `lines` attribute, in the order written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRanges(pub Vec<LineRange>);

/// A `lines` value that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLineRange(pub String);

impl fmt::Display for InvalidLineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid line range '{}'", self.0)
    }
}

impl LineRanges {
    /// Parse `1..2;5..7`, `1`, `5..` or `5..-1`. Ranges are separated by `;`
    /// or `,`.
    pub fn parse(value: &str) -> Result<Self, InvalidLineRange> {
        let mut ranges = Vec::new();
        for part in value.split([';', ',']).map(str::trim).filter(|p| !p.is_empty()) {
            let invalid = || InvalidLineRange(part.to_owned());
            let range = match part.split_once("..") {
                Some((start, end)) => {
                    let start = start.trim().parse::<usize>().map_err(|_| invalid())?;
                    let end = match end.trim() {
                        "" | "-1" => None,
                        n => Some(n.parse::<usize>().map_err(|_| invalid())?),
                    };
                    LineRange { start, end }
                }
                None => {
                    let line = part.parse::<usize>().map_err(|_| invalid())?;
                    LineRange {
                        start: line,
                        end: Some(line),
                    }
                }
            };
            if range.start == 0 || range.end.is_some_and(|end| end < range.start) {
                return Err(invalid());
            }
            ranges.push(range);
        }
        if ranges.is_empty() {
            return Err(InvalidLineRange(value.to_owned()));
        }
        Ok(Self(ranges))
    }

    /// Text of every range, in order. Ranges past the end of the file select
    /// nothing.
    #[must_use]
    pub fn select(&self, text: &str) -> Vec<String> {
        let lines: Vec<&str> = text.lines().collect();
        self.0
            .iter()
            .map(|range| {
                let start = range.start - 1;
                let end = range.end.unwrap_or(lines.len()).min(lines.len());
                if start >= end {
                    String::new()
                } else {
                    lines[start..end].join("\n")
                }
            })
            .collect()
    }
}

/// Problem found while selecting a tagged region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagProblem {
    /// `tag::NAME[]` without a matching `end::NAME[]`; `line` is 1-based.
    Unclosed { line: usize },
    NotFound,
}

/// Lines of every region tagged `name`.
///
/// Marker lines of any tag are dropped. An unclosed region extends to the end
/// of the file and is reported; a missing tag selects nothing.
pub fn select_tag(text: &str, name: &str) -> (String, Option<TagProblem>) {
    let start_marker = format!("tag::{name}[]");
    let end_marker = format!("end::{name}[]");
    let mut selected = Vec::new();
    let mut open_at: Option<usize> = None;
    let mut found = false;

    for (index, line) in text.lines().enumerate() {
        if line.contains(&start_marker) {
            found = true;
            open_at.get_or_insert(index + 1);
            continue;
        }
        if line.contains(&end_marker) {
            open_at = None;
            continue;
        }
        if is_tag_marker(line) {
            continue;
        }
        if open_at.is_some() {
            selected.push(line);
        }
    }

    let problem = match open_at {
        Some(line) => Some(TagProblem::Unclosed { line }),
        None if !found => Some(TagProblem::NotFound),
        None => None,
    };
    (selected.join("\n"), problem)
}

fn is_tag_marker(line: &str) -> bool {
    ["tag::", "end::"].iter().any(|prefix| {
        line.find(prefix).is_some_and(|at| {
            let rest = &line[at + prefix.len()..];
            rest.find("[]").is_some_and(|close| {
                close > 0 && !rest[..close].contains(char::is_whitespace)
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TAGGED: &str = "\
// tag::doc[]
= Doc
// tag::section[]
== Section 1
// end::section[]

content
// end::doc[]
after";

    #[test]
    fn test_parse_line_ranges() {
        assert_eq!(
            LineRanges::parse("1..2;5..7").unwrap(),
            LineRanges(vec![
                LineRange {
                    start: 1,
                    end: Some(2)
                },
                LineRange {
                    start: 5,
                    end: Some(7)
                },
            ])
        );
        assert_eq!(
            LineRanges::parse("1").unwrap(),
            LineRanges(vec![LineRange {
                start: 1,
                end: Some(1)
            }])
        );
        assert_eq!(
            LineRanges::parse("3..-1").unwrap().0[0],
            LineRange {
                start: 3,
                end: None
            }
        );
    }

    #[test]
    fn test_parse_invalid_ranges() {
        assert!(LineRanges::parse("a..b").is_err());
        assert!(LineRanges::parse("0..2").is_err());
        assert!(LineRanges::parse("5..2").is_err());
        assert!(LineRanges::parse("").is_err());
    }

    #[test]
    fn test_select_ranges() {
        let text = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8";
        let ranges = LineRanges::parse("1..2;5..7").unwrap();
        assert_eq!(ranges.select(text), vec!["l1\nl2", "l5\nl6\nl7"]);
        let tail = LineRanges::parse("7..").unwrap();
        assert_eq!(tail.select(text), vec!["l7\nl8"]);
        let past_end = LineRanges::parse("20..30").unwrap();
        assert_eq!(past_end.select(text), vec![""]);
    }

    #[test]
    fn test_select_tag() {
        let (text, problem) = select_tag(TAGGED, "section");
        assert_eq!(text, "== Section 1");
        assert_eq!(problem, None);
    }

    #[test]
    fn test_select_outer_tag_drops_inner_markers() {
        let (text, problem) = select_tag(TAGGED, "doc");
        assert_eq!(text, "= Doc\n== Section 1\n\ncontent");
        assert_eq!(problem, None);
    }

    #[test]
    fn test_select_unclosed_tag() {
        let (text, problem) = select_tag("a\n// tag::open[]\nb\nc", "open");
        assert_eq!(text, "b\nc");
        assert_eq!(problem, Some(TagProblem::Unclosed { line: 2 }));
    }

    #[test]
    fn test_select_missing_tag() {
        let (text, problem) = select_tag(TAGGED, "unknown");
        assert_eq!(text, "");
        assert_eq!(problem, Some(TagProblem::NotFound));
    }
}
