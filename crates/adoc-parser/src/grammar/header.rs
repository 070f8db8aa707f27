//! Front matter and document header.

use std::sync::LazyLock;

use adoc_types::{DocumentAuthor, DocumentHeader, DocumentRevision, FrontMatter, Fragment};
use regex::Regex;

use super::blocks::{Lines, attribute_entry};
use super::inline::parse_inline;
use crate::builder;
use crate::error::BuildError;

static DOCUMENT_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^=\s+(\S.*)$").unwrap());

static AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^<>]+?)\s*(<[^<>]+>)?\s*$").unwrap());

/// YAML front matter between two `---` lines at the very top.
pub(super) fn parse_front_matter(lines: &mut Lines<'_>) -> Result<Option<FrontMatter>, BuildError> {
    if lines.peek().map(str::trim_end) != Some("---") {
        return Ok(None);
    }
    let start = lines.mark();
    lines.advance();
    let mut content = Vec::new();
    while let Some(line) = lines.peek() {
        lines.advance();
        if line.trim_end() == "---" {
            let yaml = content.join("\n");
            return builder::new_yaml_front_matter(&yaml).map(Some);
        }
        content.push(line);
    }
    lines.reset(start);
    Ok(None)
}

/// Document header: title, author and revision lines, attribute entries.
///
/// A header without a title is recognized when the document starts with
/// attribute entries.
pub(super) fn parse_header(lines: &mut Lines<'_>) -> Result<Option<DocumentHeader>, BuildError> {
    skip_blank_and_comments(lines);
    let Some(first) = lines.peek() else {
        return Ok(None);
    };

    let mut title = Vec::new();
    let mut authors = Vec::new();
    let mut revision = None;

    if let Some(caps) = DOCUMENT_TITLE.captures(first.trim_end()) {
        title = parse_inline(caps[1].trim())?;
        lines.advance();
        if let Some(line) = lines.peek().filter(|l| is_header_text(l)) {
            authors = parse_authors(line)?;
            lines.advance();
            if let Some(line) = lines.peek().filter(|l| is_header_text(l)) {
                revision = Some(parse_revision(line)?);
                lines.advance();
            }
        }
    } else if attribute_entry(first)?.is_none() {
        return Ok(None);
    }

    let mut entries = Vec::new();
    while let Some(line) = lines.peek() {
        if line.starts_with("//") {
            lines.advance();
            continue;
        }
        let Some(entry) = attribute_entry(line.trim_end())? else {
            break;
        };
        entries.push(entry);
        lines.advance();
    }
    builder::new_document_header(title, authors, revision, entries).map(Some)
}

fn skip_blank_and_comments(lines: &mut Lines<'_>) {
    while lines
        .peek()
        .is_some_and(|l| l.trim().is_empty() || (l.starts_with("//") && !l.starts_with("////")))
    {
        lines.advance();
    }
}

fn is_header_text(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with(':') && !line.starts_with("//")
}

/// `First Middle Last <email>; Other Author`
fn parse_authors(line: &str) -> Result<Vec<DocumentAuthor>, BuildError> {
    line.split(';')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            let caps = AUTHOR
                .captures(part)
                .ok_or_else(|| BuildError::MalformedAuthor(part.trim().to_owned()))?;
            let name = vec![Fragment::from(&caps[1])];
            let email = caps.get(2).map(|m| vec![Fragment::from(m.as_str())]);
            builder::new_document_author(name, email)
        })
        .collect()
}

/// `v1.0, 2024-01-01: remark`; every part is optional.
fn parse_revision(line: &str) -> Result<DocumentRevision, BuildError> {
    let (head, remark) = match line.split_once(':') {
        Some((head, remark)) => (head, Some(remark)),
        None => (line, None),
    };
    let (number, date) = match head.split_once(',') {
        Some((number, date)) => (Some(number), Some(date)),
        None if looks_like_revnumber(head) => (Some(head), None),
        None => (None, Some(head)),
    };
    let wrap = |part: Option<&str>| part.map(|p| vec![Fragment::from(p)]);
    builder::new_document_revision(wrap(number), wrap(date), wrap(remark))
}

fn looks_like_revnumber(text: &str) -> bool {
    let text = text.trim();
    let digits = text.strip_prefix(['v', 'V']).unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit()) && !digits.contains('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoc_types::Node;
    use pretty_assertions::assert_eq;

    fn header(source: &str) -> Option<DocumentHeader> {
        let mut lines = Lines::new(source);
        parse_header(&mut lines).unwrap()
    }

    #[test]
    fn test_full_header() {
        let h = header(
            "= Document Title\nKismet Chameleon <kismet@asciidoctor.org>; Lazarus het_Draeke Dragon\nv1.0, June 19, 2017: First incarnation\n:toc:\n:description: a doc\n\nbody",
        )
        .unwrap();

        assert_eq!(h.title, vec![Node::text("Document Title")]);
        assert_eq!(h.authors.len(), 2);
        assert_eq!(h.authors[0].email.as_deref(), Some("kismet@asciidoctor.org"));
        assert_eq!(h.authors[1].middle_name.as_deref(), Some("het Draeke"));
        assert_eq!(
            h.revision,
            Some(DocumentRevision {
                number: Some("1.0".to_owned()),
                date: Some("June 19, 2017".to_owned()),
                remark: Some("First incarnation".to_owned()),
            })
        );
        assert_eq!(h.attributes.get("toc"), Some(""));
        assert_eq!(h.attributes.get("description"), Some("a doc"));
    }

    #[test]
    fn test_header_without_title() {
        let h = header(":includedir: ../includes\n\ninclude::{includedir}/a.adoc[]").unwrap();
        assert!(h.title.is_empty());
        assert_eq!(h.attributes.get("includedir"), Some("../includes"));
    }

    #[test]
    fn test_no_header() {
        assert_eq!(header("just a paragraph"), None);
    }

    #[test]
    fn test_front_matter() {
        let mut lines = Lines::new("---\ntitle: Hello\n---\n= Doc");
        let fm = parse_front_matter(&mut lines).unwrap().unwrap();
        assert_eq!(fm.content.get("title").map(String::as_str), Some("Hello"));
        assert_eq!(lines.peek(), Some("= Doc"));
    }

    #[test]
    fn test_revision_date_only() {
        let rev = parse_revision("2017-06-19").unwrap();
        assert_eq!(rev.number, None);
        assert_eq!(rev.date.as_deref(), Some("2017-06-19"));
    }
}
