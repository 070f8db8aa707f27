//! Block-level recognition.

use std::sync::LazyLock;

use adoc_types::{
    ATTR_LANGUAGE, ATTR_STYLE, ATTR_TITLE, AdmonitionKind, DelimitedBlockKind,
    ElementAttributes, Fragment, Node, UserMacroKind,
};
use regex::Regex;

use super::ContentMode;
use super::attributes::parse_attribute_list;
use super::inline::parse_inline;
use crate::builder;
use crate::error::BuildError;

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[\[([^\[\]]+)\]\]$").unwrap());

static BLOCK_ATTRIBUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\[\]].*)?\]$").unwrap());

static BLOCK_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.([^.\s].*)$").unwrap());

static ATTRIBUTE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:(!?)([A-Za-z0-9_][A-Za-z0-9_-]*)(!?):(?:\s+(.*))?$").unwrap()
});

static INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^include::([^\[\s][^\[]*)\[(.*)\]$").unwrap());

static BLOCK_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^image::([^\[\s][^\[]*)\[(.*)\]$").unwrap());

static BLOCK_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+)::(\S*?)\[(.*)\]$").unwrap());

static SECTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(={1,6})\s+(\S.*)$").unwrap());

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\*+|-)\s+(\S.*)$").unwrap());

static ADMONITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(NOTE|TIP|IMPORTANT|WARNING|CAUTION):\s+(.*)$").unwrap()
});

/// Cursor over source lines.
pub(super) struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lines<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        Self::from_vec(source.lines().collect())
    }

    fn from_vec(lines: Vec<&'a str>) -> Self {
        Self { lines, pos: 0 }
    }

    pub(super) fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    pub(super) fn advance(&mut self) {
        self.pos += 1;
    }

    /// Line number (1-based) of the next line.
    pub(super) fn line_number(&self) -> usize {
        self.pos + 1
    }

    pub(super) fn mark(&self) -> usize {
        self.pos
    }

    pub(super) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    /// Take lines up to (not including) the first line equal to `closing`,
    /// consuming the closing line. Without a closing line, takes the rest.
    fn take_until(&mut self, closing: &str) -> (Vec<&'a str>, bool) {
        let mut taken = Vec::new();
        while let Some(line) = self.peek() {
            self.advance();
            if line.trim_end() == closing {
                return (taken, true);
            }
            taken.push(line);
        }
        (taken, false)
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_line_comment(line: &str) -> bool {
    line.starts_with("//") && !line.starts_with("///")
}

/// Opening fence of a delimited block.
struct Delimiter<'a> {
    /// Line that closes the block.
    closing: &'a str,
    kind: DelimitedBlockKind,
    /// Language given after a backtick fence.
    language: Option<&'a str>,
}

impl<'a> Delimiter<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim_end();
        if let Some(language) = line.strip_prefix("```") {
            let language = language.trim();
            return Some(Self {
                closing: "```",
                kind: DelimitedBlockKind::Fenced,
                language: Some(language).filter(|l| !l.is_empty()),
            });
        }
        let first = line.chars().next()?;
        if line.len() < 4 || !line.chars().all(|c| c == first) {
            return None;
        }
        let kind = match first {
            '-' => DelimitedBlockKind::Listing,
            '=' => DelimitedBlockKind::Example,
            '_' => DelimitedBlockKind::Quote,
            '*' => DelimitedBlockKind::Sidebar,
            '/' => DelimitedBlockKind::Comment,
            '+' => DelimitedBlockKind::Passthrough,
            _ => return None,
        };
        Some(Self {
            closing: line,
            kind,
            language: None,
        })
    }
}

/// Parse content in the given mode until the lines run out.
pub(super) fn parse_content(
    lines: &mut Lines<'_>,
    mode: ContentMode,
) -> Result<Vec<Fragment>, BuildError> {
    match mode {
        ContentMode::Document | ContentMode::Compound => parse_blocks(lines, mode),
        ContentMode::Verse => parse_verse(lines),
        ContentMode::Raw => parse_raw(lines),
    }
}

/// Parse blocks until the lines run out.
pub(super) fn parse_blocks(
    lines: &mut Lines<'_>,
    mode: ContentMode,
) -> Result<Vec<Fragment>, BuildError> {
    let mut blocks = Vec::new();
    let mut pending = ElementAttributes::new();

    while let Some(line) = lines.peek() {
        if is_blank(line) {
            lines.advance();
            blocks.push(Node::BlankLine.into());
            continue;
        }
        if let Some(delimiter) = Delimiter::parse(line) {
            lines.advance();
            let start = lines.line_number() - 1;
            let (content, closed) = lines.take_until(delimiter.closing);
            if !closed {
                tracing::warn!(line = start, "unterminated delimited block");
            }
            let attributes = std::mem::take(&mut pending);
            blocks.push(delimited_block(&delimiter, content, attributes)?.into());
            continue;
        }
        if is_line_comment(line) {
            lines.advance();
            continue;
        }
        if let Some(block) = single_line_block(line, &mut pending, mode)? {
            lines.advance();
            if let Some(block) = block {
                blocks.push(block.into());
            }
            continue;
        }
        if LIST_ITEM.is_match(line) {
            let attributes = std::mem::take(&mut pending);
            blocks.push(list(lines, attributes)?.into());
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            let attributes = std::mem::take(&mut pending);
            blocks.push(literal(lines, attributes)?.into());
            continue;
        }
        let attributes = std::mem::take(&mut pending);
        blocks.push(paragraph(lines, attributes)?.into());
    }
    Ok(blocks)
}

/// Blocks and block attributes that fit on one line.
///
/// Returns `Some(None)` when the line only contributed attributes for the
/// next block.
fn single_line_block(
    line: &str,
    pending: &mut ElementAttributes,
    mode: ContentMode,
) -> Result<Option<Option<Node>>, BuildError> {
    let line = line.trim_end();
    if let Some(caps) = ANCHOR.captures(line) {
        pending.extend(builder::new_anchor(vec![caps[1].into()])?);
        return Ok(Some(None));
    }
    if let Some(caps) = BLOCK_ATTRIBUTES.captures(line) {
        let list = caps.get(1).map_or("", |m| m.as_str());
        pending.extend(builder::new_block_attributes(parse_attribute_list(list))?);
        return Ok(Some(None));
    }
    if let Some(caps) = BLOCK_TITLE.captures(line) {
        pending.insert(ATTR_TITLE, caps[1].trim());
        return Ok(Some(None));
    }
    if line == "toc::[]" {
        *pending = ElementAttributes::new();
        return Ok(Some(Some(Node::TableOfContentsMacro)));
    }
    if let Some(node) = attribute_entry(line)? {
        return Ok(Some(Some(node)));
    }
    if let Some(caps) = INCLUDE.captures(line) {
        let attrs = builder::new_element_attributes(parse_attribute_list(&caps[2]))?;
        let node = builder::new_file_inclusion(vec![caps[1].into()], attrs, line)?;
        return Ok(Some(Some(node)));
    }
    if let Some(caps) = BLOCK_IMAGE.captures(line) {
        let mut attrs = std::mem::take(pending);
        attrs.extend(builder::new_element_attributes(parse_attribute_list(&caps[2]))?);
        let node = builder::new_block_image(vec![caps[1].into()], attrs)?;
        return Ok(Some(Some(node)));
    }
    if let Some(caps) = BLOCK_MACRO.captures(line) {
        let attrs = builder::new_element_attributes(parse_attribute_list(&caps[3]))?;
        let node =
            builder::new_user_macro(UserMacroKind::Block, &caps[1], &caps[2], attrs, line)?;
        return Ok(Some(Some(node)));
    }
    if mode == ContentMode::Document
        && let Some(caps) = SECTION.captures(line)
    {
        let level = caps[1].len() - 1;
        let attributes = std::mem::take(pending);
        let node = builder::new_section(level, parse_inline(caps[2].trim())?, attributes)?;
        return Ok(Some(Some(node)));
    }
    Ok(None)
}

/// `:name: value`, `:name!:` or `:!name:`.
pub(super) fn attribute_entry(line: &str) -> Result<Option<Node>, BuildError> {
    let Some(caps) = ATTRIBUTE_ENTRY.captures(line) else {
        return Ok(None);
    };
    let name = caps[2].to_owned();
    let node = if !caps[1].is_empty() || !caps[3].is_empty() {
        builder::new_attribute_reset(vec![name.into()])?
    } else {
        let value = caps.get(4).map_or("", |m| m.as_str());
        builder::new_attribute_declaration(vec![name.into()], vec![value.into()])?
    };
    Ok(Some(node))
}

fn delimited_block(
    delimiter: &Delimiter<'_>,
    content: Vec<&str>,
    mut attributes: ElementAttributes,
) -> Result<Node, BuildError> {
    let style = attributes.get_str(ATTR_STYLE);
    let kind = match (delimiter.kind, style) {
        (DelimitedBlockKind::Listing, Some("source")) => DelimitedBlockKind::Source,
        (DelimitedBlockKind::Quote, Some("verse")) => DelimitedBlockKind::Verse,
        (DelimitedBlockKind::Fenced, _) if delimiter.language.is_some() => {
            DelimitedBlockKind::Source
        }
        (kind, _) => kind,
    };
    if let Some(language) = delimiter.language
        && !attributes.contains(ATTR_LANGUAGE)
    {
        attributes.insert(ATTR_LANGUAGE, language);
    }

    let mut inner = Lines::from_vec(content);
    let elements = if kind == DelimitedBlockKind::Comment {
        let mut lines = Vec::new();
        while let Some(line) = inner.peek() {
            inner.advance();
            lines.push(Fragment::from(line));
        }
        lines
    } else {
        parse_content(&mut inner, ContentMode::for_block(kind))?
    };
    builder::new_delimited_block(kind, attributes, elements)
}

fn include_line(line: &str) -> Result<Option<Node>, BuildError> {
    let line = line.trim_end();
    let Some(caps) = INCLUDE.captures(line) else {
        return Ok(None);
    };
    let attrs = builder::new_element_attributes(parse_attribute_list(&caps[2]))?;
    builder::new_file_inclusion(vec![caps[1].into()], attrs, line).map(Some)
}

/// Raw content: one fragment per line, include directives recognized.
fn parse_raw(lines: &mut Lines<'_>) -> Result<Vec<Fragment>, BuildError> {
    let mut fragments = Vec::new();
    while let Some(line) = lines.peek() {
        lines.advance();
        if is_blank(line) {
            fragments.push(Node::BlankLine.into());
        } else if let Some(include) = include_line(line)? {
            fragments.push(include.into());
        } else {
            fragments.push(Fragment::from(line));
        }
    }
    Ok(fragments)
}

/// Verse content: paragraphs separated by preserved blank lines.
fn parse_verse(lines: &mut Lines<'_>) -> Result<Vec<Fragment>, BuildError> {
    let mut fragments = Vec::new();
    let mut paragraph_lines = Vec::new();
    let flush = |paragraph_lines: &mut Vec<Vec<Fragment>>, fragments: &mut Vec<Fragment>| {
        if paragraph_lines.is_empty() {
            return Ok::<(), BuildError>(());
        }
        let lines = std::mem::take(paragraph_lines);
        fragments.push(builder::new_paragraph(lines, ElementAttributes::new())?.into());
        Ok(())
    };
    while let Some(line) = lines.peek() {
        lines.advance();
        if is_blank(line) {
            flush(&mut paragraph_lines, &mut fragments)?;
            fragments.push(Node::BlankLine.into());
        } else if let Some(include) = include_line(line)? {
            flush(&mut paragraph_lines, &mut fragments)?;
            fragments.push(include.into());
        } else {
            paragraph_lines.push(parse_inline(line)?);
        }
    }
    flush(&mut paragraph_lines, &mut fragments)?;
    Ok(fragments)
}

fn ends_paragraph(line: &str) -> bool {
    is_blank(line) || Delimiter::parse(line).is_some() || INCLUDE.is_match(line.trim_end())
}

fn paragraph(lines: &mut Lines<'_>, attributes: ElementAttributes) -> Result<Node, BuildError> {
    let mut content = Vec::new();
    let mut admonition = None;
    while let Some(line) = lines.peek() {
        if !content.is_empty() && ends_paragraph(line) {
            break;
        }
        lines.advance();
        if is_line_comment(line) {
            continue;
        }
        let text = line.trim_end();
        if content.is_empty()
            && let Some(caps) = ADMONITION.captures(text)
        {
            admonition = AdmonitionKind::from_label(&caps[1]);
            content.push(parse_inline(&caps[2])?);
            continue;
        }
        content.push(parse_inline(text)?);
    }
    match admonition {
        Some(kind) => builder::new_admonition_paragraph(kind, content, attributes),
        None => builder::new_paragraph(content, attributes),
    }
}

fn literal(lines: &mut Lines<'_>, attributes: ElementAttributes) -> Result<Node, BuildError> {
    let mut content = Vec::new();
    while let Some(line) = lines.peek() {
        if is_blank(line) {
            break;
        }
        lines.advance();
        content.push(line);
    }
    builder::new_literal_block(&content, attributes)
}

/// Consecutive list items with their continuation lines. Blank lines
/// between items do not end the list.
fn list(lines: &mut Lines<'_>, attributes: ElementAttributes) -> Result<Node, BuildError> {
    let mut items = Vec::new();
    loop {
        let Some(caps) = lines.peek().and_then(|l| LIST_ITEM.captures(l)) else {
            break;
        };
        lines.advance();
        let marker = caps[1].to_owned();
        let mut item_lines = vec![parse_inline(caps[2].trim_end())?];
        while let Some(next) = lines.peek() {
            if is_blank(next)
                || LIST_ITEM.is_match(next)
                || ends_paragraph(next)
                || BLOCK_ATTRIBUTES.is_match(next.trim_end())
            {
                break;
            }
            lines.advance();
            if !is_line_comment(next) {
                item_lines.push(parse_inline(next.trim())?);
            }
        }
        items.push(builder::new_list_item(&marker, item_lines)?.into());

        let mark = lines.mark();
        while lines.peek().is_some_and(is_blank) {
            lines.advance();
        }
        if !lines.peek().is_some_and(|l| LIST_ITEM.is_match(l)) {
            lines.reset(mark);
            break;
        }
    }
    builder::new_list(items, attributes)
}
