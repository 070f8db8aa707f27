//! Delimited blocks.

use std::fmt::Write;

use adoc_types::{
    ATTR_LANGUAGE, ATTR_QUOTE_AUTHOR, ATTR_QUOTE_TITLE, DelimitedBlock, DelimitedBlockKind,
    ElementAttributes, Node,
};

use super::{blocks, block_title, open_block, render_elements, render_lines};
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::escape::escape_html;

pub(super) fn delimited_block(
    ctx: &mut RenderContext<'_>,
    block: &DelimitedBlock,
) -> Result<String, RenderError> {
    let attrs = &block.attributes;
    match block.kind {
        DelimitedBlockKind::Comment => Ok(String::new()),
        DelimitedBlockKind::Passthrough => Ok(passthrough_lines(&block.elements)),
        DelimitedBlockKind::Fenced => {
            let content = raw_content(ctx, &block.elements)?;
            let mut out = String::new();
            open_block(&mut out, "listingblock", attrs)?;
            block_title(&mut out, attrs)?;
            write!(
                out,
                "\n<div class=\"content\">\n<pre class=\"highlight\"><code>{content}</code></pre>\n</div>\n</div>"
            )?;
            Ok(out)
        }
        DelimitedBlockKind::Listing => {
            let content = raw_content(ctx, &block.elements)?;
            let mut out = String::new();
            open_block(&mut out, "listingblock", attrs)?;
            block_title(&mut out, attrs)?;
            write!(
                out,
                "\n<div class=\"content\">\n<pre>{content}</pre>\n</div>\n</div>"
            )?;
            Ok(out)
        }
        DelimitedBlockKind::Source => {
            let content = raw_content(ctx, &block.elements)?;
            let mut out = String::new();
            open_block(&mut out, "listingblock", attrs)?;
            block_title(&mut out, attrs)?;
            out.push_str("\n<div class=\"content\">\n<pre class=\"highlight\">");
            match attrs.get_str(ATTR_LANGUAGE) {
                Some(language) => {
                    let language = escape_html(language);
                    write!(
                        out,
                        r#"<code class="language-{language}" data-lang="{language}">"#
                    )?;
                }
                None => out.push_str("<code>"),
            }
            write!(out, "{content}</code></pre>\n</div>\n</div>")?;
            Ok(out)
        }
        DelimitedBlockKind::Example => example(ctx, block),
        DelimitedBlockKind::Quote => {
            let content = compound_content(ctx, &block.elements)?;
            let mut out = String::new();
            open_block(&mut out, "quoteblock", attrs)?;
            block_title(&mut out, attrs)?;
            write!(out, "\n<blockquote>\n{content}\n</blockquote>")?;
            attribution(&mut out, attrs)?;
            out.push_str("\n</div>");
            Ok(out)
        }
        DelimitedBlockKind::Verse => {
            let content = verse_content(ctx, &block.elements)?;
            let mut out = String::new();
            open_block(&mut out, "verseblock", attrs)?;
            block_title(&mut out, attrs)?;
            write!(out, "\n<pre class=\"content\">{content}</pre>")?;
            attribution(&mut out, attrs)?;
            out.push_str("\n</div>");
            Ok(out)
        }
        DelimitedBlockKind::Sidebar => {
            let content = compound_content(ctx, &block.elements)?;
            let mut out = String::new();
            open_block(&mut out, "sidebarblock", attrs)?;
            out.push_str("\n<div class=\"content\">");
            block_title(&mut out, attrs)?;
            write!(out, "\n{content}\n</div>\n</div>")?;
            Ok(out)
        }
    }
}

/// Example blocks are numbered in document order when they have a title.
/// An admonition style turns the block into an admonition.
fn example(ctx: &mut RenderContext<'_>, block: &DelimitedBlock) -> Result<String, RenderError> {
    let attrs = &block.attributes;
    let content = compound_content(ctx, &block.elements)?;
    if let Some(kind) = attrs.admonition() {
        return blocks::admonition(ctx, kind, attrs, &content);
    }
    let mut out = String::new();
    open_block(&mut out, "exampleblock", attrs)?;
    if let Some(title) = attrs.title() {
        let number = ctx.next_example_number();
        write!(
            out,
            "\n<div class=\"title\">Example {number}. {}</div>",
            escape_html(title)
        )?;
    }
    write!(out, "\n<div class=\"content\">\n{content}\n</div>\n</div>")?;
    Ok(out)
}

/// `&#8212; author` with the cited title on a second line.
fn attribution(out: &mut String, attrs: &ElementAttributes) -> Result<(), RenderError> {
    let author = attrs.get_str(ATTR_QUOTE_AUTHOR);
    let cite = attrs.get_str(ATTR_QUOTE_TITLE);
    if author.is_none() && cite.is_none() {
        return Ok(());
    }
    out.push_str("\n<div class=\"attribution\">\n");
    if let Some(author) = author {
        write!(out, "&#8212; {}", escape_html(author))?;
    }
    if let Some(cite) = cite {
        if author.is_some() {
            out.push_str("<br>\n");
        }
        write!(out, "<cite>{}</cite>", escape_html(cite))?;
    }
    out.push_str("\n</div>");
    Ok(())
}

/// Nested blocks of an example, quote or sidebar.
fn compound_content(ctx: &mut RenderContext<'_>, elements: &[Node]) -> Result<String, RenderError> {
    let mut scope = ctx.scope().with_within_delimited_block(true);
    render_elements(&mut scope, elements)
}

/// Listing-like content: escaped lines, blank lines kept except at the end.
fn raw_content(ctx: &mut RenderContext<'_>, elements: &[Node]) -> Result<String, RenderError> {
    let mut scope = ctx
        .scope()
        .with_within_delimited_block(true)
        .with_include_blank_lines(true);
    render_elements(&mut scope, trim_trailing_blank_lines(elements))
}

fn verse_content(ctx: &mut RenderContext<'_>, elements: &[Node]) -> Result<String, RenderError> {
    let mut scope = ctx
        .scope()
        .with_within_delimited_block(true)
        .with_include_blank_lines(true);
    let mut lines = Vec::new();
    for element in trim_trailing_blank_lines(elements) {
        match element {
            Node::Paragraph(paragraph) => lines.push(render_lines(&mut scope, &paragraph.lines)?),
            Node::BlankLine => lines.push(String::new()),
            other => lines.push(super::render(&mut scope, other)?),
        }
    }
    Ok(lines.join("\n"))
}

/// Passthrough content goes out unescaped, without a wrapper.
fn passthrough_lines(elements: &[Node]) -> String {
    trim_trailing_blank_lines(elements)
        .iter()
        .map(|element| match element {
            Node::Text(text) => text.content.as_str(),
            _ => "",
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn trim_trailing_blank_lines(elements: &[Node]) -> &[Node] {
    let end = elements
        .iter()
        .rposition(|e| !e.is_blank_line())
        .map_or(0, |i| i + 1);
    &elements[..end]
}
