//! HTML5 backend.
//!
//! Every node kind has one render function; [`render`] dispatches on the
//! kind. Block-level output is joined with newlines, inline output is
//! concatenated.

mod blocks;
mod delimited;
mod footnotes;
mod inline;
mod lists;
mod page;
mod toc;

use std::fmt::{self, Write};

use adoc_types::{Document, ElementAttributes, InlineElements, Node};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::escape::escape_html;
use crate::macros::{MacroRegistry, UserMacroTemplate};

/// Renders normalized documents to HTML5.
///
/// # Example
///
/// ```
/// use adoc_parser::Parser;
/// use adoc_renderer::Html5Renderer;
///
/// let document = Parser::new().parse("Hello *world*").unwrap().document;
/// let html = Html5Renderer::new().render_body(&document).unwrap();
/// assert_eq!(
///     html,
///     "<div class=\"paragraph\">\n<p>Hello <strong>world</strong></p>\n</div>"
/// );
/// ```
#[derive(Default)]
pub struct Html5Renderer {
    macros: MacroRegistry,
}

impl Html5Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template for user macros of its name.
    #[must_use]
    pub fn with_macro<T: UserMacroTemplate + 'static>(mut self, template: T) -> Self {
        self.macros.register(template);
        self
    }

    /// Render the document content and its footnotes, without the page
    /// around them.
    pub fn render_body(&self, document: &Document) -> Result<String, RenderError> {
        let mut ctx = RenderContext::new(document, &self.macros);
        render_body(&mut ctx)
    }

    /// Render a complete HTML page.
    pub fn render_document(&self, document: &Document) -> Result<String, RenderError> {
        let mut ctx = RenderContext::new(document, &self.macros);
        let body = render_body(&mut ctx)?;
        page::standalone(&mut ctx, &body)
    }
}

fn render_body(ctx: &mut RenderContext<'_>) -> Result<String, RenderError> {
    let document = ctx.document();
    tracing::debug!(elements = document.elements.len(), "Rendering document");
    let mut html = render_elements(ctx, &document.elements)?;
    html.push_str(&footnotes::footnotes_block(ctx)?);
    Ok(html)
}

/// Render one node.
///
/// Errors raised below a container node are wrapped with the container's
/// kind.
pub fn render(ctx: &mut RenderContext<'_>, node: &Node) -> Result<String, RenderError> {
    let result = match node {
        Node::Preamble(preamble) => blocks::preamble(ctx, preamble),
        Node::Section(section) => blocks::section(ctx, section),
        Node::List(list) => lists::list(ctx, list),
        Node::ListItem(item) => lists::list_item(ctx, item),
        Node::Paragraph(paragraph) => blocks::paragraph(ctx, paragraph),
        Node::DelimitedBlock(block) => delimited::delimited_block(ctx, block),
        Node::LiteralBlock(block) => blocks::literal_block(block),
        Node::BlockImage(image) => blocks::block_image(image),
        Node::TableOfContentsMacro => toc::table_of_contents(ctx),
        Node::AttributeDeclaration(declaration) => {
            ctx.attributes_mut()
                .set(declaration.name.clone(), declaration.value.clone());
            Ok(String::new())
        }
        Node::AttributeReset(reset) => {
            ctx.attributes_mut().reset(&reset.name);
            Ok(String::new())
        }
        Node::BlankLine => Ok(String::new()),
        Node::FileInclusion(_) => {
            return Err(RenderError::Unsupported { kind: node.kind() });
        }
        Node::Text(_)
        | Node::QuotedText(_)
        | Node::Passthrough(_)
        | Node::CrossReference(_)
        | Node::InlineImage(_)
        | Node::ExternalLink(_)
        | Node::Footnote(_)
        | Node::FootnoteReference(_)
        | Node::AttributeSubstitution(_)
        | Node::UserMacro(_) => inline::inline_element(ctx, node),
    };
    result.map_err(|err| {
        if has_children(node) {
            err.within(node.kind())
        } else {
            err
        }
    })
}

fn has_children(node: &Node) -> bool {
    matches!(
        node,
        Node::Preamble(_)
            | Node::Section(_)
            | Node::List(_)
            | Node::ListItem(_)
            | Node::Paragraph(_)
            | Node::DelimitedBlock(_)
            | Node::QuotedText(_)
            | Node::Passthrough(_)
            | Node::ExternalLink(_)
            | Node::Footnote(_)
    )
}

/// Render block-level nodes, one per line.
///
/// Nodes that render to nothing are skipped unless blank lines are being
/// kept.
pub fn render_elements(ctx: &mut RenderContext<'_>, nodes: &[Node]) -> Result<String, RenderError> {
    let mut rendered = Vec::with_capacity(nodes.len());
    for node in nodes {
        let html = render(ctx, node)?;
        if !html.is_empty() || (node.is_blank_line() && ctx.include_blank_lines()) {
            rendered.push(html);
        }
    }
    Ok(rendered.join("\n"))
}

/// Render inline content.
pub fn render_inline(
    ctx: &mut RenderContext<'_>,
    elements: &[Node],
) -> Result<String, RenderError> {
    let mut out = String::new();
    for element in elements {
        out.push_str(&render(ctx, element)?);
    }
    Ok(out)
}

/// Render lines of inline content, joined with newlines.
fn render_lines(
    ctx: &mut RenderContext<'_>,
    lines: &[InlineElements],
) -> Result<String, RenderError> {
    let mut rendered = Vec::with_capacity(lines.len());
    for line in lines {
        rendered.push(render_inline(ctx, line)?);
    }
    Ok(rendered.join("\n"))
}

/// `<div id="..." class="...">`, the ID only when the element has one.
fn open_block(out: &mut String, class: &str, attributes: &ElementAttributes) -> fmt::Result {
    match attributes.id() {
        Some(id) => write!(out, r#"<div id="{}" class="{class}">"#, escape_html(id)),
        None => write!(out, r#"<div class="{class}">"#),
    }
}

/// Title line of a block, on its own line, when the block has one.
fn block_title(out: &mut String, attributes: &ElementAttributes) -> fmt::Result {
    match attributes.title() {
        Some(title) => write!(out, "\n<div class=\"title\">{}</div>", escape_html(title)),
        None => Ok(()),
    }
}
