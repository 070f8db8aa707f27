//! Preamble, sections, paragraphs, literal blocks and block images.

use std::fmt::Write;

use adoc_types::{
    ATTR_LINK, AdmonitionKind, BlockImage, ElementAttributes, ImageMacro, LiteralBlock,
    Paragraph, Preamble, Section,
};

use super::{block_title, open_block, render_elements, render_inline, render_lines};
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::escape::escape_html;

pub(super) fn preamble(
    ctx: &mut RenderContext<'_>,
    preamble: &Preamble,
) -> Result<String, RenderError> {
    let content = render_elements(ctx, &preamble.elements)?;
    if content.is_empty() {
        return Ok(String::new());
    }
    Ok(format!(
        "<div id=\"preamble\">\n<div class=\"sectionbody\">\n{content}\n</div>\n</div>"
    ))
}

/// `sect1` sections wrap their content in a `sectionbody` div; deeper ones
/// do not.
pub(super) fn section(
    ctx: &mut RenderContext<'_>,
    section: &Section,
) -> Result<String, RenderError> {
    let level = section.level.max(1);
    let heading = level + 1;
    let title = render_inline(ctx, &section.title.elements)?;
    let content = render_elements(ctx, &section.elements)?;

    let mut out = String::new();
    write!(
        out,
        "<div class=\"sect{level}\">\n<h{heading} id=\"{}\">{title}</h{heading}>",
        escape_html(&section.title.id)
    )?;
    if level == 1 {
        out.push_str("\n<div class=\"sectionbody\">");
    }
    if !content.is_empty() {
        write!(out, "\n{content}")?;
    }
    if level == 1 {
        out.push_str("\n</div>");
    }
    out.push_str("\n</div>");
    Ok(out)
}

pub(super) fn paragraph(
    ctx: &mut RenderContext<'_>,
    paragraph: &Paragraph,
) -> Result<String, RenderError> {
    let content = render_lines(ctx, &paragraph.lines)?;
    if let Some(kind) = paragraph.attributes.admonition() {
        return admonition(ctx, kind, &paragraph.attributes, &content);
    }
    let mut out = String::new();
    open_block(&mut out, "paragraph", &paragraph.attributes)?;
    block_title(&mut out, &paragraph.attributes)?;
    write!(out, "\n<p>{content}</p>\n</div>")?;
    Ok(out)
}

/// Admonition table, shared by admonition paragraphs and example blocks.
///
/// The icon cell shows a font icon when the `icons` attribute is `font`,
/// otherwise the admonition's title.
pub(super) fn admonition(
    ctx: &RenderContext<'_>,
    kind: AdmonitionKind,
    attributes: &ElementAttributes,
    content: &str,
) -> Result<String, RenderError> {
    let mut out = String::new();
    open_block(
        &mut out,
        &format!("admonitionblock {}", kind.class_name()),
        attributes,
    )?;
    out.push_str("\n<table>\n<tr>\n<td class=\"icon\">\n");
    if ctx.attributes().get("icons") == Some("font") {
        write!(
            out,
            r#"<i class="fa icon-{}" title="{}"></i>"#,
            kind.class_name(),
            kind.title()
        )?;
    } else {
        write!(out, r#"<div class="title">{}</div>"#, kind.title())?;
    }
    out.push_str("\n</td>\n<td class=\"content\">\n");
    if let Some(title) = attributes.title() {
        writeln!(out, r#"<div class="title">{}</div>"#, escape_html(title))?;
    }
    write!(out, "{content}\n</td>\n</tr>\n</table>\n</div>")?;
    Ok(out)
}

pub(super) fn literal_block(block: &LiteralBlock) -> Result<String, RenderError> {
    let mut out = String::new();
    open_block(&mut out, "literalblock", &block.attributes)?;
    block_title(&mut out, &block.attributes)?;
    write!(
        out,
        "\n<div class=\"content\">\n<pre>{}</pre>\n</div>\n</div>",
        escape_html(&block.content)
    )?;
    Ok(out)
}

pub(super) fn block_image(image: &BlockImage) -> Result<String, RenderError> {
    let mut out = String::new();
    open_block(&mut out, "imageblock", &image.attributes)?;
    out.push_str("\n<div class=\"content\">\n");
    let img = img_tag(&image.image)?;
    match image.attributes.get_str(ATTR_LINK) {
        Some(link) => write!(
            out,
            r#"<a class="image" href="{}">{img}</a>"#,
            escape_html(link)
        )?,
        None => out.push_str(&img),
    }
    out.push_str("\n</div>");
    block_title(&mut out, &image.attributes)?;
    out.push_str("\n</div>");
    Ok(out)
}

/// `<img>` with the optional size attributes.
pub(super) fn img_tag(image: &ImageMacro) -> Result<String, RenderError> {
    let mut out = String::new();
    write!(
        out,
        r#"<img src="{}" alt="{}""#,
        escape_html(&image.path),
        escape_html(&image.alt)
    )?;
    if let Some(width) = &image.width {
        write!(out, r#" width="{}""#, escape_html(width))?;
    }
    if let Some(height) = &image.height {
        write!(out, r#" height="{}""#, escape_html(height))?;
    }
    out.push('>');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use adoc_parser::Parser;
    use adoc_types::Document;
    use pretty_assertions::assert_eq;

    use crate::Html5Renderer;

    fn render(source: &str) -> String {
        let document: Document = Parser::new().parse(source).unwrap().document;
        Html5Renderer::new().render_body(&document).unwrap()
    }

    #[test]
    fn test_paragraph_with_title_and_id() {
        assert_eq!(
            render("[#intro]\n.Introduction\nfirst line\nsecond line"),
            "<div id=\"intro\" class=\"paragraph\">\n<div class=\"title\">Introduction</div>\n<p>first line\nsecond line</p>\n</div>"
        );
    }

    #[test]
    fn test_escaped_paragraph() {
        assert_eq!(
            render("import \"fmt\" & <stuff>"),
            "<div class=\"paragraph\">\n<p>import &#34;fmt&#34; &amp; &lt;stuff&gt;</p>\n</div>"
        );
    }

    #[test]
    fn test_preamble_and_sections() {
        assert_eq!(
            render("= Doc\n\npreamble\n\n== Chapter A\n\ncontent\n\n=== Details\n\nmore"),
            "<div id=\"preamble\">
<div class=\"sectionbody\">
<div class=\"paragraph\">
<p>preamble</p>
</div>
</div>
</div>
<div class=\"sect1\">
<h2 id=\"_chapter_a\">Chapter A</h2>
<div class=\"sectionbody\">
<div class=\"paragraph\">
<p>content</p>
</div>
<div class=\"sect2\">
<h3 id=\"_details\">Details</h3>
<div class=\"paragraph\">
<p>more</p>
</div>
</div>
</div>
</div>"
        );
    }

    #[test]
    fn test_admonition_paragraph() {
        assert_eq!(
            render("NOTE: a note"),
            "<div class=\"admonitionblock note\">
<table>
<tr>
<td class=\"icon\">
<div class=\"title\">Note</div>
</td>
<td class=\"content\">
a note
</td>
</tr>
</table>
</div>"
        );
    }

    #[test]
    fn test_admonition_font_icons() {
        let html = render(":icons: font\n\nWARNING: careful");
        assert!(html.contains(r#"<i class="fa icon-warning" title="Warning"></i>"#));
    }

    #[test]
    fn test_literal_block() {
        assert_eq!(
            render("  indented <code>\n  more"),
            "<div class=\"literalblock\">\n<div class=\"content\">\n<pre>indented &lt;code&gt;\nmore</pre>\n</div>\n</div>"
        );
    }

    #[test]
    fn test_block_image() {
        assert_eq!(
            render("image::images/tiger.png[Tiger, 200, 100]"),
            "<div class=\"imageblock\">\n<div class=\"content\">\n<img src=\"images/tiger.png\" alt=\"Tiger\" width=\"200\" height=\"100\">\n</div>\n</div>"
        );
    }
}
