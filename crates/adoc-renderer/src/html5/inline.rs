//! Inline elements.

use std::fmt::Write;

use adoc_types::{
    CrossReference, ExternalLink, Node, PassthroughKind, QuotedTextKind, UserMacro,
    UserMacroKind, plain_text,
};

use super::{blocks, footnotes, render_inline};
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::escape::escape_html;

pub(super) fn inline_element(
    ctx: &mut RenderContext<'_>,
    node: &Node,
) -> Result<String, RenderError> {
    match node {
        Node::Text(text) => Ok(escape_html(&text.content)),
        Node::QuotedText(quoted) => {
            let tag = match quoted.kind {
                QuotedTextKind::Bold => "strong",
                QuotedTextKind::Italic => "em",
                QuotedTextKind::Monospace => "code",
            };
            let content = render_inline(ctx, &quoted.elements)?;
            Ok(format!("<{tag}>{content}</{tag}>"))
        }
        Node::Passthrough(passthrough) => {
            let text = plain_text(&passthrough.elements);
            Ok(match passthrough.kind {
                PassthroughKind::SinglePlus => escape_html(&text),
                PassthroughKind::TriplePlus | PassthroughKind::Macro => text,
            })
        }
        Node::CrossReference(xref) => cross_reference(ctx, xref),
        Node::InlineImage(image) => Ok(format!(
            "<span class=\"image\">{}</span>",
            blocks::img_tag(&image.image)?
        )),
        Node::ExternalLink(link) => external_link(ctx, link),
        Node::Footnote(_) | Node::FootnoteReference(_) if ctx.within_title_copy() => {
            Ok(String::new())
        }
        Node::Footnote(note) => footnotes::footnote(ctx, note),
        Node::FootnoteReference(note) => footnotes::footnote_reference(ctx, note),
        Node::AttributeSubstitution(substitution) => {
            Ok(match ctx.attributes().get(&substitution.name) {
                Some(value) => escape_html(value),
                None => format!("{{{}}}", substitution.name),
            })
        }
        Node::UserMacro(user_macro) => user_macro_element(ctx, user_macro),
        other => Err(RenderError::Unsupported { kind: other.kind() }),
    }
}

/// The label is the one given, else the title of the referenced section,
/// else the ID in brackets.
///
/// Inside a title copy, which already sits in a link, only the label is
/// written and section titles are taken as plain text.
fn cross_reference(
    ctx: &mut RenderContext<'_>,
    xref: &CrossReference,
) -> Result<String, RenderError> {
    let target = ctx.document().element_references.get(&xref.id);
    let label = match (&xref.label, target) {
        (Some(label), _) => escape_html(label),
        (None, Some(Node::Section(section))) if ctx.within_title_copy() => {
            escape_html(&plain_text(&section.title.elements))
        }
        (None, Some(Node::Section(section))) => {
            let mut scope = ctx.scope().with_within_title_copy(true);
            render_inline(&mut scope, &section.title.elements)?
        }
        (None, _) => format!("[{}]", escape_html(&xref.id)),
    };
    if ctx.within_title_copy() {
        return Ok(label);
    }
    Ok(format!(
        r##"<a href="#{}">{label}</a>"##,
        escape_html(&xref.id)
    ))
}

fn external_link(ctx: &mut RenderContext<'_>, link: &ExternalLink) -> Result<String, RenderError> {
    let url = escape_html(&link.url);
    let mut out = String::new();
    if link.text.is_empty() {
        write!(out, r#"<a href="{url}" class="bare">{url}</a>"#)?;
    } else {
        let text = render_inline(ctx, &link.text)?;
        write!(out, r#"<a href="{url}">{text}</a>"#)?;
    }
    Ok(out)
}

/// Registered templates render the macro; unknown macros show their source.
fn user_macro_element(
    ctx: &mut RenderContext<'_>,
    user_macro: &UserMacro,
) -> Result<String, RenderError> {
    if let Some(template) = ctx.macros().get(&user_macro.name) {
        return template.render(ctx, user_macro);
    }
    tracing::debug!(name = %user_macro.name, "No template for user macro");
    let text = escape_html(&user_macro.raw_text);
    Ok(match user_macro.kind {
        UserMacroKind::Inline => text,
        UserMacroKind::Block => format!("<div class=\"paragraph\">\n<p>{text}</p>\n</div>"),
    })
}

#[cfg(test)]
mod tests {
    use adoc_parser::Parser;
    use adoc_types::UserMacro;
    use pretty_assertions::assert_eq;

    use crate::{Html5Renderer, RenderContext, RenderError, UserMacroTemplate};

    fn render_with(renderer: &Html5Renderer, source: &str) -> String {
        let document = Parser::new().parse(source).unwrap().document;
        renderer.render_body(&document).unwrap()
    }

    /// Paragraph content without the wrapper.
    fn render(source: &str) -> String {
        let html = render_with(&Html5Renderer::new(), source);
        html.strip_prefix("<div class=\"paragraph\">\n<p>")
            .and_then(|s| s.strip_suffix("</p>\n</div>"))
            .unwrap_or(&html)
            .to_owned()
    }

    struct Hello;

    impl UserMacroTemplate for Hello {
        fn name(&self) -> &str {
            "hello"
        }

        fn render(&self, _: &RenderContext<'_>, m: &UserMacro) -> Result<String, RenderError> {
            Ok(format!("<span>Hello, {}!</span>", m.value))
        }
    }

    #[test]
    fn test_quoted_text() {
        assert_eq!(
            render("*bold* _italic_ `mono` *_nested_*"),
            "<strong>bold</strong> <em>italic</em> <code>mono</code> <strong><em>nested</em></strong>"
        );
    }

    #[test]
    fn test_passthroughs() {
        assert_eq!(
            render("+++<b>raw</b>+++ pass:[<i>x</i>] +<kept>+"),
            "<b>raw</b> <i>x</i> &lt;kept&gt;"
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            render("https://example.com[Example] and https://example.org"),
            r#"<a href="https://example.com">Example</a> and <a href="https://example.org" class="bare">https://example.org</a>"#
        );
    }

    #[test]
    fn test_cross_reference_uses_section_title() {
        let html = render_with(
            &Html5Renderer::new(),
            "== Some *Title*\n\nsee <<_some_title>> and <<_some_title,here>> or <<unknown>>",
        );
        assert!(html.contains(r##"<a href="#_some_title">Some <strong>Title</strong></a>"##));
        assert!(html.contains(r##"<a href="#_some_title">here</a>"##));
        assert!(html.contains(r##"<a href="#unknown">[unknown]</a>"##));
    }

    #[test]
    fn test_self_referencing_section_title() {
        let html = render_with(
            &Html5Renderer::new(),
            "[[loop]]\n== Title <<loop>>\n\nsee <<loop>>",
        );
        assert!(html.contains(r##"<h2 id="loop">Title <a href="#loop">Title Title loop</a></h2>"##));
        assert!(html.contains(r##"see <a href="#loop">Title Title loop</a>"##));
    }

    #[test]
    fn test_cross_reference_label_drops_footnotes() {
        let html = render_with(
            &Html5Renderer::new(),
            "== A footnote:[x]\n\nsee <<_a>>",
        );
        assert!(html.contains(r##"see <a href="#_a">A </a>"##));
        assert_eq!(html.matches("id=\"_footnoteref_1\"").count(), 1);
    }

    #[test]
    fn test_inline_image() {
        assert_eq!(
            render("icon image:icons/ok.png[OK]"),
            r#"icon <span class="image"><img src="icons/ok.png" alt="OK"></span>"#
        );
    }

    #[test]
    fn test_attribute_substitution_follows_declarations() {
        let html = render_with(
            &Html5Renderer::new(),
            ":product: Widget\n\n{product} v1\n\n:product!:\n\n{product} v2",
        );
        assert!(html.contains("<p>Widget v1</p>"));
        assert!(html.contains("<p>{product} v2</p>"));
    }

    #[test]
    fn test_user_macro_with_template() {
        let renderer = Html5Renderer::new().with_macro(Hello);
        assert_eq!(
            render_with(&renderer, "say hello:world[]"),
            "<div class=\"paragraph\">\n<p>say <span>Hello, world!</span></p>\n</div>"
        );
    }

    #[test]
    fn test_user_macro_without_template() {
        assert_eq!(render("say hello:world[]"), "say hello:world[]");
        assert_eq!(
            render_with(&Html5Renderer::new(), "hello::world[]"),
            "<div class=\"paragraph\">\n<p>hello::world[]</p>\n</div>"
        );
    }
}
