//! Table of contents.

use std::fmt::Write;

use adoc_types::{Node, Section};

use super::render_inline;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::escape::escape_html;

const DEFAULT_TITLE: &str = "Table of Contents";
const DEFAULT_LEVELS: usize = 2;

/// Nested links to the document's sections down to `toclevels`.
///
/// Renders nothing inside delimited blocks or when there are no sections.
pub(super) fn table_of_contents(ctx: &mut RenderContext<'_>) -> Result<String, RenderError> {
    if ctx.within_delimited_block() {
        return Ok(String::new());
    }
    let levels = ctx
        .attributes()
        .get("toclevels")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_LEVELS);
    let document = ctx.document();
    let Some(entries) = section_list(ctx, &document.elements, 1, levels)? else {
        return Ok(String::new());
    };
    let title = escape_html(ctx.attributes().get("toc-title").unwrap_or(DEFAULT_TITLE));
    Ok(format!(
        "<div id=\"toc\" class=\"toc\">\n<div id=\"toctitle\">{title}</div>\n{entries}\n</div>"
    ))
}

fn section_list(
    ctx: &mut RenderContext<'_>,
    elements: &[Node],
    depth: usize,
    levels: usize,
) -> Result<Option<String>, RenderError> {
    if depth > levels {
        return Ok(None);
    }
    let sections: Vec<&Section> = elements
        .iter()
        .filter_map(|node| match node {
            Node::Section(section) => Some(section),
            _ => None,
        })
        .collect();
    if sections.is_empty() {
        return Ok(None);
    }
    let mut out = String::new();
    write!(out, "<ul class=\"sectlevel{depth}\">")?;
    for section in sections {
        let title = {
            let mut scope = ctx.scope().with_within_title_copy(true);
            render_inline(&mut scope, &section.title.elements)?
        };
        write!(
            out,
            r##"
<li><a href="#{}">{title}</a>"##,
            escape_html(&section.title.id)
        )?;
        if let Some(children) = section_list(ctx, &section.elements, depth + 1, levels)? {
            write!(out, "\n{children}\n")?;
        }
        out.push_str("</li>");
    }
    out.push_str("\n</ul>");
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use adoc_parser::Parser;
    use pretty_assertions::assert_eq;

    use crate::Html5Renderer;

    fn render(source: &str) -> String {
        let document = Parser::new().parse(source).unwrap().document;
        Html5Renderer::new().render_body(&document).unwrap()
    }

    #[test]
    fn test_toc_lists_sections_to_default_depth() {
        let html = render(
            "= Doc\n:toc:\n\n== One\n\n=== One A\n\n==== Too deep\n\n== Two",
        );
        let toc = html.split("\n<div class=\"sect1\">").next().unwrap();
        assert_eq!(
            toc,
            r##"<div id="toc" class="toc">
<div id="toctitle">Table of Contents</div>
<ul class="sectlevel1">
<li><a href="#_one">One</a>
<ul class="sectlevel2">
<li><a href="#_one_a">One A</a></li>
</ul>
</li>
<li><a href="#_two">Two</a></li>
</ul>
</div>"##
        );
    }

    #[test]
    fn test_toc_title_and_levels_from_attributes() {
        let html = render(
            "= Doc\n:toc:\n:toc-title: Contents\n:toclevels: 1\n\n== One\n\n=== One A",
        );
        assert!(html.contains("<div id=\"toctitle\">Contents</div>"));
        assert!(!html.contains("sectlevel2"));
    }

    #[test]
    fn test_toc_macro_placement() {
        let html = render("= Doc\n:toc: macro\n\nintro\n\ntoc::[]\n\n== One");
        let toc = html.find("id=\"toc\"").unwrap();
        assert!(html.find("<p>intro</p>").unwrap() < toc);
    }

    #[test]
    fn test_toc_entries_drop_footnotes_and_links() {
        let html = render("= Doc\n:toc:\n\n== A footnote:[x]\n\n== B <<_a>>");
        assert!(html.contains(r##"<li><a href="#_a">A </a></li>"##));
        assert!(html.contains(r##"<li><a href="#_b_a">B A </a></li>"##));
        assert_eq!(html.matches("id=\"_footnoteref_1\"").count(), 1);
        assert_eq!(html.matches("id=\"_footnotedef_1\"").count(), 1);
    }

    #[test]
    fn test_no_toc_without_sections() {
        assert_eq!(render(":toc:\n\nplain"), "<div class=\"paragraph\">\n<p>plain</p>\n</div>");
    }
}
