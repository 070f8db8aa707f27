//! Unordered lists.

use std::fmt::Write;

use adoc_types::{List, ListItem};

use super::{block_title, render_lines};
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::escape::escape_html;

pub(super) fn list(ctx: &mut RenderContext<'_>, list: &List) -> Result<String, RenderError> {
    let mut items = Vec::with_capacity(list.items.len());
    for item in &list.items {
        items.push(list_item(ctx, item)?);
    }
    let mut out = String::new();
    match list.attributes.id() {
        Some(id) => write!(out, r#"<div id="{}" class="ulist">"#, escape_html(id))?,
        None => out.push_str(r#"<div class="ulist">"#),
    }
    block_title(&mut out, &list.attributes)?;
    write!(out, "\n<ul>\n{}\n</ul>\n</div>", items.join("\n"))?;
    Ok(out)
}

pub(super) fn list_item(
    ctx: &mut RenderContext<'_>,
    item: &ListItem,
) -> Result<String, RenderError> {
    let content = render_lines(ctx, &item.lines)?;
    let mut out = format!("<li>\n<p>{content}</p>");
    if let Some(children) = &item.children {
        write!(out, "\n{}", list(ctx, children)?)?;
    }
    out.push_str("\n</li>");
    Ok(out)
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
    fn test_flat_list() {
        assert_eq!(
            render("* one\n* _two_"),
            "<div class=\"ulist\">
<ul>
<li>
<p>one</p>
</li>
<li>
<p><em>two</em></p>
</li>
</ul>
</div>"
        );
    }

    #[test]
    fn test_nested_list_with_title() {
        assert_eq!(
            render("[#steps]\n.Steps\n* first\n** nested\n* second"),
            "<div id=\"steps\" class=\"ulist\">
<div class=\"title\">Steps</div>
<ul>
<li>
<p>first</p>
<div class=\"ulist\">
<ul>
<li>
<p>nested</p>
</li>
</ul>
</div>
</li>
<li>
<p>second</p>
</li>
</ul>
</div>"
        );
    }

    #[test]
    fn test_item_continuation_lines() {
        let html = render("* first line\ncontinued");
        assert!(html.contains("<p>first line\ncontinued</p>"));
    }
}
