//! Plain-text helpers over inline content.

use crate::node::Node;

/// Concatenated text of inline content, without markup.
///
/// Quoted text, passthroughs, links and footnote-free content contribute
/// their text; images, macros and footnotes contribute nothing.
#[must_use]
pub fn plain_text(elements: &[Node]) -> String {
    let mut out = String::new();
    collect_text(elements, &mut out);
    out
}

fn collect_text(elements: &[Node], out: &mut String) {
    for element in elements {
        match element {
            Node::Text(s) => out.push_str(&s.content),
            Node::QuotedText(q) => collect_text(&q.elements, out),
            Node::Passthrough(p) => collect_text(&p.elements, out),
            Node::ExternalLink(l) if l.text.is_empty() => out.push_str(&l.url),
            Node::ExternalLink(l) => collect_text(&l.text, out),
            Node::CrossReference(x) => out.push_str(x.label.as_deref().unwrap_or(&x.id)),
            Node::AttributeSubstitution(a) => {
                out.push('{');
                out.push_str(&a.name);
                out.push('}');
            }
            _ => {}
        }
    }
}

/// Derive an element ID from inline content.
///
/// The text is lowercased and every run of non-alphanumeric characters
/// becomes a single `_`; the result is prefixed with `_` and has no trailing
/// `_`. `Section 1` becomes `_section_1`.
#[must_use]
pub fn replace_non_alphanumerics(elements: &[Node]) -> String {
    let text = plain_text(elements);
    let mut id = String::with_capacity(text.len() + 1);
    id.push('_');
    for c in text.chars() {
        if c.is_alphanumeric() {
            id.extend(c.to_lowercase());
        } else if !id.ends_with('_') {
            id.push('_');
        }
    }
    while id.len() > 1 && id.ends_with('_') {
        id.pop();
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{QuotedText, QuotedTextKind};

    #[test]
    fn test_replace_non_alphanumerics() {
        assert_eq!(replace_non_alphanumerics(&vec![Node::text("Section 1")]), "_section_1");
        assert_eq!(replace_non_alphanumerics(&vec![Node::text("Chapter A")]), "_chapter_a");
        assert_eq!(
            replace_non_alphanumerics(&vec![Node::text("  What's new?  ")]),
            "_what_s_new"
        );
    }

    #[test]
    fn test_replace_non_alphanumerics_uses_quoted_content() {
        let title = vec![
            Node::text("a "),
            Node::QuotedText(QuotedText {
                kind: QuotedTextKind::Bold,
                elements: vec![Node::text("Bold")],
            }),
            Node::text(" title"),
        ];
        assert_eq!(replace_non_alphanumerics(&title), "_a_bold_title");
    }
}
