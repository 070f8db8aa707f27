//! Constructors for block and inline nodes.

use std::path::Path;

use adoc_types::{
    ATTR_ADMONITION, ATTR_ID, ATTR_LANGUAGE, ATTR_QUOTE_AUTHOR, ATTR_QUOTE_TITLE, ATTR_STYLE,
    AdmonitionKind, AttributeDeclaration, AttributeReset, AttributeSubstitution, BlockImage,
    CrossReference, DelimitedBlock, DelimitedBlockKind, ElementAttributes, ExternalLink,
    FileInclusion, Footnote, FootnoteReference, Fragment, ImageMacro, InlineImage, LiteralBlock,
    Node, Paragraph, Passthrough, PassthroughKind, QuotedText, QuotedTextKind, Section,
    SectionTitle, UserMacro, UserMacroKind, replace_non_alphanumerics,
};

use super::fragments::{StringifyOption, block_nodes, filter_unrelevant_elements, merge, stringify};
use crate::error::BuildError;

/// Build element attributes from an attribute list.
///
/// Named attributes are groups of `[key, value...]`; any other fragment is a
/// positional attribute stored under its 1-based position.
pub fn new_element_attributes(fragments: Vec<Fragment>) -> Result<ElementAttributes, BuildError> {
    let mut attributes = ElementAttributes::new();
    for (index, fragment) in fragments.into_iter().enumerate() {
        match fragment {
            Fragment::Group(mut parts) if !parts.is_empty() => {
                let key = stringify(vec![parts.remove(0)], &[StringifyOption::Trim])?;
                let value = stringify(parts, &[StringifyOption::Trim])?;
                attributes.insert(&key, value);
            }
            positional => {
                let value = stringify(vec![positional], &[StringifyOption::Trim])?;
                attributes.insert(&(index + 1).to_string(), value);
            }
        }
    }
    Ok(attributes)
}

/// Interpret a block attribute line such as `[source,go]` or `[quote, A, B]`.
///
/// The first positional attribute selects the style; the following ones are
/// read according to it.
pub fn new_block_attributes(fragments: Vec<Fragment>) -> Result<ElementAttributes, BuildError> {
    let mut attributes = new_element_attributes(fragments)?;
    let Some(style) = attributes.get_str("1").map(str::to_owned) else {
        return Ok(attributes);
    };
    attributes.remove("1");
    let second = attributes.remove("2");
    let third = attributes.remove("3");

    if let Some(id) = style.strip_prefix('#') {
        attributes.insert(ATTR_ID, id);
    } else if let Some(kind) = AdmonitionKind::from_label(&style) {
        attributes.insert(ATTR_ADMONITION, kind);
    } else {
        match style.as_str() {
            "source" => {
                if let Some(language) = second {
                    attributes.insert(ATTR_LANGUAGE, language);
                }
            }
            "quote" | "verse" => {
                if let Some(author) = second {
                    attributes.insert(ATTR_QUOTE_AUTHOR, author);
                }
                if let Some(title) = third {
                    attributes.insert(ATTR_QUOTE_TITLE, title);
                }
            }
            _ => {}
        }
        attributes.insert(ATTR_STYLE, style);
    }
    Ok(attributes)
}

/// `[[id]]` anchor line.
pub fn new_anchor(id: Vec<Fragment>) -> Result<ElementAttributes, BuildError> {
    let id = stringify(id, &[StringifyOption::Trim])?;
    Ok(ElementAttributes::new().with(ATTR_ID, id))
}

/// Section heading. The ID is the explicit `id` attribute or derived from
/// the title.
pub fn new_section(
    level: usize,
    title: Vec<Fragment>,
    mut attributes: ElementAttributes,
) -> Result<Node, BuildError> {
    let elements = merge(title);
    if elements.is_empty() {
        return Err(BuildError::malformed("section title", "empty title"));
    }
    let id = match attributes.remove(ATTR_ID) {
        Some(value) => value
            .as_str()
            .map(str::to_owned)
            .unwrap_or_else(|| replace_non_alphanumerics(&elements)),
        None => replace_non_alphanumerics(&elements),
    };
    Ok(Node::Section(Section {
        level,
        title: SectionTitle { id, elements },
        attributes,
        elements: Vec::new(),
    }))
}

/// Paragraph from lines of inline fragments.
pub fn new_paragraph(
    lines: Vec<Vec<Fragment>>,
    attributes: ElementAttributes,
) -> Result<Node, BuildError> {
    if lines.is_empty() {
        return Err(BuildError::malformed("paragraph lines", "no lines"));
    }
    Ok(Node::Paragraph(Paragraph {
        attributes,
        lines: lines.into_iter().map(merge).collect(),
    }))
}

/// Admonition paragraph such as `NOTE: text`.
pub fn new_admonition_paragraph(
    kind: AdmonitionKind,
    lines: Vec<Vec<Fragment>>,
    attributes: ElementAttributes,
) -> Result<Node, BuildError> {
    new_paragraph(lines, attributes.with(ATTR_ADMONITION, kind))
}

/// Delimited block. Compound kinds drop blank lines; raw and verse kinds
/// keep them.
pub fn new_delimited_block(
    kind: DelimitedBlockKind,
    attributes: ElementAttributes,
    elements: Vec<Fragment>,
) -> Result<Node, BuildError> {
    let elements = match kind {
        DelimitedBlockKind::Example | DelimitedBlockKind::Quote | DelimitedBlockKind::Sidebar => {
            filter_unrelevant_elements(elements)?
        }
        _ => raw_lines(elements)?,
    };
    Ok(Node::DelimitedBlock(DelimitedBlock {
        kind,
        attributes,
        elements,
    }))
}

/// Raw text fragments become one text node each; nodes are kept.
pub fn raw_lines(fragments: Vec<Fragment>) -> Result<Vec<Node>, BuildError> {
    let mut nodes = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match fragment {
            Fragment::Text(line) => nodes.push(Node::text(line)),
            Fragment::Bytes(bytes) => nodes.push(Node::text(String::from_utf8_lossy(&bytes))),
            other => nodes.extend(block_nodes(vec![other])?),
        }
    }
    Ok(nodes)
}

/// Literal paragraph. The common indentation of all lines is removed.
pub fn new_literal_block(
    lines: &[&str],
    attributes: ElementAttributes,
) -> Result<Node, BuildError> {
    if lines.is_empty() {
        return Err(BuildError::malformed("literal lines", "no lines"));
    }
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let content = lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Node::LiteralBlock(LiteralBlock {
        attributes,
        content,
    }))
}

/// Image target with its size and alternate text.
///
/// Positional attributes are alt, width and height; `alt` defaults to the
/// file stem.
pub fn new_image_macro(path: Vec<Fragment>, attributes: &mut ElementAttributes) -> Result<ImageMacro, BuildError> {
    let path = stringify(path, &[StringifyOption::Trim])?;
    if path.is_empty() {
        return Err(BuildError::malformed("image path", "empty path"));
    }
    let mut take = |named: &str, position: &str| -> Option<String> {
        let value = attributes
            .remove(named)
            .or_else(|| attributes.remove(position))?;
        value.as_str().filter(|v| !v.is_empty()).map(str::to_owned)
    };
    let alt = take("alt", "1").unwrap_or_else(|| {
        Path::new(&path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let width = take("width", "2");
    let height = take("height", "3");
    Ok(ImageMacro {
        path,
        alt,
        width,
        height,
    })
}

pub fn new_block_image(
    path: Vec<Fragment>,
    mut attributes: ElementAttributes,
) -> Result<Node, BuildError> {
    let image = new_image_macro(path, &mut attributes)?;
    Ok(Node::BlockImage(BlockImage { attributes, image }))
}

pub fn new_inline_image(
    path: Vec<Fragment>,
    mut attributes: ElementAttributes,
) -> Result<Node, BuildError> {
    let image = new_image_macro(path, &mut attributes)?;
    Ok(Node::InlineImage(InlineImage { image }))
}

/// User macro, inline (`name:value[...]`) or block (`name::value[...]`).
pub fn new_user_macro(
    kind: UserMacroKind,
    name: &str,
    value: &str,
    attributes: ElementAttributes,
    raw_text: &str,
) -> Result<Node, BuildError> {
    if name.is_empty() {
        return Err(BuildError::malformed("macro name", raw_text));
    }
    Ok(Node::UserMacro(UserMacro {
        kind,
        name: name.to_owned(),
        value: value.to_owned(),
        attributes,
        raw_text: raw_text.to_owned(),
    }))
}

pub fn new_file_inclusion(
    path: Vec<Fragment>,
    attributes: ElementAttributes,
    raw_text: &str,
) -> Result<Node, BuildError> {
    let path = stringify(path, &[StringifyOption::Trim])?;
    if path.is_empty() {
        return Err(BuildError::malformed("include path", raw_text));
    }
    Ok(Node::FileInclusion(FileInclusion {
        path,
        attributes,
        raw_text: raw_text.to_owned(),
    }))
}

pub fn new_attribute_declaration(
    name: Vec<Fragment>,
    value: Vec<Fragment>,
) -> Result<Node, BuildError> {
    let name = stringify(name, &[StringifyOption::Trim])?;
    let value = stringify(value, &[StringifyOption::Trim])?;
    Ok(Node::AttributeDeclaration(AttributeDeclaration { name, value }))
}

pub fn new_attribute_reset(name: Vec<Fragment>) -> Result<Node, BuildError> {
    let name = stringify(name, &[StringifyOption::Trim])?;
    Ok(Node::AttributeReset(AttributeReset { name }))
}

pub fn new_quoted_text(kind: QuotedTextKind, content: Vec<Fragment>) -> Node {
    Node::QuotedText(QuotedText {
        kind,
        elements: merge(content),
    })
}

pub fn new_passthrough(kind: PassthroughKind, content: Vec<Fragment>) -> Node {
    Node::Passthrough(Passthrough {
        kind,
        elements: merge(content),
    })
}

pub fn new_cross_reference(id: &str, label: Option<&str>) -> Node {
    Node::CrossReference(CrossReference {
        id: id.trim().to_owned(),
        label: label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned),
    })
}

pub fn new_external_link(url: &str, text: Vec<Fragment>) -> Node {
    Node::ExternalLink(ExternalLink {
        url: url.to_owned(),
        text: merge(text),
    })
}

/// Footnote with content, optionally named for later references.
pub fn new_footnote(ref_name: Option<&str>, content: Vec<Fragment>) -> Node {
    Node::Footnote(Footnote {
        ref_name: ref_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned),
        elements: merge(content),
        index: None,
    })
}

pub fn new_footnote_reference(name: &str) -> Node {
    Node::FootnoteReference(FootnoteReference {
        name: name.trim().to_owned(),
    })
}

pub fn new_attribute_substitution(name: &str) -> Node {
    Node::AttributeSubstitution(AttributeSubstitution {
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(key: &str, value: &str) -> Fragment {
        Fragment::Group(vec![key.into(), value.into()])
    }

    #[test]
    fn test_element_attributes_named_and_positional() {
        let attrs =
            new_element_attributes(vec![named("key1", "value1"), Fragment::from(" pos ")]).unwrap();

        assert_eq!(
            attrs,
            ElementAttributes::new()
                .with("key1", "value1")
                .with("2", "pos")
        );
    }

    #[test]
    fn test_block_attributes_source() {
        let attrs = new_block_attributes(vec!["source".into(), "go".into()]).unwrap();
        assert_eq!(attrs.get_str(ATTR_STYLE), Some("source"));
        assert_eq!(attrs.get_str(ATTR_LANGUAGE), Some("go"));
    }

    #[test]
    fn test_block_attributes_quote_attribution() {
        let attrs =
            new_block_attributes(vec!["quote".into(), "john doe".into(), "quote title".into()])
                .unwrap();
        assert_eq!(attrs.get_str(ATTR_QUOTE_AUTHOR), Some("john doe"));
        assert_eq!(attrs.get_str(ATTR_QUOTE_TITLE), Some("quote title"));
    }

    #[test]
    fn test_block_attributes_admonition() {
        let attrs = new_block_attributes(vec!["NOTE".into()]).unwrap();
        assert_eq!(attrs.admonition(), Some(AdmonitionKind::Note));
        assert!(!attrs.contains(ATTR_STYLE));
    }

    #[test]
    fn test_section_id_derived_from_title() {
        let Node::Section(section) =
            new_section(1, vec!["Section ".into(), "1".into()], ElementAttributes::new()).unwrap()
        else {
            panic!("expected section");
        };
        assert_eq!(section.title.id, "_section_1");
        assert_eq!(section.title.elements, vec![Node::text("Section 1")]);
    }

    #[test]
    fn test_section_explicit_id_wins() {
        let Node::Section(section) = new_section(
            1,
            vec!["Intro".into()],
            ElementAttributes::new().with(ATTR_ID, "custom"),
        )
        .unwrap() else {
            panic!("expected section");
        };
        assert_eq!(section.title.id, "custom");
        assert!(section.attributes.is_empty());
    }

    #[test]
    fn test_literal_block_removes_common_indent() {
        let Node::LiteralBlock(block) =
            new_literal_block(&["  a", "    b"], ElementAttributes::new()).unwrap()
        else {
            panic!("expected literal block");
        };
        assert_eq!(block.content, "a\n  b");
    }

    #[test]
    fn test_image_macro_positional_attributes() {
        let mut attrs = ElementAttributes::new()
            .with("1", "the alt")
            .with("2", "200")
            .with("link", "https://example.com");

        let image = new_image_macro(vec!["images/foo.png".into()], &mut attrs).unwrap();

        assert_eq!(image.alt, "the alt");
        assert_eq!(image.width.as_deref(), Some("200"));
        assert_eq!(image.height, None);
        assert_eq!(attrs, ElementAttributes::new().with("link", "https://example.com"));
    }

    #[test]
    fn test_image_macro_default_alt() {
        let mut attrs = ElementAttributes::new();
        let image = new_image_macro(vec!["images/foo.png".into()], &mut attrs).unwrap();
        assert_eq!(image.alt, "foo");
    }

    #[test]
    fn test_delimited_block_raw_lines() {
        let Node::DelimitedBlock(block) = new_delimited_block(
            DelimitedBlockKind::Listing,
            ElementAttributes::new(),
            vec!["a".into(), Node::BlankLine.into(), "b".into()],
        )
        .unwrap() else {
            panic!("expected delimited block");
        };
        assert_eq!(
            block.elements,
            vec![Node::text("a"), Node::BlankLine, Node::text("b")]
        );
    }

    #[test]
    fn test_compound_block_drops_blank_lines() {
        let Node::DelimitedBlock(block) = new_delimited_block(
            DelimitedBlockKind::Example,
            ElementAttributes::new(),
            vec![Node::BlankLine.into(), Node::TableOfContentsMacro.into()],
        )
        .unwrap() else {
            panic!("expected delimited block");
        };
        assert_eq!(block.elements, vec![Node::TableOfContentsMacro]);
    }
}
