//! Whole-document passes over the nested tree.

use std::convert::Infallible;

use adoc_types::{
    Document, DocumentAttributes, DocumentHeader, ElementReferences, Footnote,
    FootnoteReferences, FrontMatter, InlineElements, Node, Preamble, walk_all, walk_mut,
};

use crate::builder::header_attributes;
use crate::diagnostics::Diagnostics;
use crate::error::BuildError;

/// Document attributes in effect before the body.
///
/// Later sources override earlier ones: `defaults`, then front matter, then
/// the header.
#[must_use]
pub fn assemble_attributes(
    defaults: &DocumentAttributes,
    front_matter: Option<&FrontMatter>,
    header: Option<&DocumentHeader>,
) -> DocumentAttributes {
    let mut attributes = defaults.clone();
    if let Some(front_matter) = front_matter {
        for (name, value) in &front_matter.content {
            attributes.set(name.clone(), value.clone());
        }
    }
    if let Some(header) = header {
        attributes.merge(&header_attributes(header));
    }
    attributes
}

/// Build the final [`Document`] from nested top-level elements.
///
/// Wraps the content before the first section into a preamble, inserts the
/// table of contents according to the `toc` attribute, and indexes element
/// IDs and footnotes.
pub fn normalize(
    elements: Vec<Node>,
    title: Option<InlineElements>,
    attributes: DocumentAttributes,
    diagnostics: &mut Diagnostics,
) -> Result<Document, BuildError> {
    let mut elements = extract_preamble(elements);
    insert_table_of_contents(&mut elements, &attributes, diagnostics);
    number_footnotes(&mut elements);
    let index = Index::build(&elements)?;
    tracing::debug!(
        elements = elements.len(),
        ids = index.references.len(),
        footnotes = index.footnotes.len(),
        "Normalized document"
    );
    Ok(Document {
        title: title.filter(|t| !t.is_empty()),
        attributes,
        elements,
        element_references: index.references,
        footnotes: index.footnotes,
        footnote_references: index.footnote_references,
    })
}

/// Move every element before the first section into a [`Preamble`].
///
/// Nothing changes when the document starts with a section or has none.
fn extract_preamble(mut elements: Vec<Node>) -> Vec<Node> {
    let Some(first_section) = elements.iter().position(Node::is_section) else {
        return elements;
    };
    if first_section == 0 {
        return elements;
    }
    let sections = elements.split_off(first_section);
    let mut result = Vec::with_capacity(sections.len() + 1);
    result.push(Node::Preamble(Preamble { elements }));
    result.extend(sections);
    result
}

fn insert_table_of_contents(
    elements: &mut Vec<Node>,
    attributes: &DocumentAttributes,
    diagnostics: &mut Diagnostics,
) {
    let Some(placement) = attributes.get("toc") else {
        return;
    };
    match placement {
        "" | "auto" => elements.insert(0, Node::TableOfContentsMacro),
        "preamble" => {
            let at = usize::from(matches!(elements.first(), Some(Node::Preamble(_))));
            elements.insert(at, Node::TableOfContentsMacro);
        }
        // placed by a `toc::[]` line in the body
        "macro" => {}
        other => diagnostics.warn(format!("invalid value for 'toc' attribute: '{other}'")),
    }
}

/// Give every footnote with content its position among the document's
/// footnotes, in pre-order.
fn number_footnotes(elements: &mut [Node]) {
    let mut next = 0;
    let Ok(()) = walk_mut::<Infallible, _>(elements, &mut |node| {
        if let Node::Footnote(footnote) = node
            && !footnote.elements.is_empty()
        {
            footnote.index = Some(next);
            next += 1;
        }
        Ok(())
    });
}

#[derive(Default)]
struct Index {
    references: ElementReferences,
    footnotes: Vec<Footnote>,
    footnote_references: FootnoteReferences,
}

impl Index {
    fn build(elements: &[Node]) -> Result<Self, BuildError> {
        let mut index = Self::default();
        walk_all(
            elements,
            &mut |node: &Node| index.visit(node),
            &mut |_: &Node| Ok::<(), BuildError>(()),
        )?;
        Ok(index)
    }

    fn visit(&mut self, node: &Node) -> Result<(), BuildError> {
        if let Some(id) = node.id() {
            self.references.register(id, node.clone())?;
        }
        if let Node::Footnote(footnote) = node
            && !footnote.elements.is_empty()
        {
            if let Some(name) = &footnote.ref_name {
                self.footnote_references
                    .entry(name.clone())
                    .or_insert(self.footnotes.len());
            }
            self.footnotes.push(footnote.clone());
        }
        Ok(())
    }
}
