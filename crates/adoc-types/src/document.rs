//! The document root and its indexes.

use std::collections::BTreeMap;

use crate::attributes::DocumentAttributes;
use crate::node::{Footnote, InlineElements, Node};

/// Registering an ID that is already taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate element ID '{id}'")]
pub struct DuplicateElementId {
    pub id: String,
}

/// A document author as written in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentAuthor {
    pub full_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub initials: String,
    pub email: Option<String>,
}

/// Revision line of the document header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentRevision {
    pub number: Option<String>,
    pub date: Option<String>,
    pub remark: Option<String>,
}

/// Everything declared above the first blank line of a document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentHeader {
    pub title: InlineElements,
    pub authors: Vec<DocumentAuthor>,
    pub revision: Option<DocumentRevision>,
    /// Attribute entries declared in the header, in order.
    pub attributes: DocumentAttributes,
}

/// YAML front matter, kept as an opaque key/value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrontMatter {
    pub content: BTreeMap<String, String>,
}

/// Element ID to the node that declared it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementReferences(BTreeMap<String, Node>);

impl ElementReferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateElementId`] if `id` is already registered; the
    /// existing entry is kept.
    pub fn register(&mut self, id: &str, node: Node) -> Result<(), DuplicateElementId> {
        if self.0.contains_key(id) {
            return Err(DuplicateElementId { id: id.to_owned() });
        }
        self.0.insert(id.to_owned(), node);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.0.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Footnote name to the index of its first definition.
pub type FootnoteReferences = BTreeMap<String, usize>;

/// A normalized document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    pub title: Option<InlineElements>,
    pub attributes: DocumentAttributes,
    pub elements: Vec<Node>,
    pub element_references: ElementReferences,
    /// Footnotes with content, in document order. Index 0 renders as 1.
    pub footnotes: Vec<Footnote>,
    pub footnote_references: FootnoteReferences,
}

impl Document {
    /// Index of the named footnote, if it was defined.
    #[must_use]
    pub fn footnote_index(&self, name: &str) -> Option<usize> {
        self.footnote_references.get(name).copied()
    }

    #[must_use]
    pub fn has_footnotes(&self) -> bool {
        !self.footnotes.is_empty()
    }
}
