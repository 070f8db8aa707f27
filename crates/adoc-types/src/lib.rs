//! Typed document tree for AsciiDoc conversion.
//!
//! The tree is produced by `adoc-parser` and consumed by `adoc-renderer`:
//!
//! - [`Node`]: every structural and inline element
//! - [`Document`]: the normalized root with its attribute, reference and
//!   footnote indexes
//! - [`Fragment`]: raw grammar output awaiting the tree builder
//! - [`walk`]: pre-order traversal with enter/leave callbacks
//!
//! Enable the `serde` feature to serialize the tree.

mod attributes;
mod document;
mod fragment;
mod node;
mod text;
mod visit;

pub use attributes::{
    ATTR_ADMONITION, ATTR_ID, ATTR_LANGUAGE, ATTR_LINK, ATTR_QUOTE_AUTHOR, ATTR_QUOTE_TITLE,
    ATTR_STYLE, ATTR_TITLE, AdmonitionKind, AttributeValue, DocumentAttributes,
    ElementAttributes, is_attribute_name,
};
pub use document::{
    Document, DocumentAuthor, DocumentHeader, DocumentRevision, DuplicateElementId,
    ElementReferences, FootnoteReferences, FrontMatter,
};
pub use fragment::Fragment;
pub use node::{
    AttributeDeclaration, AttributeReset, AttributeSubstitution, BlockImage, CrossReference,
    DelimitedBlock, DelimitedBlockKind, ExternalLink, FileInclusion, Footnote, FootnoteReference,
    ImageMacro, InlineElements, InlineImage, List, ListItem, LiteralBlock, Node, NodeKind,
    Paragraph, Passthrough, PassthroughKind, Preamble, QuotedText, QuotedTextKind, Section,
    SectionTitle, StringElement, UserMacro, UserMacroKind,
};
pub use text::{plain_text, replace_non_alphanumerics};
pub use visit::{walk, walk_all, walk_mut};
