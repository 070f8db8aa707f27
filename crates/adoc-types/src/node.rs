//! Document tree nodes.
//!
//! Every element of a document is a variant of [`Node`]. Structural variants
//! (sections, lists, delimited blocks...) own their children; inline variants
//! appear inside paragraph lines, titles and list items.

use std::fmt;

use crate::attributes::ElementAttributes;

/// One line of inline content.
pub type InlineElements = Vec<Node>;

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Node {
    // Structural
    Preamble(Preamble),
    Section(Section),
    List(List),
    ListItem(ListItem),
    Paragraph(Paragraph),
    DelimitedBlock(DelimitedBlock),
    LiteralBlock(LiteralBlock),
    BlockImage(BlockImage),
    TableOfContentsMacro,
    FileInclusion(FileInclusion),
    AttributeDeclaration(AttributeDeclaration),
    AttributeReset(AttributeReset),
    BlankLine,
    // Inline
    Text(StringElement),
    QuotedText(QuotedText),
    Passthrough(Passthrough),
    CrossReference(CrossReference),
    InlineImage(InlineImage),
    ExternalLink(ExternalLink),
    Footnote(Footnote),
    FootnoteReference(FootnoteReference),
    AttributeSubstitution(AttributeSubstitution),
    // Either
    UserMacro(UserMacro),
}

/// Discriminant of a [`Node`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Preamble,
    Section,
    List,
    ListItem,
    Paragraph,
    DelimitedBlock,
    LiteralBlock,
    BlockImage,
    TableOfContentsMacro,
    FileInclusion,
    AttributeDeclaration,
    AttributeReset,
    BlankLine,
    Text,
    QuotedText,
    Passthrough,
    CrossReference,
    InlineImage,
    ExternalLink,
    Footnote,
    FootnoteReference,
    AttributeSubstitution,
    UserMacro,
}

impl NodeKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Preamble => "preamble",
            Self::Section => "section",
            Self::List => "list",
            Self::ListItem => "list item",
            Self::Paragraph => "paragraph",
            Self::DelimitedBlock => "delimited block",
            Self::LiteralBlock => "literal block",
            Self::BlockImage => "block image",
            Self::TableOfContentsMacro => "table of contents macro",
            Self::FileInclusion => "file inclusion",
            Self::AttributeDeclaration => "attribute declaration",
            Self::AttributeReset => "attribute reset",
            Self::BlankLine => "blank line",
            Self::Text => "string",
            Self::QuotedText => "quoted text",
            Self::Passthrough => "passthrough",
            Self::CrossReference => "cross reference",
            Self::InlineImage => "inline image",
            Self::ExternalLink => "external link",
            Self::Footnote => "footnote",
            Self::FootnoteReference => "footnote reference",
            Self::AttributeSubstitution => "attribute substitution",
            Self::UserMacro => "user macro",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Node {
    /// Build a text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(StringElement {
            content: content.into(),
        })
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Preamble(_) => NodeKind::Preamble,
            Self::Section(_) => NodeKind::Section,
            Self::List(_) => NodeKind::List,
            Self::ListItem(_) => NodeKind::ListItem,
            Self::Paragraph(_) => NodeKind::Paragraph,
            Self::DelimitedBlock(_) => NodeKind::DelimitedBlock,
            Self::LiteralBlock(_) => NodeKind::LiteralBlock,
            Self::BlockImage(_) => NodeKind::BlockImage,
            Self::TableOfContentsMacro => NodeKind::TableOfContentsMacro,
            Self::FileInclusion(_) => NodeKind::FileInclusion,
            Self::AttributeDeclaration(_) => NodeKind::AttributeDeclaration,
            Self::AttributeReset(_) => NodeKind::AttributeReset,
            Self::BlankLine => NodeKind::BlankLine,
            Self::Text(_) => NodeKind::Text,
            Self::QuotedText(_) => NodeKind::QuotedText,
            Self::Passthrough(_) => NodeKind::Passthrough,
            Self::CrossReference(_) => NodeKind::CrossReference,
            Self::InlineImage(_) => NodeKind::InlineImage,
            Self::ExternalLink(_) => NodeKind::ExternalLink,
            Self::Footnote(_) => NodeKind::Footnote,
            Self::FootnoteReference(_) => NodeKind::FootnoteReference,
            Self::AttributeSubstitution(_) => NodeKind::AttributeSubstitution,
            Self::UserMacro(_) => NodeKind::UserMacro,
        }
    }

    /// ID exposed for cross references, if any.
    ///
    /// Sections always expose their (explicit or derived) ID; other
    /// structural elements only when an `id` attribute was given.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Section(section) => Some(section.title.id.as_str()),
            Self::List(list) => list.attributes.id(),
            Self::Paragraph(p) => p.attributes.id(),
            Self::DelimitedBlock(b) => b.attributes.id(),
            Self::LiteralBlock(b) => b.attributes.id(),
            Self::BlockImage(img) => img.attributes.id(),
            _ => None,
        }
    }

    /// Element attributes of structural nodes.
    #[must_use]
    pub fn attributes(&self) -> Option<&ElementAttributes> {
        match self {
            Self::Section(s) => Some(&s.attributes),
            Self::List(l) => Some(&l.attributes),
            Self::Paragraph(p) => Some(&p.attributes),
            Self::DelimitedBlock(b) => Some(&b.attributes),
            Self::LiteralBlock(b) => Some(&b.attributes),
            Self::BlockImage(img) => Some(&img.attributes),
            Self::FileInclusion(inc) => Some(&inc.attributes),
            Self::UserMacro(m) => Some(&m.attributes),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_blank_line(&self) -> bool {
        matches!(self, Self::BlankLine)
    }

    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }
}

/// Content preceding the first section of a document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Preamble {
    pub elements: Vec<Node>,
}

/// A section and everything it contains up to the next section of the same
/// or a higher level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Section {
    /// Nesting level, 1 for top-level sections.
    pub level: usize,
    pub title: SectionTitle,
    pub attributes: ElementAttributes,
    pub elements: Vec<Node>,
}

/// Section heading: inline content plus the section ID.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionTitle {
    pub id: String,
    pub elements: InlineElements,
}

/// An unordered list.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct List {
    pub attributes: ElementAttributes,
    pub items: Vec<ListItem>,
}

/// A list item with its optional nested list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ListItem {
    pub level: usize,
    pub lines: Vec<InlineElements>,
    pub children: Option<List>,
}

/// A paragraph: one or more lines of inline content.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Paragraph {
    pub attributes: ElementAttributes,
    pub lines: Vec<InlineElements>,
}

/// Kind of a delimited block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DelimitedBlockKind {
    Fenced,
    Listing,
    Source,
    Example,
    Quote,
    Verse,
    Sidebar,
    Comment,
    Passthrough,
}

impl DelimitedBlockKind {
    /// Whether the block keeps its content as raw lines rather than blocks.
    #[must_use]
    pub fn is_raw(self) -> bool {
        matches!(
            self,
            Self::Fenced | Self::Listing | Self::Source | Self::Comment | Self::Passthrough
        )
    }

    /// Whether the block's content should be treated as a listing, where
    /// characters are emitted verbatim.
    #[must_use]
    pub fn is_listing(self) -> bool {
        matches!(
            self,
            Self::Fenced | Self::Listing | Self::Source | Self::Passthrough
        )
    }
}

/// A block delimited by fence lines.
///
/// Raw kinds hold one [`Node::Text`] per line plus [`Node::BlankLine`]s;
/// verse blocks hold paragraphs and blank lines; compound kinds hold blocks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DelimitedBlock {
    pub kind: DelimitedBlockKind,
    pub attributes: ElementAttributes,
    pub elements: Vec<Node>,
}

/// An indented literal paragraph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LiteralBlock {
    pub attributes: ElementAttributes,
    pub content: String,
}

/// Target and size of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageMacro {
    pub path: String,
    pub alt: String,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockImage {
    pub attributes: ElementAttributes,
    pub image: ImageMacro,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InlineImage {
    pub image: ImageMacro,
}

/// An unresolved `include::path[attributes]` directive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileInclusion {
    /// Target path as written, placeholders included.
    pub path: String,
    pub attributes: ElementAttributes,
    /// The directive as written, e.g. `include::a.adoc[lines=1]`.
    pub raw_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttributeDeclaration {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttributeReset {
    pub name: String,
}

/// Plain text span.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringElement {
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuotedTextKind {
    Bold,
    Italic,
    Monospace,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QuotedText {
    pub kind: QuotedTextKind,
    pub elements: InlineElements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PassthroughKind {
    /// `+text+`: escaped, no substitutions.
    SinglePlus,
    /// `+++text+++`: emitted verbatim.
    TriplePlus,
    /// `pass:[text]`: emitted verbatim.
    Macro,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Passthrough {
    pub kind: PassthroughKind,
    pub elements: InlineElements,
}

/// `<<id>>` or `<<id,label>>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CrossReference {
    pub id: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExternalLink {
    pub url: String,
    /// Link text; empty means the URL is shown.
    pub text: InlineElements,
}

/// A footnote definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Footnote {
    /// Name under which later references can point to this footnote.
    pub ref_name: Option<String>,
    pub elements: InlineElements,
    /// Position among the document's footnotes, set when the document is
    /// normalized.
    pub index: Option<usize>,
}

/// A reference to a named footnote defined elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FootnoteReference {
    pub name: String,
}

/// `{name}` in inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttributeSubstitution {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UserMacroKind {
    /// `name:value[attributes]` inside a line.
    Inline,
    /// `name::value[attributes]` on its own line.
    Block,
}

/// A macro the core does not interpret, rendered through a registered
/// template.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UserMacro {
    pub kind: UserMacroKind,
    pub name: String,
    pub value: String,
    pub attributes: ElementAttributes,
    pub raw_text: String,
}

impl Paragraph {
    /// Paragraph from plain text lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: ElementAttributes::new(),
            lines: lines.into_iter().map(|l| vec![Node::text(l)]).collect(),
        }
    }
}
