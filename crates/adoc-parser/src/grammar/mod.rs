//! Grammar engines turn source text into raw fragments.
//!
//! The pipeline only depends on the [`GrammarEngine`] trait; [`LineGrammar`]
//! is the bundled line-oriented implementation. It recognizes each construct
//! and hands its raw pieces to the [`builder`](crate::builder) constructors,
//! so all validation happens in one place regardless of the engine.

mod attributes;
mod blocks;
mod header;
mod inline;

use adoc_types::{DelimitedBlockKind, DocumentHeader, Fragment, FrontMatter};

use crate::error::BuildError;

pub use attributes::parse_attribute_list;
pub use inline::parse_inline;

/// How a piece of content is split into blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Top-level content: sections are recognized.
    Document,
    /// Inside example, quote and sidebar blocks: blocks but no sections.
    Compound,
    /// Inside verse blocks: paragraphs and blank lines only.
    Verse,
    /// Inside listing-like blocks: one text fragment per line.
    Raw,
}

impl ContentMode {
    /// Mode used for the content of a delimited block.
    #[must_use]
    pub fn for_block(kind: DelimitedBlockKind) -> Self {
        match kind {
            DelimitedBlockKind::Example | DelimitedBlockKind::Quote | DelimitedBlockKind::Sidebar => {
                Self::Compound
            }
            DelimitedBlockKind::Verse => Self::Verse,
            DelimitedBlockKind::Fenced
            | DelimitedBlockKind::Listing
            | DelimitedBlockKind::Source
            | DelimitedBlockKind::Comment
            | DelimitedBlockKind::Passthrough => Self::Raw,
        }
    }
}

/// Raw output for a whole document.
#[derive(Debug, Default)]
pub struct RawDocument {
    pub front_matter: Option<FrontMatter>,
    pub header: Option<DocumentHeader>,
    /// Top-level blocks, with blank lines, section headings left flat.
    pub blocks: Vec<Fragment>,
}

/// Source text to raw fragments.
pub trait GrammarEngine {
    /// Parse a complete document: front matter, header and body.
    fn parse_document(&self, source: &str) -> Result<RawDocument, BuildError>;

    /// Parse a piece of content, such as an included file, in `mode`.
    fn parse_content(&self, source: &str, mode: ContentMode) -> Result<Vec<Fragment>, BuildError>;
}

/// Line-oriented grammar for the common AsciiDoc syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineGrammar;

impl LineGrammar {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GrammarEngine for LineGrammar {
    fn parse_document(&self, source: &str) -> Result<RawDocument, BuildError> {
        let mut lines = blocks::Lines::new(source);
        let front_matter = header::parse_front_matter(&mut lines)?;
        let header = header::parse_header(&mut lines)?;
        let blocks = blocks::parse_blocks(&mut lines, ContentMode::Document)?;
        Ok(RawDocument {
            front_matter,
            header,
            blocks,
        })
    }

    fn parse_content(&self, source: &str, mode: ContentMode) -> Result<Vec<Fragment>, BuildError> {
        let mut lines = blocks::Lines::new(source);
        blocks::parse_content(&mut lines, mode)
    }
}
