//! Source text to a normalized [`Document`].

use std::io;
use std::path::{Path, PathBuf};

use adoc_types::{Document, DocumentAttributes};

use crate::builder;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::BuildError;
use crate::grammar::{GrammarEngine, LineGrammar};
use crate::include::{InclusionResolver, Origin};
use crate::normalize::{assemble_attributes, normalize};

/// Type alias for the file reading callback function.
pub type ReadFileFn = dyn Fn(&Path) -> io::Result<String> + Send;

/// Error returned by [`Parser::parse_file`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Configuration for the parser.
pub struct ParserConfig {
    /// Directory include paths of the main document resolve against.
    pub base_dir: PathBuf,
    /// Path of the main document, if it was read from a file.
    pub source_path: Option<PathBuf>,
    /// Callback to read included files.
    ///
    /// Default: `std::fs::read_to_string`
    pub read_file: Option<Box<ReadFileFn>>,
    /// Maximum nesting of include directives.
    ///
    /// Default: 10
    pub max_include_depth: usize,
    /// Attributes every document starts with. Front matter and the header
    /// override them.
    pub attributes: DocumentAttributes,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            source_path: None,
            read_file: None,
            max_include_depth: 10,
            attributes: DocumentAttributes::new(),
        }
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    #[must_use]
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }

    #[must_use]
    pub fn with_read_file<F>(mut self, read_file: F) -> Self
    where
        F: Fn(&Path) -> io::Result<String> + Send + 'static,
    {
        self.read_file = Some(Box::new(read_file));
        self
    }

    #[must_use]
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: DocumentAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    fn read_file(&self) -> &dyn Fn(&Path) -> io::Result<String> {
        self.read_file.as_ref().map_or_else(
            || &default_read_file as &dyn Fn(&Path) -> io::Result<String>,
            |f| f.as_ref(),
        )
    }

    /// Origin of the main document. Its name is the source file name, or
    /// `document` when there is none.
    fn origin(&self) -> Origin {
        let name = self
            .source_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "document".to_owned(), |n| n.to_string_lossy().into_owned());
        let origin = Origin::new(name, &self.base_dir);
        match &self.source_path {
            Some(path) => origin.with_path(path),
            None => origin,
        }
    }
}

/// Default file reading function.
fn default_read_file(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// Result of parsing a document.
#[derive(Debug)]
pub struct ParseResult {
    pub document: Document,
    /// Problems that did not stop the conversion, in the order found.
    pub diagnostics: Vec<Diagnostic>,
}

/// Document parser.
///
/// Runs the grammar, builds the tree, expands include directives, nests
/// sections and normalizes the result.
///
/// # Example
///
/// ```
/// use adoc_parser::{Parser, ParserConfig};
///
/// let parser = Parser::with_config(ParserConfig::new().with_attribute("product", "Widget"));
/// let result = parser.parse("= Guide\n\n== Install {product}\n\nRun it.").unwrap();
/// assert_eq!(result.document.elements.len(), 1);
/// assert!(result.diagnostics.is_empty());
/// ```
pub struct Parser<G = LineGrammar> {
    grammar: G,
    config: ParserConfig,
}

impl Default for Parser<LineGrammar> {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<LineGrammar> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ParserConfig::new())
    }

    #[must_use]
    pub fn with_config(config: ParserConfig) -> Self {
        Self::with_grammar(LineGrammar::new(), config)
    }
}

impl<G: GrammarEngine> Parser<G> {
    /// Parser using a custom grammar engine.
    #[must_use]
    pub fn with_grammar(grammar: G, config: ParserConfig) -> Self {
        Self { grammar, config }
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse the main document from `source`.
    pub fn parse(&self, source: &str) -> Result<ParseResult, BuildError> {
        self.parse_from(source, &self.config.origin())
    }

    /// Read and parse the document at `path`. Its include directives resolve
    /// against its own directory.
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult, ParseError> {
        let source = (self.config.read_file())(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let origin = Origin::new(name, dir).with_path(path);
        Ok(self.parse_from(&source, &origin)?)
    }

    fn parse_from(&self, source: &str, origin: &Origin) -> Result<ParseResult, BuildError> {
        let raw = self.grammar.parse_document(source)?;
        let attributes = assemble_attributes(
            &self.config.attributes,
            raw.front_matter.as_ref(),
            raw.header.as_ref(),
        );
        let blocks = builder::filter_unrelevant_elements(raw.blocks)?;
        tracing::debug!(blocks = blocks.len(), document = %origin.name, "Parsed document");

        let mut diagnostics = Diagnostics::new();
        let mut running = attributes.clone();
        let blocks = InclusionResolver::new(
            &self.grammar,
            self.config.read_file(),
            self.config.max_include_depth,
            &mut diagnostics,
        )
        .resolve(blocks, origin, &mut running)?;

        let elements = builder::nest_sections(blocks);
        let title = raw.header.map(|header| header.title);
        let document = normalize(elements, title, attributes, &mut diagnostics)?;
        Ok(ParseResult {
            document,
            diagnostics: diagnostics.into_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::diagnostics::Level;
    use adoc_types::{Node, Paragraph, Passthrough, PassthroughKind};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn section_titles(nodes: &[Node], depth: usize, out: &mut Vec<(usize, String)>) {
        for node in nodes {
            if let Node::Section(section) = node {
                out.push((depth, adoc_types::plain_text(&section.title.elements)));
                section_titles(&section.elements, depth + 1, out);
            }
        }
    }

    fn outline(document: &Document) -> Vec<(usize, String)> {
        let mut out = Vec::new();
        section_titles(&document.elements, 0, &mut out);
        out
    }

    #[test]
    fn test_parse_document_with_header() {
        let result = Parser::new()
            .parse("= Title\nJohn Doe\n:toc:\n\nIntro.\n\n== One\n\nText.\n\n=== Nested\n\n== Two")
            .unwrap();
        let document = result.document;

        assert_eq!(document.title, Some(vec![Node::text("Title")]));
        assert_eq!(document.attributes.get("author"), Some("John Doe"));
        assert_eq!(document.elements[0], Node::TableOfContentsMacro);
        assert!(matches!(document.elements[1], Node::Preamble(_)));
        assert_eq!(
            outline(&document),
            vec![
                (0, "One".to_owned()),
                (1, "Nested".to_owned()),
                (0, "Two".to_owned()),
            ]
        );
        assert!(document.element_references.get("_nested").is_some());
    }

    #[test]
    fn test_config_attributes_are_overridden_by_header() {
        let parser = Parser::with_config(
            ParserConfig::new()
                .with_attribute("icons", "font")
                .with_attribute("toc", "macro"),
        );
        let result = parser.parse(":toc: auto\n\nText").unwrap();
        assert_eq!(result.document.attributes.get("icons"), Some("font"));
        assert_eq!(result.document.attributes.get("toc"), Some("auto"));
    }

    #[test]
    fn test_include_with_level_offset_from_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("chapters")).unwrap();
        fs::write(
            dir.path().join("chapters/one.adoc"),
            "= Chapter One\n\ncontent\n\ninclude::part.adoc[leveloffset=+1]",
        )
        .unwrap();
        fs::write(dir.path().join("chapters/part.adoc"), "== Part\n\npart content").unwrap();
        fs::write(
            dir.path().join("main.adoc"),
            "= Book\n\ninclude::chapters/one.adoc[leveloffset=+1]",
        )
        .unwrap();

        let result = Parser::new()
            .parse_file(&dir.path().join("main.adoc"))
            .unwrap();
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            outline(&result.document),
            vec![(0, "Chapter One".to_owned()), (1, "Part".to_owned())]
        );
    }

    #[test]
    fn test_include_path_attribute_from_header() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("includes")).unwrap();
        fs::write(dir.path().join("includes/a.adoc"), "included").unwrap();

        let parser = Parser::with_config(ParserConfig::new().with_base_dir(dir.path()));
        let result = parser
            .parse(":includedir: includes\n\ninclude::{includedir}/a.adoc[]")
            .unwrap();
        assert_eq!(
            result.document.elements,
            vec![Node::Paragraph(Paragraph::from_lines(["included"]))]
        );
    }

    #[test]
    fn test_line_ranges() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("lines.adoc"),
            "first line\nsecond line\nthird line\nfourth line\nfifth line\nsixth line\nseventh line",
        )
        .unwrap();
        let parser = Parser::with_config(ParserConfig::new().with_base_dir(dir.path()));
        let result = parser.parse("include::lines.adoc[lines=1..2;5..7]").unwrap();
        assert_eq!(
            result.document.elements,
            vec![
                Node::Paragraph(Paragraph::from_lines(["first line", "second line"])),
                Node::Paragraph(Paragraph::from_lines([
                    "fifth line",
                    "sixth line",
                    "seventh line"
                ])),
            ]
        );
    }

    #[test]
    fn test_unclosed_tag() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tagged.adoc"),
            "== Section 1\n\n// tag::unclosed[]\ncontent\n\nend",
        )
        .unwrap();
        let parser = Parser::with_config(ParserConfig::new().with_base_dir(dir.path()));
        let result = parser.parse("include::tagged.adoc[tag=unclosed]").unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].level, Level::Error);
        assert_eq!(
            result.diagnostics[0].message,
            "detected unclosed tag 'unclosed' starting at line 3 of include file: tagged.adoc"
        );
        assert_eq!(
            result.document.elements,
            vec![
                Node::Paragraph(Paragraph::from_lines(["content"])),
                Node::Paragraph(Paragraph::from_lines(["end"])),
            ]
        );
    }

    #[test]
    fn test_missing_include_file() {
        let parser = Parser::with_config(
            ParserConfig::new()
                .with_source_path("test.adoc")
                .with_read_file(|_| Err(io::Error::new(io::ErrorKind::NotFound, "not found"))),
        );
        let result = parser.parse("include::../../test/includes/unknown.adoc[leveloffset=+1]").unwrap();

        assert_eq!(
            result.diagnostics[0].message,
            "failed to include '../../test/includes/unknown.adoc'"
        );
        let Node::Paragraph(paragraph) = &result.document.elements[0] else {
            panic!("expected paragraph, got {:?}", result.document.elements[0]);
        };
        assert_eq!(
            paragraph.lines[0],
            vec![
                Node::text(
                    "Unresolved directive in test.adoc - include::../../test/includes/unknown.adoc[leveloffset="
                ),
                Node::Passthrough(Passthrough {
                    kind: PassthroughKind::TriplePlus,
                    elements: vec![Node::text("&#43;")],
                }),
                Node::text("1]"),
            ]
        );
    }

    #[test]
    fn test_parse_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = Parser::new()
            .parse_file(&dir.path().join("absent.adoc"))
            .unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn test_duplicate_ids_fail() {
        let err = Parser::new().parse("== Same\n\n== Same").unwrap_err();
        assert!(matches!(err, BuildError::DuplicateElementId(_)));
    }
}
