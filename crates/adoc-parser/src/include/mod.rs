//! Include directive resolution.
//!
//! Replaces every [`FileInclusion`] with the parsed content of the file it
//! names. Content is parsed in the mode of the place the directive appears
//! in: as blocks at document level, as raw lines inside listing blocks, as
//! verse paragraphs inside verse blocks.
//!
//! A directive that cannot be honored is reported as a diagnostic and
//! replaced by an "Unresolved directive" placeholder; conversion goes on.

mod selector;

use std::io;
use std::path::{Component, Path, PathBuf};

use adoc_types::{
    DelimitedBlock, DelimitedBlockKind, DocumentAttributes, ElementAttributes, FileInclusion,
    Fragment, Node, Paragraph, Passthrough, PassthroughKind,
};

use crate::builder;
use crate::diagnostics::Diagnostics;
use crate::error::BuildError;
use crate::grammar::{ContentMode, GrammarEngine};

pub use selector::{InvalidLineRange, LineRange, LineRanges, TagProblem, select_tag};

/// Document the nodes being resolved come from.
#[derive(Debug, Clone)]
pub struct Origin {
    /// Name used in placeholders: the main document's file name, or an
    /// include path as written.
    pub name: String,
    /// Directory relative include paths are resolved against.
    pub dir: PathBuf,
    /// File path, when the content was read from a file.
    pub path: Option<PathBuf>,
}

impl Origin {
    #[must_use]
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Where a directive appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Document,
    Block(DelimitedBlockKind),
}

impl Placement {
    fn mode(self) -> ContentMode {
        match self {
            Self::Document => ContentMode::Document,
            Self::Block(kind) => ContentMode::for_block(kind),
        }
    }

    fn is_raw(self) -> bool {
        matches!(self, Self::Block(kind) if kind.is_raw())
    }
}

/// A file read for an include directive.
struct Loaded {
    text: String,
    /// Path as written, after attribute substitution.
    target: String,
    origin: Origin,
}

/// Expands include directives recursively.
pub struct InclusionResolver<'a> {
    grammar: &'a dyn GrammarEngine,
    read_file: &'a dyn Fn(&Path) -> io::Result<String>,
    max_depth: usize,
    /// Files being expanded, outermost first. The main document, when read
    /// from a file, sits at the bottom and does not count toward the depth.
    in_flight: Vec<PathBuf>,
    root: usize,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> InclusionResolver<'a> {
    pub fn new(
        grammar: &'a dyn GrammarEngine,
        read_file: &'a dyn Fn(&Path) -> io::Result<String>,
        max_depth: usize,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            grammar,
            read_file,
            max_depth,
            in_flight: Vec::new(),
            root: 0,
            diagnostics,
        }
    }

    /// Resolve the top-level blocks of a document.
    ///
    /// `attributes` is the running attribute set: declarations and resets in
    /// the body update it in document order, so include paths see the values
    /// in effect where they appear.
    pub fn resolve(
        &mut self,
        nodes: Vec<Node>,
        origin: &Origin,
        attributes: &mut DocumentAttributes,
    ) -> Result<Vec<Node>, BuildError> {
        if let Some(path) = origin.path.as_deref() {
            self.in_flight.push(normalize_path(path));
            self.root = 1;
        }
        let result = self.resolve_nodes(nodes, Placement::Document, origin, attributes);
        self.in_flight.clear();
        self.root = 0;
        result
    }

    fn resolve_nodes(
        &mut self,
        nodes: Vec<Node>,
        placement: Placement,
        origin: &Origin,
        attributes: &mut DocumentAttributes,
    ) -> Result<Vec<Node>, BuildError> {
        let mut resolved = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::AttributeDeclaration(declaration) => {
                    attributes.set(declaration.name.clone(), declaration.value.clone());
                    resolved.push(Node::AttributeDeclaration(declaration));
                }
                Node::AttributeReset(reset) => {
                    attributes.reset(&reset.name);
                    resolved.push(Node::AttributeReset(reset));
                }
                Node::FileInclusion(inclusion) => {
                    resolved.extend(self.include(&inclusion, placement, origin, attributes)?);
                }
                Node::DelimitedBlock(block) if block.kind != DelimitedBlockKind::Comment => {
                    let DelimitedBlock {
                        kind,
                        attributes: block_attributes,
                        elements,
                    } = block;
                    let elements =
                        self.resolve_nodes(elements, Placement::Block(kind), origin, attributes)?;
                    resolved.push(Node::DelimitedBlock(DelimitedBlock {
                        kind,
                        attributes: block_attributes,
                        elements,
                    }));
                }
                other => resolved.push(other),
            }
        }
        Ok(resolved)
    }

    fn include(
        &mut self,
        inclusion: &FileInclusion,
        placement: Placement,
        origin: &Origin,
        attributes: &mut DocumentAttributes,
    ) -> Result<Vec<Node>, BuildError> {
        let Some(loaded) = self.load(inclusion, origin, attributes) else {
            return Ok(vec![placeholder(inclusion, placement, &origin.name)]);
        };
        let path = loaded.origin.path.clone().unwrap_or_default();
        self.in_flight.push(path);
        let result = self.include_loaded(inclusion, &loaded, placement, attributes);
        self.in_flight.pop();
        result
    }

    fn load(
        &mut self,
        inclusion: &FileInclusion,
        origin: &Origin,
        attributes: &DocumentAttributes,
    ) -> Option<Loaded> {
        let target = attributes.substitute(&inclusion.path);
        let path = normalize_path(&origin.dir.join(&target));

        if self.in_flight.contains(&path) {
            self.diagnostics
                .error(format!("include cycle detected for '{}'", inclusion.path));
            return None;
        }
        if self.in_flight.len() - self.root >= self.max_depth {
            self.diagnostics.error(format!(
                "maximum include depth ({}) exceeded for '{}'",
                self.max_depth, inclusion.path
            ));
            return None;
        }

        match (self.read_file)(&path) {
            Ok(text) => {
                let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
                Some(Loaded {
                    text,
                    origin: Origin::new(target.clone(), dir).with_path(path),
                    target,
                })
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Include read failed");
                self.diagnostics
                    .error(format!("failed to include '{}'", inclusion.path));
                None
            }
        }
    }

    fn include_loaded(
        &mut self,
        inclusion: &FileInclusion,
        loaded: &Loaded,
        placement: Placement,
        attributes: &mut DocumentAttributes,
    ) -> Result<Vec<Node>, BuildError> {
        let mut pieces = self.select(inclusion, loaded);
        if placement != Placement::Document && pieces.len() > 1 {
            pieces = vec![pieces.join("\n")];
        }

        let mode = placement.mode();
        let mut nodes = Vec::new();
        for piece in pieces {
            let fragments = self.grammar.parse_content(&piece, mode)?;
            let parsed = content_nodes(fragments, mode)?;
            nodes.extend(self.resolve_nodes(parsed, placement, &loaded.origin, attributes)?);
        }

        if placement == Placement::Document
            && let Some(offset) = self.level_offset(inclusion)
        {
            offset_sections(&mut nodes, offset);
        }
        Ok(nodes)
    }

    /// Text selected by the `lines` or `tag`/`tags` attribute, or the whole
    /// file. `lines` wins when both are given.
    fn select(&mut self, inclusion: &FileInclusion, loaded: &Loaded) -> Vec<String> {
        if let Some(lines) = inclusion.attributes.get_str("lines") {
            match LineRanges::parse(lines) {
                Ok(ranges) => return ranges.select(&loaded.text),
                Err(err) => self
                    .diagnostics
                    .warn(format!("{err} in include directive: {}", inclusion.raw_text)),
            }
        }

        let tags = inclusion
            .attributes
            .get_str("tag")
            .or_else(|| inclusion.attributes.get_str("tags"));
        let Some(tags) = tags else {
            return vec![loaded.text.clone()];
        };

        let mut selected = Vec::new();
        for name in tags.split([';', ',']).map(str::trim).filter(|n| !n.is_empty()) {
            let (text, problem) = select_tag(&loaded.text, name);
            match problem {
                Some(TagProblem::Unclosed { line }) => self.diagnostics.error(format!(
                    "detected unclosed tag '{name}' starting at line {line} of include file: {}",
                    loaded.target
                )),
                Some(TagProblem::NotFound) => self.diagnostics.error(format!(
                    "tag '{name}' not found in include file: {}",
                    loaded.target
                )),
                None => {}
            }
            if !text.is_empty() {
                selected.push(text);
            }
        }
        vec![selected.join("\n")]
    }

    fn level_offset(&mut self, inclusion: &FileInclusion) -> Option<isize> {
        let value = inclusion.attributes.get_str("leveloffset")?;
        let digits = value.trim().strip_prefix('+').unwrap_or(value.trim());
        match digits.parse::<isize>() {
            Ok(offset) => Some(offset),
            Err(_) => {
                self.diagnostics.warn(format!(
                    "invalid value for 'leveloffset' attribute: '{value}'"
                ));
                None
            }
        }
    }
}

fn content_nodes(fragments: Vec<Fragment>, mode: ContentMode) -> Result<Vec<Node>, BuildError> {
    match mode {
        ContentMode::Document | ContentMode::Compound => {
            builder::filter_unrelevant_elements(fragments)
        }
        ContentMode::Verse => builder::block_nodes(fragments),
        ContentMode::Raw => builder::raw_lines(fragments),
    }
}

fn offset_sections(nodes: &mut [Node], offset: isize) {
    for node in nodes {
        if let Node::Section(section) = node {
            section.level = section.level.saturating_add_signed(offset);
        }
    }
}

/// Replacement for a directive that could not be honored.
///
/// Outside raw blocks the text becomes a paragraph in which `+` is emitted as
/// a character reference, so it cannot start a passthrough.
fn placeholder(inclusion: &FileInclusion, placement: Placement, document: &str) -> Node {
    let text = format!("Unresolved directive in {document} - {}", inclusion.raw_text);
    if placement.is_raw() {
        return Node::text(text);
    }
    let mut line = Vec::new();
    for (index, part) in text.split('+').enumerate() {
        if index > 0 {
            line.push(Node::Passthrough(Passthrough {
                kind: PassthroughKind::TriplePlus,
                elements: vec![Node::text("&#43;")],
            }));
        }
        if !part.is_empty() {
            line.push(Node::text(part));
        }
    }
    Node::Paragraph(Paragraph {
        attributes: ElementAttributes::new(),
        lines: vec![line],
    })
}

/// Lexically normalize a path: drop `.` and fold `name/..`.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else {
                    normalized.push("..");
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::grammar::LineGrammar;
    use adoc_types::{Section, SectionTitle};
    use pretty_assertions::assert_eq;

    fn files(entries: &[(&str, &str)]) -> HashMap<PathBuf, String> {
        entries
            .iter()
            .map(|(path, text)| (PathBuf::from(path), (*text).to_owned()))
            .collect()
    }

    fn resolve_with(
        fs: &HashMap<PathBuf, String>,
        source: &str,
    ) -> (Vec<Node>, Vec<crate::diagnostics::Diagnostic>) {
        let grammar = LineGrammar::new();
        let read = |path: &Path| {
            fs.get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
        };
        let mut diagnostics = Diagnostics::new();
        let nodes = {
            let mut resolver = InclusionResolver::new(&grammar, &read, 10, &mut diagnostics);
            let parsed = grammar
                .parse_content(source, ContentMode::Document)
                .unwrap();
            let parsed = builder::filter_unrelevant_elements(parsed).unwrap();
            let origin = Origin::new("test.adoc", "docs").with_path("docs/test.adoc");
            resolver
                .resolve(parsed, &origin, &mut DocumentAttributes::default())
                .unwrap()
        };
        (nodes, diagnostics.into_vec())
    }

    fn paragraph(text: &str) -> Node {
        Node::Paragraph(Paragraph::from_lines([text]))
    }

    fn messages(diagnostics: &[crate::diagnostics::Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_include_blocks() {
        let fs = files(&[("docs/inc/chapter.adoc", "first\n\nsecond")]);
        let (nodes, diagnostics) = resolve_with(&fs, "include::inc/chapter.adoc[]");
        assert_eq!(nodes, vec![paragraph("first"), paragraph("second")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_nested_include_resolves_against_included_file() {
        let fs = files(&[
            ("docs/inc/parent.adoc", "include::child.adoc[]"),
            ("docs/inc/child.adoc", "child content"),
        ]);
        let (nodes, _) = resolve_with(&fs, "include::inc/parent.adoc[]");
        assert_eq!(nodes, vec![paragraph("child content")]);
    }

    #[test]
    fn test_include_path_uses_attributes_in_effect() {
        let fs = files(&[("docs/includes/a.adoc", "from a")]);
        let (nodes, _) = resolve_with(&fs, ":dir: includes\n\ninclude::{dir}/a.adoc[]");
        assert_eq!(nodes[1], paragraph("from a"));
    }

    #[test]
    fn test_missing_file_placeholder() {
        let (nodes, diagnostics) = resolve_with(&HashMap::new(), "include::missing.adoc[]");
        assert_eq!(
            nodes,
            vec![paragraph(
                "Unresolved directive in test.adoc - include::missing.adoc[]"
            )]
        );
        assert_eq!(messages(&diagnostics), vec!["failed to include 'missing.adoc'"]);
    }

    #[test]
    fn test_placeholder_escapes_plus() {
        let (nodes, _) = resolve_with(&HashMap::new(), "include::c++.adoc[]");
        let Node::Paragraph(p) = &nodes[0] else {
            panic!("expected paragraph, got {:?}", nodes[0]);
        };
        let plus = Node::Passthrough(Passthrough {
            kind: PassthroughKind::TriplePlus,
            elements: vec![Node::text("&#43;")],
        });
        assert_eq!(
            p.lines[0],
            vec![
                Node::text("Unresolved directive in test.adoc - include::c"),
                plus.clone(),
                plus,
                Node::text(".adoc[]"),
            ]
        );
    }

    #[test]
    fn test_placeholder_in_listing_block_is_raw() {
        let (nodes, _) = resolve_with(&HashMap::new(), "----\ninclude::c++.adoc[]\n----");
        let Node::DelimitedBlock(block) = &nodes[0] else {
            panic!("expected block, got {:?}", nodes[0]);
        };
        assert_eq!(
            block.elements,
            vec![Node::text(
                "Unresolved directive in test.adoc - include::c++.adoc[]"
            )]
        );
    }

    #[test]
    fn test_include_in_listing_block_keeps_lines() {
        let fs = files(&[("docs/code.go", "package main\n\nfunc main() {}")]);
        let (nodes, _) = resolve_with(&fs, "[source,go]\n----\ninclude::code.go[]\n----");
        let Node::DelimitedBlock(block) = &nodes[0] else {
            panic!("expected block, got {:?}", nodes[0]);
        };
        assert_eq!(block.kind, DelimitedBlockKind::Source);
        assert_eq!(
            block.elements,
            vec![
                Node::text("package main"),
                Node::BlankLine,
                Node::text("func main() {}"),
            ]
        );
    }

    #[test]
    fn test_line_ranges_at_document_level() {
        let fs = files(&[("docs/lines.adoc", "a\nb\nc\nd\ne\nf\ng")]);
        let (nodes, _) = resolve_with(&fs, "include::lines.adoc[lines=1..2;5..7]");
        assert_eq!(
            nodes,
            vec![
                Node::Paragraph(Paragraph::from_lines(["a", "b"])),
                Node::Paragraph(Paragraph::from_lines(["e", "f", "g"])),
            ]
        );
    }

    #[test]
    fn test_line_ranges_in_listing_block_are_concatenated() {
        let fs = files(&[("docs/lines.txt", "a\nb\nc\nd")]);
        let (nodes, _) = resolve_with(&fs, "----\ninclude::lines.txt[lines=1;3..4]\n----");
        let Node::DelimitedBlock(block) = &nodes[0] else {
            panic!("expected block, got {:?}", nodes[0]);
        };
        assert_eq!(
            block.elements,
            vec![Node::text("a"), Node::text("c"), Node::text("d")]
        );
    }

    #[test]
    fn test_tag_selection() {
        let fs = files(&[(
            "docs/tagged.adoc",
            "// tag::intro[]\nintro text\n// end::intro[]\n\nother",
        )]);
        let (nodes, diagnostics) = resolve_with(&fs, "include::tagged.adoc[tag=intro]");
        assert_eq!(nodes, vec![paragraph("intro text")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unclosed_tag_includes_rest_of_file() {
        let fs = files(&[("docs/tagged.adoc", "before\n// tag::open[]\nafter")]);
        let (nodes, diagnostics) = resolve_with(&fs, "include::tagged.adoc[tag=open]");
        assert_eq!(nodes, vec![paragraph("after")]);
        assert_eq!(
            messages(&diagnostics),
            vec!["detected unclosed tag 'open' starting at line 2 of include file: tagged.adoc"]
        );
    }

    #[test]
    fn test_missing_tag_includes_nothing() {
        let fs = files(&[("docs/tagged.adoc", "text")]);
        let (nodes, diagnostics) = resolve_with(&fs, "include::tagged.adoc[tag=nope]");
        assert!(nodes.is_empty());
        assert_eq!(
            messages(&diagnostics),
            vec!["tag 'nope' not found in include file: tagged.adoc"]
        );
    }

    #[test]
    fn test_level_offset_compounds() {
        let fs = files(&[
            ("docs/outer.adoc", "== Outer\n\ninclude::inner.adoc[leveloffset=+1]"),
            ("docs/inner.adoc", "== Inner"),
        ]);
        let (nodes, _) = resolve_with(&fs, "include::outer.adoc[leveloffset=+1]");
        let levels: Vec<usize> = nodes
            .iter()
            .filter_map(|n| match n {
                Node::Section(s) => Some(s.level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![2, 3]);
    }

    #[test]
    fn test_negative_level_offset() {
        let fs = files(&[("docs/chapter.adoc", "=== Deep")]);
        let (nodes, _) = resolve_with(&fs, "include::chapter.adoc[leveloffset=-1]");
        assert_eq!(
            nodes,
            vec![Node::Section(Section {
                level: 1,
                title: SectionTitle {
                    id: "_deep".to_owned(),
                    elements: vec![Node::text("Deep")],
                },
                attributes: ElementAttributes::new(),
                elements: Vec::new(),
            })]
        );
    }

    #[test]
    fn test_include_cycle() {
        let fs = files(&[
            ("docs/a.adoc", "include::b.adoc[]"),
            ("docs/b.adoc", "include::a.adoc[]"),
        ]);
        let (nodes, diagnostics) = resolve_with(&fs, "include::a.adoc[]");
        assert_eq!(
            nodes,
            vec![paragraph(
                "Unresolved directive in b.adoc - include::a.adoc[]"
            )]
        );
        assert_eq!(
            messages(&diagnostics),
            vec!["include cycle detected for 'a.adoc'"]
        );
    }

    #[test]
    fn test_self_include_of_main_document() {
        let fs = files(&[("docs/test.adoc", "include::test.adoc[]")]);
        let (_, diagnostics) = resolve_with(&fs, "include::test.adoc[]");
        assert_eq!(
            messages(&diagnostics),
            vec!["include cycle detected for 'test.adoc'"]
        );
    }

    #[test]
    fn test_max_depth() {
        let grammar = LineGrammar::new();
        let read = |path: &Path| -> io::Result<String> {
            let name = path.file_stem().unwrap().to_string_lossy();
            let next: usize = name.trim_start_matches('f').parse().unwrap();
            Ok(format!("include::f{}.adoc[]", next + 1))
        };
        let mut diagnostics = Diagnostics::new();
        let mut resolver = InclusionResolver::new(&grammar, &read, 3, &mut diagnostics);
        let parsed = vec![Node::FileInclusion(FileInclusion {
            path: "f0.adoc".to_owned(),
            attributes: ElementAttributes::new(),
            raw_text: "include::f0.adoc[]".to_owned(),
        })];
        resolver
            .resolve(parsed, &Origin::new("main.adoc", ""), &mut DocumentAttributes::default())
            .unwrap();
        assert_eq!(
            messages(&diagnostics.into_vec()),
            vec!["maximum include depth (3) exceeded for 'f3.adoc'"]
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(
            normalize_path(Path::new("../../x/y.adoc")),
            PathBuf::from("../../x/y.adoc")
        );
    }
}
