//! Generic fragment operations: merging, stringifying and filtering.

use adoc_types::{Fragment, Node};

use crate::error::BuildError;

/// Merge adjacent text into single string nodes.
///
/// Text, bytes and string nodes accumulate into one buffer; any other node
/// flushes the buffer and is kept as-is. Groups are merged recursively into
/// the same sequence.
#[must_use]
pub fn merge(fragments: Vec<Fragment>) -> Vec<Node> {
    let mut merger = Merger::default();
    merger.push_all(fragments);
    merger.finish()
}

#[derive(Default)]
struct Merger {
    buffer: String,
    result: Vec<Node>,
}

impl Merger {
    fn push_all(&mut self, fragments: Vec<Fragment>) {
        for fragment in fragments {
            self.push(fragment);
        }
    }

    fn push(&mut self, fragment: Fragment) {
        match fragment {
            Fragment::Text(text) => self.buffer.push_str(&text),
            Fragment::Bytes(bytes) => self.buffer.push_str(&String::from_utf8_lossy(&bytes)),
            Fragment::Group(group) => self.push_all(group),
            Fragment::Node(Node::Text(s)) => self.buffer.push_str(&s.content),
            Fragment::Node(node) => {
                self.flush();
                self.result.push(node);
            }
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.result.push(Node::text(std::mem::take(&mut self.buffer)));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush();
        self.result
    }
}

/// Post-processing applied by [`stringify`], in the order given.
#[derive(Debug, Clone, Copy)]
pub enum StringifyOption<'a> {
    Trim,
    TrimPrefix(&'a str),
    TrimSuffix(&'a str),
    Replace(&'a str, &'a str),
}

/// Merge fragments and require the result to be plain text.
pub fn stringify(
    fragments: Vec<Fragment>,
    options: &[StringifyOption<'_>],
) -> Result<String, BuildError> {
    let mut text = String::new();
    for node in merge(fragments) {
        match node {
            Node::Text(s) => text.push_str(&s.content),
            other => return Err(BuildError::malformed("text", other.kind().name())),
        }
    }
    for option in options {
        text = match *option {
            StringifyOption::Trim => text.trim().to_owned(),
            StringifyOption::TrimPrefix(prefix) => {
                text.strip_prefix(prefix).unwrap_or(&text).to_owned()
            }
            StringifyOption::TrimSuffix(suffix) => {
                text.strip_suffix(suffix).unwrap_or(&text).to_owned()
            }
            StringifyOption::Replace(from, to) => text.replace(from, to),
        };
    }
    Ok(text)
}

/// Turn block-level fragments into nodes, dropping blank lines and empty
/// preambles and flattening groups.
pub fn filter_unrelevant_elements(fragments: Vec<Fragment>) -> Result<Vec<Node>, BuildError> {
    let mut result = Vec::with_capacity(fragments.len());
    collect_relevant(fragments, &mut result)?;
    Ok(result)
}

fn collect_relevant(fragments: Vec<Fragment>, result: &mut Vec<Node>) -> Result<(), BuildError> {
    for fragment in fragments {
        match fragment {
            Fragment::Group(group) => collect_relevant(group, result)?,
            Fragment::Node(Node::BlankLine) => {}
            Fragment::Node(Node::Preamble(p)) if p.elements.is_empty() => {}
            Fragment::Node(node) => result.push(node),
            other @ (Fragment::Text(_) | Fragment::Bytes(_)) => {
                return Err(BuildError::malformed("block element", other.describe()));
            }
        }
    }
    Ok(())
}

/// Turn block-level fragments into nodes, keeping blank lines.
pub fn block_nodes(fragments: Vec<Fragment>) -> Result<Vec<Node>, BuildError> {
    let mut result = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match fragment {
            Fragment::Group(group) => result.extend(block_nodes(group)?),
            Fragment::Node(node) => result.push(node),
            other @ (Fragment::Text(_) | Fragment::Bytes(_)) => {
                return Err(BuildError::malformed("block element", other.describe()));
            }
        }
    }
    Ok(result)
}
