//! Section hierarchy from a flat block sequence.

use adoc_types::{Node, Section};

/// Nest blocks under the sections that precede them.
///
/// A section owns every following block up to the next section of the same
/// or a lower level. Levels below 1 are raised to 1.
#[must_use]
pub fn nest_sections(blocks: Vec<Node>) -> Vec<Node> {
    let mut roots = Vec::with_capacity(blocks.len());
    let mut open: Vec<Section> = Vec::new();

    for block in blocks {
        match block {
            Node::Section(mut section) => {
                if section.level < 1 {
                    tracing::debug!(title_id = %section.title.id, "raising section level to 1");
                    section.level = 1;
                }
                while open.last().is_some_and(|s| s.level >= section.level) {
                    close_last(&mut open, &mut roots);
                }
                open.push(section);
            }
            other => match open.last_mut() {
                Some(section) => section.elements.push(other),
                None => roots.push(other),
            },
        }
    }
    while !open.is_empty() {
        close_last(&mut open, &mut roots);
    }
    roots
}

fn close_last(open: &mut Vec<Section>, roots: &mut Vec<Node>) {
    let Some(section) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some(parent) => parent.elements.push(Node::Section(section)),
        None => roots.push(Node::Section(section)),
    }
}
