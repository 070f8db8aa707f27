//! Pre-order traversal with enter/leave callbacks.
//!
//! List items and nested lists are containers: their inline content and
//! nested items are visited, but the callbacks only receive [`Node`]s.

use crate::node::{InlineElements, List, ListItem, Node};

/// Walk `node` and its descendants.
///
/// `enter` runs before a node's children, `leave` after them. The first
/// callback error stops the walk.
pub fn walk<E, F, G>(node: &Node, enter: &mut F, leave: &mut G) -> Result<(), E>
where
    F: FnMut(&Node) -> Result<(), E>,
    G: FnMut(&Node) -> Result<(), E>,
{
    enter(node)?;
    match node {
        Node::Preamble(p) => walk_all(&p.elements, enter, leave)?,
        Node::Section(s) => {
            walk_all(&s.title.elements, enter, leave)?;
            walk_all(&s.elements, enter, leave)?;
        }
        Node::List(l) => walk_list(l, enter, leave)?,
        Node::ListItem(item) => {
            walk_lines(&item.lines, enter, leave)?;
            if let Some(children) = &item.children {
                walk_list(children, enter, leave)?;
            }
        }
        Node::Paragraph(p) => walk_lines(&p.lines, enter, leave)?,
        Node::DelimitedBlock(b) => walk_all(&b.elements, enter, leave)?,
        Node::QuotedText(q) => walk_all(&q.elements, enter, leave)?,
        Node::Passthrough(p) => walk_all(&p.elements, enter, leave)?,
        Node::ExternalLink(l) => walk_all(&l.text, enter, leave)?,
        Node::Footnote(f) => walk_all(&f.elements, enter, leave)?,
        Node::LiteralBlock(_)
        | Node::BlockImage(_)
        | Node::TableOfContentsMacro
        | Node::FileInclusion(_)
        | Node::AttributeDeclaration(_)
        | Node::AttributeReset(_)
        | Node::BlankLine
        | Node::Text(_)
        | Node::CrossReference(_)
        | Node::InlineImage(_)
        | Node::FootnoteReference(_)
        | Node::AttributeSubstitution(_)
        | Node::UserMacro(_) => {}
    }
    leave(node)
}

/// Walk every node of a sequence in order.
pub fn walk_all<E, F, G>(nodes: &[Node], enter: &mut F, leave: &mut G) -> Result<(), E>
where
    F: FnMut(&Node) -> Result<(), E>,
    G: FnMut(&Node) -> Result<(), E>,
{
    for node in nodes {
        walk(node, enter, leave)?;
    }
    Ok(())
}

fn walk_lines<E, F, G>(lines: &[InlineElements], enter: &mut F, leave: &mut G) -> Result<(), E>
where
    F: FnMut(&Node) -> Result<(), E>,
    G: FnMut(&Node) -> Result<(), E>,
{
    for line in lines {
        walk_all(line, enter, leave)?;
    }
    Ok(())
}

fn walk_list<E, F, G>(list: &List, enter: &mut F, leave: &mut G) -> Result<(), E>
where
    F: FnMut(&Node) -> Result<(), E>,
    G: FnMut(&Node) -> Result<(), E>,
{
    for item in &list.items {
        walk_lines(&item.lines, enter, leave)?;
        if let Some(children) = &item.children {
            walk_list(children, enter, leave)?;
        }
    }
    Ok(())
}

/// Visit every node of a sequence in pre-order, with mutable access.
///
/// Children are visited after `visit` returns, so changes it makes to a
/// node's own fields are seen before its descendants are reached.
pub fn walk_mut<E, F>(nodes: &mut [Node], visit: &mut F) -> Result<(), E>
where
    F: FnMut(&mut Node) -> Result<(), E>,
{
    for node in nodes {
        visit(node)?;
        match node {
            Node::Preamble(p) => walk_mut(&mut p.elements, visit)?,
            Node::Section(s) => {
                walk_mut(&mut s.title.elements, visit)?;
                walk_mut(&mut s.elements, visit)?;
            }
            Node::List(l) => walk_items_mut(&mut l.items, visit)?,
            Node::ListItem(item) => walk_items_mut(std::slice::from_mut(item), visit)?,
            Node::Paragraph(p) => {
                for line in &mut p.lines {
                    walk_mut(line, visit)?;
                }
            }
            Node::DelimitedBlock(b) => walk_mut(&mut b.elements, visit)?,
            Node::QuotedText(q) => walk_mut(&mut q.elements, visit)?,
            Node::Passthrough(p) => walk_mut(&mut p.elements, visit)?,
            Node::ExternalLink(l) => walk_mut(&mut l.text, visit)?,
            Node::Footnote(f) => walk_mut(&mut f.elements, visit)?,
            _ => {}
        }
    }
    Ok(())
}

fn walk_items_mut<E, F>(items: &mut [ListItem], visit: &mut F) -> Result<(), E>
where
    F: FnMut(&mut Node) -> Result<(), E>,
{
    for item in items {
        for line in &mut item.lines {
            walk_mut(line, visit)?;
        }
        if let Some(children) = &mut item.children {
            walk_items_mut(&mut children.items, visit)?;
        }
    }
    Ok(())
}
