//! Nested list reconstruction.
//!
//! The grammar sees list items one line at a time and only knows each item's
//! marker. Items are collected flat and the hierarchy is rebuilt here.

use adoc_types::{ElementAttributes, Fragment, List, ListItem, Node};

use super::fragments::merge;
use crate::error::BuildError;

/// List item from its marker (`*`, `**`..., or `-`) and content lines.
pub fn new_list_item(marker: &str, lines: Vec<Vec<Fragment>>) -> Result<Node, BuildError> {
    let level = match marker {
        "-" => 1,
        m if !m.is_empty() && m.chars().all(|c| c == '*') => m.len(),
        other => return Err(BuildError::MalformedListMarker(other.to_owned())),
    };
    Ok(Node::ListItem(ListItem {
        level,
        lines: lines.into_iter().map(merge).collect(),
        children: None,
    }))
}

/// Build a list from flat items.
///
/// An item's level is clamped to one more than the level of the item before
/// it (the first item is level 1). Items deeper than 1 become children of the
/// last item seen at the level above.
pub fn new_list(
    items: Vec<Fragment>,
    attributes: ElementAttributes,
) -> Result<Node, BuildError> {
    // Open items, one per level: `open[n]` is the last item seen at level n+1.
    let mut open: Vec<ListItem> = Vec::new();
    let mut roots: Vec<ListItem> = Vec::new();

    for fragment in items {
        let mut item = match fragment {
            Fragment::Node(Node::ListItem(item)) => item,
            other => return Err(BuildError::malformed("list item", other.describe())),
        };
        item.level = item.level.clamp(1, open.len() + 1);
        while open.len() >= item.level {
            close_last(&mut open, &mut roots);
        }
        open.push(item);
    }
    while !open.is_empty() {
        close_last(&mut open, &mut roots);
    }

    if roots.is_empty() {
        return Err(BuildError::malformed("list item", "empty list"));
    }
    Ok(Node::List(List {
        attributes,
        items: roots,
    }))
}

fn close_last(open: &mut Vec<ListItem>, roots: &mut Vec<ListItem>) {
    let Some(item) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some(parent) => parent
            .children
            .get_or_insert_with(List::default)
            .items
            .push(item),
        None => roots.push(item),
    }
}
