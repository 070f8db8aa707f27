//! Attribute lists: the `key=value,positional` text between brackets.

use adoc_types::Fragment;

/// Split an attribute list into fragments.
///
/// `key=value` items become `[key, value]` groups, other items stay text.
/// Commas inside double quotes do not split; surrounding quotes are removed.
pub fn parse_attribute_list(text: &str) -> Vec<Fragment> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    split_items(text)
        .into_iter()
        .map(|item| match split_named(item) {
            Some((key, value)) => Fragment::Group(vec![key.into(), unquote(value).into()]),
            None => Fragment::Text(unquote(item).to_owned()),
        })
        .collect()
}

fn split_items(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(text[start..].trim());
    items
}

fn split_named(item: &str) -> Option<(&str, &str)> {
    let (key, value) = item.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.contains('"') || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
