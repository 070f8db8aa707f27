//! Inline content: quoted text, passthroughs, macros, links and footnotes.

use std::sync::LazyLock;

use adoc_types::{Fragment, PassthroughKind, QuotedTextKind, UserMacroKind, is_attribute_name};
use regex::Regex;

use super::attributes::parse_attribute_list;
use crate::builder;
use crate::error::BuildError;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https?|ftp|irc)://[^\s\[\]<>]+").unwrap());

static INLINE_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+):([^\s\[\]:](?:[^\[\]:]*[^\s\[\]:])?)?\[").unwrap()
});

static FOOTNOTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*\[").unwrap());

/// A recognized inline element and the number of bytes it spans.
type Matched = Option<(Fragment, usize)>;

/// Parse one line of inline content.
pub fn parse_inline(text: &str) -> Result<Vec<Fragment>, BuildError> {
    let mut fragments = Vec::new();
    let mut buffer = String::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let prev = text[..pos].chars().next_back();
        if let Some((fragment, consumed)) = match_element(rest, prev)? {
            if !buffer.is_empty() {
                fragments.push(Fragment::Text(std::mem::take(&mut buffer)));
            }
            fragments.push(fragment);
            pos += consumed;
        } else {
            let Some(c) = rest.chars().next() else {
                break;
            };
            buffer.push(c);
            pos += c.len_utf8();
        }
    }
    if !buffer.is_empty() {
        fragments.push(Fragment::Text(buffer));
    }
    Ok(fragments)
}

fn match_element(rest: &str, prev: Option<char>) -> Result<Matched, BuildError> {
    let boundary = prev.is_none_or(|c| !c.is_alphanumeric());

    if boundary {
        if let Some(found) = footnote(rest)? {
            return Ok(Some(found));
        }
        if let Some(found) = pass_macro(rest) {
            return Ok(Some(found));
        }
        if let Some(found) = inline_image(rest)? {
            return Ok(Some(found));
        }
        if let Some(found) = link(rest)? {
            return Ok(Some(found));
        }
    }
    if let Some(found) = triple_plus(rest) {
        return Ok(Some(found));
    }
    if let Some(found) = cross_reference(rest) {
        return Ok(Some(found));
    }
    if let Some(found) = attribute_substitution(rest) {
        return Ok(Some(found));
    }
    if boundary {
        if let Some(found) = constrained(rest)? {
            return Ok(Some(found));
        }
        if let Some(found) = user_macro(rest)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Byte index of the `]` matching the `[` at index 0.
fn closing_bracket(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn footnote(rest: &str) -> Result<Matched, BuildError> {
    if let Some(after) = rest.strip_prefix("footnoteref:") {
        let prefix = rest.len() - after.len();
        if !after.starts_with('[') {
            return Ok(None);
        }
        let Some(end) = closing_bracket(after) else {
            return Ok(None);
        };
        let content = &after[1..end];
        let node = match content.split_once(',') {
            Some((name, text)) => builder::new_footnote(Some(name), parse_inline(text.trim())?),
            None => builder::new_footnote_reference(content),
        };
        return Ok(Some((node.into(), prefix + end + 1)));
    }

    let Some(after) = rest.strip_prefix("footnote:") else {
        return Ok(None);
    };
    let prefix = rest.len() - after.len();
    let Some(name_match) = FOOTNOTE_NAME.find(after) else {
        return Ok(None);
    };
    let name = &after[..name_match.end() - 1];
    let bracket = &after[name.len()..];
    let Some(end) = closing_bracket(bracket) else {
        return Ok(None);
    };
    let content = bracket[1..end].trim();
    let node = if name.is_empty() {
        builder::new_footnote(None, parse_inline(content)?)
    } else if content.is_empty() {
        builder::new_footnote_reference(name)
    } else {
        builder::new_footnote(Some(name), parse_inline(content)?)
    };
    Ok(Some((node.into(), prefix + name.len() + end + 1)))
}

fn pass_macro(rest: &str) -> Matched {
    let after = rest.strip_prefix("pass:")?;
    if !after.starts_with('[') {
        return None;
    }
    let end = closing_bracket(after)?;
    let node = builder::new_passthrough(PassthroughKind::Macro, vec![after[1..end].into()]);
    Some((node.into(), 5 + end + 1))
}

fn triple_plus(rest: &str) -> Matched {
    let after = rest.strip_prefix("+++")?;
    let end = after.find("+++")?;
    let node = builder::new_passthrough(PassthroughKind::TriplePlus, vec![after[..end].into()]);
    Some((node.into(), 3 + end + 3))
}

fn cross_reference(rest: &str) -> Matched {
    let after = rest.strip_prefix("<<")?;
    let end = after.find(">>")?;
    let content = &after[..end];
    let (id, label) = match content.split_once(',') {
        Some((id, label)) => (id, Some(label)),
        None => (content, None),
    };
    if id.trim().is_empty() || id.trim().contains(char::is_whitespace) {
        return None;
    }
    Some((builder::new_cross_reference(id, label).into(), 2 + end + 2))
}

fn inline_image(rest: &str) -> Result<Matched, BuildError> {
    let Some(after) = rest.strip_prefix("image:") else {
        return Ok(None);
    };
    if after.starts_with(':') {
        return Ok(None);
    }
    let Some(open) = after.find('[') else {
        return Ok(None);
    };
    let path = &after[..open];
    if path.is_empty() || path.contains(char::is_whitespace) {
        return Ok(None);
    }
    let Some(end) = closing_bracket(&after[open..]) else {
        return Ok(None);
    };
    let attrs = builder::new_element_attributes(parse_attribute_list(
        &after[open + 1..open + end],
    ))?;
    let node = builder::new_inline_image(vec![path.into()], attrs)?;
    Ok(Some((node.into(), 6 + open + end + 1)))
}

fn link(rest: &str) -> Result<Matched, BuildError> {
    let Some(url_match) = URL.find(rest) else {
        return Ok(None);
    };
    let url = url_match.as_str();
    let after = &rest[url.len()..];
    if after.starts_with('[')
        && let Some(end) = closing_bracket(after)
    {
        let text = parse_inline(&after[1..end])?;
        let node = builder::new_external_link(url, text);
        return Ok(Some((node.into(), url.len() + end + 1)));
    }
    let url = url.trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
    Ok(Some((builder::new_external_link(url, Vec::new()).into(), url.len())))
}

fn attribute_substitution(rest: &str) -> Matched {
    let after = rest.strip_prefix('{')?;
    let end = after.find('}')?;
    let name = &after[..end];
    if !is_attribute_name(name) {
        return None;
    }
    Some((builder::new_attribute_substitution(name).into(), end + 2))
}

/// `*bold*`, `_italic_`, `` `mono` `` and `+passthrough+`.
///
/// The opening mark must not be followed by a space and the closing mark must
/// not be preceded by a space nor followed by a letter or digit.
fn constrained(rest: &str) -> Result<Matched, BuildError> {
    let Some(mark) = rest.chars().next() else {
        return Ok(None);
    };
    if !matches!(mark, '*' | '_' | '`' | '+') {
        return Ok(None);
    }
    let body = &rest[1..];
    if body.starts_with(char::is_whitespace) || body.starts_with(mark) {
        return Ok(None);
    }
    let mut close = None;
    for (i, c) in body.char_indices() {
        if c != mark || i == 0 {
            continue;
        }
        let before = body[..i].chars().next_back();
        let after = body[i + 1..].chars().next();
        if before.is_some_and(|b| !b.is_whitespace()) && after.is_none_or(|a| !a.is_alphanumeric()) {
            close = Some(i);
            break;
        }
    }
    let Some(close) = close else {
        return Ok(None);
    };
    let content = &body[..close];
    let node = match mark {
        '*' => builder::new_quoted_text(QuotedTextKind::Bold, parse_inline(content)?),
        '_' => builder::new_quoted_text(QuotedTextKind::Italic, parse_inline(content)?),
        '`' => builder::new_quoted_text(QuotedTextKind::Monospace, parse_inline(content)?),
        _ => builder::new_passthrough(PassthroughKind::SinglePlus, vec![content.into()]),
    };
    Ok(Some((node.into(), close + 2)))
}

fn user_macro(rest: &str) -> Result<Matched, BuildError> {
    let Some(caps) = INLINE_MACRO.captures(rest) else {
        return Ok(None);
    };
    let Some(whole) = caps.get(0) else {
        return Ok(None);
    };
    let open = whole.end() - 1;
    let Some(end) = closing_bracket(&rest[open..]) else {
        return Ok(None);
    };
    let name = caps.get(1).map_or("", |m| m.as_str());
    let value = caps.get(2).map_or("", |m| m.as_str());
    let raw_text = &rest[..=open + end];
    let attrs = builder::new_element_attributes(parse_attribute_list(&rest[open + 1..open + end]))?;
    let node = builder::new_user_macro(UserMacroKind::Inline, name, value, attrs, raw_text)?;
    Ok(Some((node.into(), raw_text.len())))
}
