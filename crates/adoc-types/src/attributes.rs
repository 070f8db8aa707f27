//! Element attributes and document attributes.

use std::collections::BTreeMap;
use std::fmt;

/// Attribute key holding an explicit element ID.
pub const ATTR_ID: &str = "id";
/// Attribute key holding an element title.
pub const ATTR_TITLE: &str = "title";
/// Attribute key holding a link target (images).
pub const ATTR_LINK: &str = "link";
/// Attribute key holding the admonition kind.
pub const ATTR_ADMONITION: &str = "admonition";
/// Attribute key holding a source block language.
pub const ATTR_LANGUAGE: &str = "language";
/// Attribute key holding the block style (`source`, `verse`, `quote`...).
pub const ATTR_STYLE: &str = "style";
/// Attribute key holding the first part of a quote attribution.
pub const ATTR_QUOTE_AUTHOR: &str = "attribution";
/// Attribute key holding the cited title of a quote attribution.
pub const ATTR_QUOTE_TITLE: &str = "citetitle";

/// Kind of an admonition block or paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AdmonitionKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AdmonitionKind {
    /// Parse an admonition label such as `NOTE` (case-sensitive, upper case).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "NOTE" => Some(Self::Note),
            "TIP" => Some(Self::Tip),
            "IMPORTANT" => Some(Self::Important),
            "WARNING" => Some(Self::Warning),
            "CAUTION" => Some(Self::Caution),
            _ => None,
        }
    }

    /// CSS class name (`note`, `tip`...).
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    /// Human-readable title (`Note`, `Tip`...).
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }
}

/// Value stored under an element attribute key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttributeValue {
    Str(String),
    /// Attribute present without a value.
    Flag,
    Admonition(AdmonitionKind),
}

impl AttributeValue {
    /// String content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Flag | Self::Admonition(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<AdmonitionKind> for AttributeValue {
    fn from(value: AdmonitionKind) -> Self {
        Self::Admonition(value)
    }
}

/// Attributes attached to a structural element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementAttributes(BTreeMap<String, AttributeValue>);

impl ElementAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<AttributeValue>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Add every entry of `other`, overwriting existing keys.
    pub fn extend(&mut self, other: ElementAttributes) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    /// String value stored under `key`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(AttributeValue::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_str(ATTR_ID)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get_str(ATTR_TITLE).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn admonition(&self) -> Option<AdmonitionKind> {
        match self.0.get(ATTR_ADMONITION) {
            Some(AttributeValue::Admonition(kind)) => Some(*kind),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for ElementAttributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Document-level attributes. Keys are unique, later values win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DocumentAttributes(BTreeMap<String, String>);

impl DocumentAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn reset(&mut self, name: &str) {
        self.0.remove(name);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Copy every entry of `other` over this map.
    pub fn merge(&mut self, other: &DocumentAttributes) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every `{name}` placeholder with its value.
    ///
    /// Placeholders without a value stay as written.
    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) if is_attribute_name(&after[..end]) => {
                    let name = &after[..end];
                    match self.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DocumentAttributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for AdmonitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Whether `name` is a valid attribute name (`[A-Za-z0-9_][A-Za-z0-9_-]*`).
#[must_use]
pub fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_known_attribute() {
        let attrs: DocumentAttributes = [("includedir", "../../test/includes")].into_iter().collect();
        assert_eq!(
            attrs.substitute("{includedir}/chapter-a.adoc"),
            "../../test/includes/chapter-a.adoc"
        );
    }

    #[test]
    fn test_substitute_keeps_unknown_placeholder() {
        let attrs = DocumentAttributes::new();
        assert_eq!(
            attrs.substitute("{includedir}/chapter-a.adoc"),
            "{includedir}/chapter-a.adoc"
        );
    }

    #[test]
    fn test_substitute_ignores_non_attribute_braces() {
        let attrs: DocumentAttributes = [("a", "x")].into_iter().collect();
        assert_eq!(attrs.substitute("{ not } {a} {"), "{ not } x {");
    }

    #[test]
    fn test_admonition_lookup() {
        let attrs = ElementAttributes::new().with(ATTR_ADMONITION, AdmonitionKind::Tip);
        assert_eq!(attrs.admonition(), Some(AdmonitionKind::Tip));
        assert_eq!(attrs.get_str(ATTR_ADMONITION), None);
    }

    #[test]
    fn test_empty_title_is_absent() {
        let attrs = ElementAttributes::new().with(ATTR_TITLE, "");
        assert_eq!(attrs.title(), None);
    }
}
