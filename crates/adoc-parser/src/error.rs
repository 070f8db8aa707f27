//! Parser errors.

use adoc_types::DuplicateElementId;

/// Structural error raised while building the document tree.
///
/// These abort the conversion; content problems such as a missing include
/// file are reported as diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A fragment does not have the shape the production requires.
    #[error("malformed fragment: expected {expected}, got {actual}")]
    MalformedFragment {
        expected: &'static str,
        actual: String,
    },
    /// Author line without a name.
    #[error("malformed author: '{0}'")]
    MalformedAuthor(String),
    /// List item marker other than a run of `*` or a single `-`.
    #[error("malformed list item marker: '{0}'")]
    MalformedListMarker(String),
    /// Front matter that is not a YAML mapping.
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(String),
    #[error(transparent)]
    DuplicateElementId(#[from] DuplicateElementId),
}

impl BuildError {
    pub(crate) fn malformed(expected: &'static str, actual: impl Into<String>) -> Self {
        Self::MalformedFragment {
            expected,
            actual: actual.into(),
        }
    }
}
