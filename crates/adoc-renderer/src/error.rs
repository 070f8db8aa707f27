//! Renderer errors.

use adoc_types::NodeKind;

/// Error raised while rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The node cannot appear in a normalized document, such as an include
    /// directive that was never resolved.
    #[error("unsupported element: {kind}")]
    Unsupported { kind: NodeKind },
    /// A child of `kind` failed to render.
    #[error("unable to render {kind}: {source}")]
    Nested {
        kind: NodeKind,
        #[source]
        source: Box<RenderError>,
    },
    /// A user macro template failed.
    #[error("user macro '{name}': {message}")]
    Macro { name: String, message: String },
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

impl RenderError {
    pub(crate) fn within(self, kind: NodeKind) -> Self {
        Self::Nested {
            kind,
            source: Box::new(self),
        }
    }

    /// The innermost error, past every [`RenderError::Nested`] layer.
    #[must_use]
    pub fn root_cause(&self) -> &RenderError {
        match self {
            Self::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
