//! Raw fragments produced by a grammar engine.

use crate::node::Node;

/// Untyped output of one grammar production.
///
/// The tree builder turns fragments into typed [`Node`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Bytes(Vec<u8>),
    Group(Vec<Fragment>),
    Node(Node),
}

impl Fragment {
    /// Short description of the fragment shape for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Text(t) => format!("text '{t}'"),
            Self::Bytes(b) => format!("{} bytes", b.len()),
            Self::Group(g) => format!("group of {}", g.len()),
            Self::Node(n) => n.kind().name().to_owned(),
        }
    }
}

impl From<&str> for Fragment {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Fragment {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Node> for Fragment {
    fn from(value: Node) -> Self {
        Self::Node(value)
    }
}

impl From<Vec<Fragment>> for Fragment {
    fn from(value: Vec<Fragment>) -> Self {
        Self::Group(value)
    }
}
