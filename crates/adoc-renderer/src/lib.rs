//! HTML5 rendering of normalized AsciiDoc documents.
//!
//! [`Html5Renderer`] walks a [`Document`](adoc_types::Document) produced by
//! `adoc-parser` and returns either the body fragment or a complete page.
//! Rendering state (the running attributes, the delimited-block flags and the
//! example counter) lives in a [`RenderContext`] owned by one pass.
//!
//! User macros the parser does not know are rendered by
//! [`UserMacroTemplate`]s registered on the renderer.

mod context;
mod error;
mod escape;
mod html5;
mod macros;

pub use context::{FlagScope, RenderContext};
pub use error::RenderError;
pub use escape::escape_html;
pub use html5::{Html5Renderer, render, render_elements, render_inline};
pub use macros::{MacroRegistry, UserMacroTemplate};
