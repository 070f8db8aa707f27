//! AsciiDoc parsing into a normalized document tree.
//!
//! The pipeline runs in stages:
//!
//! 1. A [`GrammarEngine`] turns source text into raw [`Fragment`](adoc_types::Fragment)s.
//! 2. The [`builder`] turns fragments into typed nodes.
//! 3. The [`InclusionResolver`] expands `include::` directives, feeding
//!    included text back through the grammar and the builder.
//! 4. Sections are nested and the [`normalize`] pass adds the preamble, the
//!    table of contents and the ID and footnote indexes.
//!
//! Structural problems abort with a [`BuildError`]. Content problems, such
//! as a missing include file, become [`Diagnostic`]s and a visible
//! placeholder in the tree.
//!
//! # Example
//!
//! ```
//! use adoc_parser::Parser;
//!
//! let result = Parser::new().parse("== Hello\n\nSome *bold* text.").unwrap();
//! assert!(result.document.element_references.get("_hello").is_some());
//! ```

pub mod builder;
mod diagnostics;
mod error;
pub mod grammar;
pub mod include;
pub mod normalize;
mod parser;

pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use error::BuildError;
pub use grammar::{ContentMode, GrammarEngine, LineGrammar, RawDocument};
pub use include::{InclusionResolver, Origin};
pub use parser::{ParseError, ParseResult, Parser, ParserConfig, ReadFileFn};
