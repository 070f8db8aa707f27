//! Footnote markers and the footnotes block at the end of the body.

use std::fmt::Write;

use adoc_types::{Footnote, FootnoteReference};

use super::render_inline;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::escape::escape_html;

/// Marker for a footnote with content, numbered by the index it was given
/// during normalization.
pub(super) fn footnote(ctx: &RenderContext<'_>, note: &Footnote) -> Result<String, RenderError> {
    let document = ctx.document();
    let name = note.ref_name.as_deref();
    let Some(index) = note.index.filter(|&i| i < document.footnotes.len()) else {
        return Ok(match name {
            Some(name) => reference(ctx, name)?,
            None => unresolved(""),
        });
    };
    let number = index + 1;
    let mut out = String::from("<sup class=\"footnote\"");
    if let Some(name) = name
        && document.footnote_index(name) == Some(index)
    {
        write!(out, r#" id="_footnote_{}""#, escape_html(name))?;
    }
    write!(
        out,
        r##">[<a id="_footnoteref_{number}" class="footnote" href="#_footnotedef_{number}" title="View footnote.">{number}</a>]</sup>"##
    )?;
    Ok(out)
}

pub(super) fn footnote_reference(
    ctx: &RenderContext<'_>,
    note: &FootnoteReference,
) -> Result<String, RenderError> {
    reference(ctx, &note.name)
}

fn reference(ctx: &RenderContext<'_>, name: &str) -> Result<String, RenderError> {
    let Some(index) = ctx.document().footnote_index(name) else {
        tracing::warn!(name, "Unresolved footnote reference");
        return Ok(unresolved(name));
    };
    let number = index + 1;
    let mut out = String::new();
    write!(
        out,
        r##"<sup class="footnoteref">[<a class="footnote" href="#_footnotedef_{number}" title="View footnote.">{number}</a>]</sup>"##
    )?;
    Ok(out)
}

fn unresolved(name: &str) -> String {
    format!(
        r#"<sup class="footnoteref red" title="Unresolved footnote reference.">[{}]</sup>"#,
        escape_html(name)
    )
}

/// Footnote definitions, or nothing when the document has no footnotes.
pub(super) fn footnotes_block(ctx: &mut RenderContext<'_>) -> Result<String, RenderError> {
    let document = ctx.document();
    if !document.has_footnotes() {
        return Ok(String::new());
    }
    let mut out = String::from("\n<div id=\"footnotes\">\n<hr>");
    for (index, note) in document.footnotes.iter().enumerate() {
        let number = index + 1;
        let content = render_inline(ctx, &note.elements)?;
        write!(
            out,
            "\n<div class=\"footnote\" id=\"_footnotedef_{number}\">\n<a href=\"#_footnoteref_{number}\">{number}</a>. {}\n</div>",
            content.trim()
        )?;
    }
    out.push_str("\n</div>");
    Ok(out)
}
