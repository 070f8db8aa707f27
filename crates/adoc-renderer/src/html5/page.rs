//! Standalone HTML page around the rendered body.

use std::fmt::Write;

use adoc_types::{DocumentAttributes, plain_text};

use super::render_inline;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::escape::escape_html;

pub(super) fn standalone(ctx: &mut RenderContext<'_>, body: &str) -> Result<String, RenderError> {
    let document = ctx.document();
    let attrs = &document.attributes;
    let plain_title = document
        .title
        .as_deref()
        .map(plain_text)
        .filter(|t| !t.is_empty());

    let mut out = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <meta name=\"generator\" content=\"adoc\">",
    );
    for name in ["description", "author"] {
        if let Some(value) = attrs.get(name) {
            write!(
                out,
                "\n<meta name=\"{name}\" content=\"{}\">",
                escape_html(value)
            )?;
        }
    }
    write!(
        out,
        "\n<title>{}</title>\n</head>\n<body class=\"article\">\n<div id=\"header\">",
        escape_html(plain_title.as_deref().unwrap_or("Untitled"))
    )?;
    if let Some(title) = &document.title
        && !title.is_empty()
    {
        write!(out, "\n<h1>{}</h1>", render_inline(ctx, title)?)?;
    }
    details(&mut out, attrs)?;
    write!(out, "\n</div>\n<div id=\"content\">\n{body}\n</div>")?;
    out.push_str("\n<div id=\"footer\">\n<div id=\"footer-text\">");
    if let Some(version) = attrs.get("revnumber") {
        write!(out, "\nVersion {}", escape_html(version))?;
    }
    out.push_str("\n</div>\n</div>\n</body>\n</html>");
    Ok(out)
}

/// Author and revision line under the title.
fn details(out: &mut String, attrs: &DocumentAttributes) -> Result<(), RenderError> {
    let author = attrs.get("author");
    let revnumber = attrs.get("revnumber");
    let revdate = attrs.get("revdate");
    if author.is_none() && revnumber.is_none() && revdate.is_none() {
        return Ok(());
    }
    out.push_str("\n<div class=\"details\">");
    if let Some(author) = author {
        write!(
            out,
            "\n<span id=\"author\" class=\"author\">{}</span><br>",
            escape_html(author)
        )?;
    }
    if let Some(email) = attrs.get("email") {
        let email = escape_html(email);
        write!(
            out,
            "\n<span id=\"email\" class=\"email\"><a href=\"mailto:{email}\">{email}</a></span><br>"
        )?;
    }
    if let Some(number) = revnumber {
        write!(
            out,
            "\n<span id=\"revnumber\">version {}{}</span>",
            escape_html(number),
            if revdate.is_some() { "," } else { "" }
        )?;
    }
    if let Some(date) = revdate {
        write!(out, "\n<span id=\"revdate\">{}</span>", escape_html(date))?;
    }
    if let Some(remark) = attrs.get("revremark") {
        write!(out, "\n<br><span id=\"revremark\">{}</span>", escape_html(remark))?;
    }
    out.push_str("\n</div>");
    Ok(())
}
