//! Status reporting on stderr.
//!
//! Standard output carries the converted document, so every message from
//! the converter itself goes to stderr.

use std::path::Path;

use adoc_parser::{Diagnostic, Level};
use console::{Style, Term};

/// Reporter for conversion progress and problems.
pub(crate) struct Output {
    term: Term,
    written: Style,
    warning: Style,
    error: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            written: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
        }
    }

    /// Confirm the output file, in green.
    pub(crate) fn written(&self, path: &Path) {
        self.line(&self.written, &format!("Wrote {}", path.display()));
    }

    /// A parser diagnostic, yellow for warnings and red for errors.
    pub(crate) fn diagnostic(&self, diagnostic: &Diagnostic) {
        let style = match diagnostic.level {
            Level::Warning => &self.warning,
            Level::Error => &self.error,
        };
        self.line(style, &diagnostic.to_string());
    }

    /// Number of diagnostics, when there were any.
    pub(crate) fn summary(&self, problems: usize) {
        if problems > 0 {
            let _ = self
                .term
                .write_line(&format!("{problems} problem(s) reported during conversion"));
        }
    }

    /// The error that stopped the conversion.
    pub(crate) fn failure(&self, err: &dyn std::error::Error) {
        self.line(&self.error, &format!("Error: {err}"));
    }

    fn line(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
