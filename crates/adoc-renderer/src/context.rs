//! State carried through one rendering pass.

use std::ops::{Deref, DerefMut};

use adoc_types::{Document, DocumentAttributes};

use crate::macros::MacroRegistry;

/// Mutable state shared by every render function of one document.
///
/// The context borrows the document for the whole pass. Besides the
/// document it tracks the flags that delimited blocks and section title
/// copies switch on for their content, the example block counter, and the
/// document attributes as declared so far.
pub struct RenderContext<'a> {
    document: &'a Document,
    macros: &'a MacroRegistry,
    attributes: DocumentAttributes,
    within_delimited_block: bool,
    include_blank_lines: bool,
    within_title_copy: bool,
    example_counter: usize,
}

impl<'a> RenderContext<'a> {
    #[must_use]
    pub fn new(document: &'a Document, macros: &'a MacroRegistry) -> Self {
        Self {
            document,
            macros,
            attributes: document.attributes.clone(),
            within_delimited_block: false,
            include_blank_lines: false,
            within_title_copy: false,
            example_counter: 0,
        }
    }

    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.document
    }

    #[must_use]
    pub fn macros(&self) -> &'a MacroRegistry {
        self.macros
    }

    /// Attributes in effect at the current point of the document.
    #[must_use]
    pub fn attributes(&self) -> &DocumentAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut DocumentAttributes {
        &mut self.attributes
    }

    #[must_use]
    pub fn within_delimited_block(&self) -> bool {
        self.within_delimited_block
    }

    /// Set the flag and return its previous value.
    pub fn set_within_delimited_block(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.within_delimited_block, value)
    }

    #[must_use]
    pub fn include_blank_lines(&self) -> bool {
        self.include_blank_lines
    }

    /// Set the flag and return its previous value.
    pub fn set_include_blank_lines(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.include_blank_lines, value)
    }

    /// Whether a section title is being rendered outside its heading, in a
    /// TOC entry or a cross reference label.
    #[must_use]
    pub fn within_title_copy(&self) -> bool {
        self.within_title_copy
    }

    /// Set the flag and return its previous value.
    pub fn set_within_title_copy(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.within_title_copy, value)
    }

    /// Number for the next titled example block, starting at 1.
    pub fn next_example_number(&mut self) -> usize {
        self.example_counter += 1;
        self.example_counter
    }

    /// Open a scope whose flag changes are undone when it is dropped.
    pub fn scope(&mut self) -> FlagScope<'_, 'a> {
        FlagScope {
            within_delimited_block: self.within_delimited_block,
            include_blank_lines: self.include_blank_lines,
            within_title_copy: self.within_title_copy,
            context: self,
        }
    }
}

/// Guard restoring the render flags on drop, including early `?` returns.
pub struct FlagScope<'c, 'a> {
    context: &'c mut RenderContext<'a>,
    within_delimited_block: bool,
    include_blank_lines: bool,
    within_title_copy: bool,
}

impl FlagScope<'_, '_> {
    #[must_use]
    pub fn with_within_delimited_block(self, value: bool) -> Self {
        self.context.set_within_delimited_block(value);
        self
    }

    #[must_use]
    pub fn with_include_blank_lines(self, value: bool) -> Self {
        self.context.set_include_blank_lines(value);
        self
    }

    #[must_use]
    pub fn with_within_title_copy(self, value: bool) -> Self {
        self.context.set_within_title_copy(value);
        self
    }
}

impl<'a> Deref for FlagScope<'_, 'a> {
    type Target = RenderContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl DerefMut for FlagScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl Drop for FlagScope<'_, '_> {
    fn drop(&mut self) {
        self.context
            .set_within_delimited_block(self.within_delimited_block);
        self.context.set_include_blank_lines(self.include_blank_lines);
        self.context.set_within_title_copy(self.within_title_copy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail(ctx: &mut RenderContext<'_>) -> Result<(), &'static str> {
        let scope = ctx.scope().with_within_delimited_block(true);
        assert!(scope.within_delimited_block());
        Err("stop")
    }

    #[test]
    fn test_setters_return_previous_value() {
        let document = Document::default();
        let macros = MacroRegistry::new();
        let mut ctx = RenderContext::new(&document, &macros);
        assert!(!ctx.set_include_blank_lines(true));
        assert!(ctx.set_include_blank_lines(false));
        assert!(!ctx.set_within_delimited_block(true));
    }

    #[test]
    fn test_scope_restores_flags() {
        let document = Document::default();
        let macros = MacroRegistry::new();
        let mut ctx = RenderContext::new(&document, &macros);
        {
            let scope = ctx
                .scope()
                .with_within_delimited_block(true)
                .with_include_blank_lines(true)
                .with_within_title_copy(true);
            assert!(scope.within_delimited_block());
            assert!(scope.include_blank_lines());
            assert!(scope.within_title_copy());
        }
        assert!(!ctx.within_delimited_block());
        assert!(!ctx.include_blank_lines());
        assert!(!ctx.within_title_copy());
    }

    #[test]
    fn test_scope_restores_flags_on_error() {
        let document = Document::default();
        let macros = MacroRegistry::new();
        let mut ctx = RenderContext::new(&document, &macros);
        assert!(fail(&mut ctx).is_err());
        assert!(!ctx.within_delimited_block());
    }

    #[test]
    fn test_example_counter() {
        let document = Document::default();
        let macros = MacroRegistry::new();
        let mut ctx = RenderContext::new(&document, &macros);
        assert_eq!(ctx.next_example_number(), 1);
        assert_eq!(ctx.next_example_number(), 2);
    }
}
