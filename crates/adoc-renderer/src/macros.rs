//! User macro templates.
//!
//! The parser keeps `name:value[attrs]` and `name::value[attrs]` macros it
//! does not know as [`UserMacro`] nodes. A template registered under the
//! macro's name renders them; without one the macro's source text is shown.

use adoc_types::UserMacro;

use crate::context::RenderContext;
use crate::error::RenderError;

/// Renders user macros of one name.
///
/// # Example
///
/// ```
/// use adoc_renderer::{RenderContext, RenderError, UserMacroTemplate};
/// use adoc_types::UserMacro;
///
/// struct Hello;
///
/// impl UserMacroTemplate for Hello {
///     fn name(&self) -> &str {
///         "hello"
///     }
///
///     fn render(&self, _ctx: &RenderContext<'_>, m: &UserMacro) -> Result<String, RenderError> {
///         Ok(format!("<span>Hello, {}!</span>", m.value))
///     }
/// }
/// ```
pub trait UserMacroTemplate {
    /// Macro name this template handles.
    fn name(&self) -> &str;

    /// Render one macro occurrence.
    fn render(&self, ctx: &RenderContext<'_>, user_macro: &UserMacro)
    -> Result<String, RenderError>;
}

/// Templates by macro name.
#[derive(Default)]
pub struct MacroRegistry {
    templates: Vec<Box<dyn UserMacroTemplate>>,
}

impl MacroRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. A later template for the same name wins.
    pub fn register<T: UserMacroTemplate + 'static>(&mut self, template: T) {
        self.templates.retain(|t| t.name() != template.name());
        self.templates.push(Box::new(template));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn UserMacroTemplate> {
        self.templates
            .iter()
            .find(|t| t.name() == name)
            .map(Box::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
