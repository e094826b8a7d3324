//! Template rendering.

use std::io::Write;
use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Error, Result};

const TEMPLATE_NAME: &str = "document";

/// A document ready for rendering.
///
/// Templates see the fields as `Title` and `Body`. `Title` is plain text and is
/// escaped on output (`{{Title}}`); `Body` is already markup and must be
/// embedded raw (`{{{Body}}}`).
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "Title")]
    pub title: String,
}

impl Document {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A compiled page template.
pub struct Template {
    registry: Handlebars<'static>,
}

impl Template {
    /// Load and compile the template at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::TemplateLoad(format!("{}: {e}", path.display())))?;
        Self::compile(&source)
            .map_err(|e| Error::TemplateLoad(format!("{}: {e}", path.display())))
    }

    /// Compile a template from source text.
    pub fn from_source(source: &str) -> Result<Self> {
        Self::compile(source).map_err(|e| Error::TemplateLoad(e.to_string()))
    }

    fn compile(source: &str) -> std::result::Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self { registry })
    }

    /// Execute the template once for `document`, writing to `writer`.
    ///
    /// The writer is neither flushed nor closed.
    pub fn render<W: Write>(&self, document: &Document, writer: W) -> Result<()> {
        self.registry
            .render_to_write(TEMPLATE_NAME, document, writer)
            .map_err(|e| Error::Render(e.to_string()))
    }
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template").finish_non_exhaustive()
    }
}
