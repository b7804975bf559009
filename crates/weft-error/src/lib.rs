//! weft-error - Diagnostics system for the weft IR toolchain
//!
//! Failures in the IR core are typed as [`IrError`]; drivers turn them into
//! [`Diagnostic`]s and render them with a [`DiagnosticRenderer`].
//!
//! # Example
//!
//! ```rust
//! use weft_error::{DiagnosticRenderer, FileTable, IrError};
//! use weft_error::span::Span;
//!
//! let mut files = FileTable::new();
//! let file_id = files.add("Tags.kt");
//!
//! let error = IrError::NoImplClass {
//!     declaration: "demo/Tag".to_string(),
//!     span: Some(Span::line(file_id, 4)),
//! };
//!
//! let renderer = DiagnosticRenderer::new(&files);
//! println!("{}", renderer.render(&error.to_diagnostic()));
//! ```

pub mod diagnostic;
pub mod error;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticRenderer, ErrorCode, FileTable, Label, Level};
pub use error::{IrError, IrResult};
pub use span::{Position, Span};

/// Collection of diagnostics accumulated while driving a session
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.level == Level::Error)
    }

    /// Renders all diagnostics
    pub fn render(&self, files: &FileTable) -> String {
        self.render_with(&DiagnosticRenderer::new(files).without_colors())
    }

    pub fn render_with(&self, renderer: &DiagnosticRenderer<'_>) -> String {
        self.items
            .iter()
            .map(|d| renderer.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<IrError> for Diagnostics {
    fn from(error: IrError) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(error.to_diagnostic());
        diagnostics
    }
}
