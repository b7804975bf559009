//! Diagnostic - compiler-style failure reports
//!
//! Every failure of the IR core is fatal, so a diagnostic here is always
//! rendered once, by whoever drives the session:
//! - Error code (ES001, ET002, etc.)
//! - Declaration location, when one is known
//! - Notes describing the offending declaration

use crate::span::Span;
use std::fmt;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Fatal error - aborts the session
    Error,
    /// Warning - reported, construction continues
    Warning,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
        }
    }

    /// Returns the ANSI code for coloring (if terminal supports it)
    pub fn color_code(&self) -> &'static str {
        match self {
            Level::Error => "\x1b[1;31m",   // Bold Red
            Level::Warning => "\x1b[1;33m", // Bold Yellow
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A label pointing at a declaration
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// Structured error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    /// Category (S = Structural, T = Type, M = Model)
    pub category: char,
    /// Error number
    pub number: u16,
}

impl ErrorCode {
    pub const fn new(category: char, number: u16) -> Self {
        Self { category, number }
    }

    // Structural violations
    pub const NO_IMPL_CLASS: Self = Self::new('S', 1);
    pub const MISSING_PARENT: Self = Self::new('S', 2);

    // Type construction errors
    pub const UNKNOWN_CLASSIFIER: Self = Self::new('T', 1);
    pub const MALFORMED_TYPE: Self = Self::new('T', 2);

    // Model loading errors
    pub const INVALID_MODEL: Self = Self::new('M', 1);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}{:03}", self.category, self.number)
    }
}

/// A complete diagnostic
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn with_level(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Creates a new error
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(Level::Error, message)
    }

    /// Creates a new warning
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(Level::Warning, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Names of the source files a semantic model was built from
#[derive(Debug, Default, Clone)]
pub struct FileTable {
    names: Vec<String>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Adds a file and returns its ID
    pub fn add(&mut self, name: impl Into<String>) -> u32 {
        let id = self.names.len() as u32;
        self.names.push(name.into());
        id
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }
}

/// Renders a diagnostic for display
pub struct DiagnosticRenderer<'a> {
    files: &'a FileTable,
    use_colors: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(files: &'a FileTable) -> Self {
        Self {
            files,
            use_colors: true,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Renders the diagnostic as a string
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        // Line 1: error[ES001]: message
        let reset = if self.use_colors { "\x1b[0m" } else { "" };
        let color = if self.use_colors {
            diagnostic.level.color_code()
        } else {
            ""
        };
        let bold = if self.use_colors { "\x1b[1m" } else { "" };
        let blue = if self.use_colors { "\x1b[1;34m" } else { "" };

        output.push_str(color);
        output.push_str(diagnostic.level.as_str());
        if let Some(code) = &diagnostic.code {
            output.push('[');
            output.push_str(&code.to_string());
            output.push(']');
        }
        output.push_str(reset);
        output.push_str(bold);
        output.push_str(": ");
        output.push_str(&diagnostic.message);
        output.push_str(reset);
        output.push('\n');

        for label in &diagnostic.labels {
            let file = self.files.get(label.span.file_id).unwrap_or("<unknown>");
            output.push_str(&format!(
                " {}-->{} {}:{}:{} {}\n",
                blue, reset, file, label.span.start.line, label.span.start.column, label.message
            ));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  = {}note{}: {}\n", bold, reset, note));
        }

        output
    }
}
