//! Span - Declaration location
//!
//! A Span points at the region of a source file a declaration came from.
//! Synthesized declarations inherit the span of the declaration that
//! requested them.

use serde::Deserialize;

/// Represents a position in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Position {
    /// Line (1-indexed)
    pub line: u32,
    /// Column (1-indexed)
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Represents a region in a source file (start to end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
    /// Index into the model's file table
    pub file_id: u32,
}

impl Span {
    pub fn new(start: Position, end: Position, file_id: u32) -> Self {
        Self { start, end, file_id }
    }

    /// Creates a span covering a single line
    pub fn line(file_id: u32, line: u32) -> Self {
        Self {
            start: Position::new(line, 1),
            end: Position::new(line, 1),
            file_id,
        }
    }
}
