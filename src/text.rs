use serde::{Deserialize, Serialize};
use std::fmt;

/// A zero-based line/column location in a source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The span a syntax construct or flow node occupies in its document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: Position,
    pub end: Position,
}

impl LineRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Builds a range spanning whole lines, columns pinned to zero.
    pub fn lines(start_line: u32, end_line: u32) -> Self {
        Self {
            start: Position::new(start_line, 0),
            end: Position::new(end_line, 0),
        }
    }

    /// Whether `other` lies entirely within this range, by line numbers.
    pub fn contains(&self, other: &LineRange) -> bool {
        self.start.line <= other.start.line && other.end.line <= self.end.line
    }
}

/// A single replacement against a document. Replacing an empty range is an
/// insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: LineRange,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: LineRange, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// An insertion at the very start of the document.
    pub fn at_document_start(new_text: impl Into<String>) -> Self {
        Self::new(LineRange::default(), new_text)
    }
}
