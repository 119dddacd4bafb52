//! Core data structures shared across the Alan IDE crates

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A zero-based line/character position inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based line index
    pub line: u32,
    /// Zero-based character offset within the line
    pub character: u32,
}

impl Position {
    /// Create a new position
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A span between two positions, end-inclusive for intersection purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a new range from line/character quadruple
    pub fn new(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
        Self {
            start: Position::new(start_line, start_character),
            end: Position::new(end_line, end_character),
        }
    }

    /// A zero-width range at the origin
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Whether a position falls within this range (boundaries included)
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Whether two ranges share at least one position
    pub fn intersects(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A range inside a specific file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub path: PathBuf,
    pub range: Range,
}

impl Location {
    /// Create a new location
    pub fn new(path: impl Into<PathBuf>, range: Range) -> Self {
        Self {
            path: path.into(),
            range,
        }
    }
}

/// Diagnostic severity, translated from tool output severity markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Information,
}

impl Severity {
    /// Map a tool-output severity word; anything unrecognized is informational
    pub fn from_marker(marker: &str) -> Self {
        match marker {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            _ => Severity::Information,
        }
    }
}

/// One diagnostic produced by parsing tool output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    /// Possibly multi-line; continuation lines are appended with `\n`
    pub message: String,
}

/// All diagnostics for one file, published atomically per command run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiagnostics {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// Classification of a symbol produced by the fallback symbol parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Unquoted grouping token
    Struct,
    /// Quoted entity without a recognized type keyword
    Module,
    /// `command`
    Method,
    /// `collection`
    Array,
    /// `stategroup`
    Enum,
    /// Quoted entity with trailing text but no recognized keyword
    EnumMember,
    /// `group`
    Namespace,
    /// `text`
    String,
    /// `integer`, `natural`, `number`
    Number,
    /// `file`
    File,
    /// `reference-set`
    TypeParameter,
    /// `with`
    Event,
}

/// A node in the document outline tree
///
/// `range` spans from the declaration line to immediately before the next
/// sibling (or the end of the document); `selection_range` covers the name
/// token on the declaration line. Children appear in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSymbol {
    pub name: String,
    /// Optional type-tag keyword found after the name
    pub detail: String,
    pub kind: SymbolKind,
    pub range: Range,
    pub selection_range: Range,
    pub children: Vec<DocumentSymbol>,
}

/// A completion proposal drawn from the live symbol tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    pub label: String,
    pub detail: String,
    pub kind: SymbolKind,
    pub insert_text: String,
}

/// An open text document handed to us by the host
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    /// Create a document from a path and its full text
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// The file extension including the leading dot, or empty
    pub fn extension(&self) -> String {
        Path::new(&self.path)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Text of the given zero-based line, if present
    pub fn line(&self, line: u32) -> Option<&str> {
        self.text.split('\n').nth(line as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 0) < Position::new(2, 0));
        assert!(Position::new(1, 3) < Position::new(1, 4));
        assert_eq!(Position::new(2, 1), Position::new(2, 1));
    }

    #[test]
    fn test_range_contains_boundaries() {
        let range = Range::new(1, 2, 1, 6);
        assert!(range.contains(Position::new(1, 2)));
        assert!(range.contains(Position::new(1, 6)));
        assert!(!range.contains(Position::new(1, 7)));
        assert!(!range.contains(Position::new(0, 3)));
    }

    #[test]
    fn test_range_intersection() {
        let a = Range::new(1, 0, 1, 4);
        let b = Range::new(1, 4, 1, 9);
        let c = Range::new(2, 0, 2, 4);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_severity_from_marker() {
        assert_eq!(Severity::from_marker("error"), Severity::Error);
        assert_eq!(Severity::from_marker("warning"), Severity::Warning);
        assert_eq!(Severity::from_marker("note"), Severity::Information);
    }

    #[test]
    fn test_document_extension() {
        let doc = Document::new("/work/model.alan", "");
        assert_eq!(doc.extension(), ".alan");
        let doc = Document::new("/work/README", "");
        assert_eq!(doc.extension(), "");
    }

    #[test]
    fn test_document_line_access() {
        let doc = Document::new("/work/model.alan", "first\nsecond\nthird");
        assert_eq!(doc.line(1), Some("second"));
        assert_eq!(doc.line(3), None);
    }
}
