//! Source location records attached to values and operations.

use serde::{Deserialize, Serialize};

/// A 1-based source span: file name plus start/end line and column.
///
/// `0` in a numeric field means "unknown". An empty `file` with `line == 0`
/// is the importer's signal that no location was recorded at all (see
/// [`SourceLocation::is_unknown`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file name, empty if unknown.
    pub file: String,
    /// 1-based start line, 0 if unknown.
    pub line: u32,
    /// 1-based start column, 0 if unknown.
    pub column: u32,
    /// 1-based end line, 0 if unknown.
    pub end_line: u32,
    /// 1-based end column, 0 if unknown.
    pub end_column: u32,
}

impl SourceLocation {
    /// Returns `true` if this location carries no information at all: empty
    /// file name and zero start line.
    pub fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line == 0
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unknown() {
            return write!(f, "<unknown>");
        }
        write!(
            f,
            "{}:{}:{}",
            if self.file.is_empty() {
                "<unknown>"
            } else {
                &self.file
            },
            self.line,
            self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unknown() {
        assert!(SourceLocation::default().is_unknown());
    }

    #[test]
    fn file_without_line_is_not_unknown() {
        let loc = SourceLocation {
            file: "a.sv".into(),
            ..Default::default()
        };
        assert!(!loc.is_unknown());
    }
}
