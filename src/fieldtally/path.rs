//! Field-path resolution.
//!
//! A field path is a dotted expression identifying a nested location within
//! a structured record, e.g. `jobInstances.status`. Resolution is pure
//! string tokenization performed once per mapping; the resulting
//! [`FieldPath`] is reused for every record.

use crate::fieldtally::error::{TallyError, TallyResult};

/// Segment separator in path expressions. No escaping is supported: a `.`
/// cannot appear inside a segment name.
pub const PATH_SEPARATOR: char = '.';

/// An ordered, non-empty sequence of path segments.
///
/// Each segment is a non-empty string; resolution consumes segments
/// left-to-right and never backtracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path expression into a [`FieldPath`].
    ///
    /// Fails with [`TallyError::InvalidPath`] if the expression is empty or
    /// any segment between separators is empty (`"a..b"`, `".a"`, `"a."`).
    pub fn parse(expression: &str) -> TallyResult<FieldPath> {
        if expression.is_empty() {
            return Err(TallyError::invalid_path(
                expression,
                "path expression must not be empty",
            ));
        }

        let segments: Vec<String> = expression
            .split(PATH_SEPARATOR)
            .map(|s| s.to_string())
            .collect();

        if segments.iter().any(|s| s.is_empty()) {
            return Err(TallyError::invalid_path(
                expression,
                "path segments must not be empty",
            ));
        }

        Ok(FieldPath { segments })
    }

    /// The segments in resolution order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments; never true for a parsed path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The original dotted expression form
    pub fn expression(&self) -> String {
        self.segments.join(".")
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_segment() {
        let path = FieldPath::parse("name").unwrap();
        assert_eq!(path.segments(), &["name".to_string()]);
    }

    #[test]
    fn parses_nested_path_in_order() {
        let path = FieldPath::parse("a.b.c").unwrap();
        assert_eq!(
            path.segments(),
            &["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(path.expression(), "a.b.c");
    }

    #[test]
    fn rejects_empty_expression() {
        assert!(matches!(
            FieldPath::parse(""),
            Err(TallyError::InvalidPath { .. })
        ));
    }

    #[test]
    fn rejects_empty_segments() {
        for bad in ["a..b", ".a", "a.", "."] {
            assert!(
                matches!(FieldPath::parse(bad), Err(TallyError::InvalidPath { .. })),
                "expected '{}' to be rejected",
                bad
            );
        }
    }
}
