//! Path expression parsing.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The expression does not follow the path grammar.
    #[error("malformed path {expr:?}: {reason}")]
    Malformed {
        /// Expression as written.
        expr: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Field of a mapping. A numeric key also addresses a sequence element.
    Key(String),
    /// Element of a sequence, written as `[n]`.
    Index(usize),
}

/// A parsed path expression.
///
/// Segments are separated by `.` or `/`, and a leading `/` is ignored, so
/// `cpu.load`, `cpu/load` and `/cpu/load` are the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    expr: String,
    segments: Vec<Segment>,
}

impl Path {
    /// Parses a path expression.
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        let malformed = |reason| PathError::Malformed {
            expr: expr.to_string(),
            reason,
        };

        let body = expr.strip_prefix('/').unwrap_or(expr);
        if body.is_empty() {
            return Err(malformed("empty path"));
        }

        let mut segments = Vec::new();
        for part in body.split(['.', '/']) {
            if part.is_empty() {
                return Err(malformed("empty segment"));
            }

            let (key, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };
            if key.contains(']') {
                return Err(malformed("unexpected ']'"));
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }

            while !rest.is_empty() {
                let inner = rest
                    .strip_prefix('[')
                    .ok_or_else(|| malformed("expected '[' after index"))?;
                let close = inner.find(']').ok_or_else(|| malformed("unterminated '['"))?;
                let index = inner[..close]
                    .parse::<usize>()
                    .map_err(|_| malformed("index must be a non-negative integer"))?;
                segments.push(Segment::Index(index));
                rest = &inner[close + 1..];
            }
        }

        Ok(Self {
            expr: expr.to_string(),
            segments,
        })
    }

    /// The expression as written in the configuration.
    pub fn as_str(&self) -> &str {
        &self.expr
    }

    /// Parsed segments, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<Segment> {
        names.iter().map(|n| Segment::Key(n.to_string())).collect()
    }

    #[test]
    fn test_dotted_path() {
        let path = Path::parse("cpu.load").unwrap();
        assert_eq!(path.segments(), keys(&["cpu", "load"]).as_slice());
        assert_eq!(path.to_string(), "cpu.load");
    }

    #[test]
    fn test_slash_separators_match_dots() {
        let dotted = Path::parse("a.b.c").unwrap();
        let slashed = Path::parse("/a/b/c").unwrap();
        assert_eq!(dotted.segments(), slashed.segments());
    }

    #[test]
    fn test_indices() {
        let path = Path::parse("items[2].tags[0][1]").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("items".into()),
                Segment::Index(2),
                Segment::Key("tags".into()),
                Segment::Index(0),
                Segment::Index(1),
            ]
        );
    }

    #[test]
    fn test_leading_index() {
        let path = Path::parse("[3].name").unwrap();
        assert_eq!(
            path.segments(),
            &[Segment::Index(3), Segment::Key("name".into())]
        );
    }

    #[test]
    fn test_malformed_paths() {
        for expr in ["", "/", "a..b", "a.", "a[", "a[x]", "a[1]b", "a]", "a[-1]"] {
            assert!(
                matches!(Path::parse(expr), Err(PathError::Malformed { .. })),
                "{expr:?} should be rejected"
            );
        }
    }
}
