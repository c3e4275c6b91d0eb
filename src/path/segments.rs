//! Paths into mixed record/list trees
//!
//! A path is a sequence of segments. Textual paths are dot-delimited and may
//! use bracketed indexes, so `cart.items[0].quantity` and
//! `cart.items.0.quantity` address the same value.

use std::fmt;

/// One step into a tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Record field name; also matches a list index when it parses as one
    Key(String),
    /// List index; also matches a record field with the same digits
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Ordered list of segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Parses `a.b[0].c`. An empty string is the empty path.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let mut segments = Vec::new();
        for part in text.split('.') {
            parse_part(part, &mut segments);
        }
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a new path with `segment` appended
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

/// Splits `name[1][2]` into a key and indexes. Anything that is not a clean
/// run of bracketed numbers stays a plain key.
fn parse_part(part: &str, out: &mut Vec<PathSegment>) {
    let Some(open) = part.find('[') else {
        out.push(PathSegment::Key(part.to_string()));
        return;
    };

    let mut indexes = Vec::new();
    let mut rest = &part[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        match inner[..close].parse::<usize>() {
            Ok(i) => indexes.push(i),
            Err(_) => break,
        }
        rest = &inner[close + 1..];
    }

    if !rest.is_empty() || indexes.is_empty() {
        out.push(PathSegment::Key(part.to_string()));
        return;
    }
    if open > 0 {
        out.push(PathSegment::Key(part[..open].to_string()));
    }
    out.extend(indexes.into_iter().map(PathSegment::Index));
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<&str> for ValuePath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<&String> for ValuePath {
    fn from(text: &String) -> Self {
        Self::parse(text)
    }
}

impl From<String> for ValuePath {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<Vec<PathSegment>> for ValuePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

/// Explicit segments; dots inside a segment are not split
impl From<&[&str]> for ValuePath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| PathSegment::from(*s)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ValuePath {
    fn from(segments: [&str; N]) -> Self {
        Self::from(&segments[..])
    }
}

impl From<&ValuePath> for ValuePath {
    fn from(path: &ValuePath) -> Self {
        path.clone()
    }
}
