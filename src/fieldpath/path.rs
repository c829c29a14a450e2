//! Path element and path types.

use std::convert::Infallible;
use std::str::FromStr;

/// PathElement represents one dot-separated segment of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// A segment addressing a map key.
    FieldName(String),
    /// A segment made of digits (optionally a leading minus). The raw text is
    /// kept so the segment can still address a map key like `"01"`. Values
    /// beyond the `i64` range saturate.
    Index { value: i64, raw: String },
}

impl PathElement {
    /// Parses a single segment.
    pub fn parse(segment: &str) -> Self {
        let digits = segment.strip_prefix('-').unwrap_or(segment);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return PathElement::FieldName(segment.to_string());
        }
        let value = segment.parse::<i64>().unwrap_or(if segment.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        });
        PathElement::Index {
            value,
            raw: segment.to_string(),
        }
    }

    /// Creates a new field name path element.
    pub fn field_name(name: impl Into<String>) -> Self {
        PathElement::FieldName(name.into())
    }

    /// Creates a new index path element.
    pub fn index(i: i64) -> Self {
        PathElement::Index {
            value: i,
            raw: i.to_string(),
        }
    }

    /// Returns true if this is an index segment, negative ones included.
    pub fn is_index(&self) -> bool {
        matches!(self, PathElement::Index { .. })
    }

    /// Returns the integer value of an index segment.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            PathElement::Index { value, .. } => Some(*value),
            PathElement::FieldName(_) => None,
        }
    }

    /// Returns the list position addressed by a non-negative index segment.
    /// Positions beyond `usize` saturate.
    pub fn as_position(&self) -> Option<usize> {
        match self.as_index()? {
            i if i < 0 => None,
            i => Some(usize::try_from(i).unwrap_or(usize::MAX)),
        }
    }

    /// Returns the segment's text, used when addressing a map key.
    pub fn key(&self) -> &str {
        match self {
            PathElement::FieldName(name) => name,
            PathElement::Index { raw, .. } => raw,
        }
    }
}

/// Path is a parsed dot path such as `rows.0.value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Parses a dot path. The empty string is the empty path.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Path::new();
        }
        path.split('.').map(PathElement::parse).collect()
    }

    /// Creates a path from a vector of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    /// Appends a path element.
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// Returns the first `n` elements as a new path.
    pub fn prefix(&self, n: usize) -> Path {
        Path::from_elements(self.elements[..n.min(self.elements.len())].to_vec())
    }

    /// Returns a slice of the path elements.
    pub fn as_slice(&self) -> &[PathElement] {
        &self.elements
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::parse(s))
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl std::fmt::Display for PathElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}
