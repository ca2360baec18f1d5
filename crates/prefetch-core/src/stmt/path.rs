use std::fmt;

/// Separator between the parts of a relation path, as in `note__tags`.
pub const SEPARATOR: &str = "__";

/// A chain of field names walked from a root model, e.g. `book__author`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    fields: Vec<String>,
}

impl Path {
    /// Splits a name on [`SEPARATOR`]. A `.` is accepted as an alternative
    /// separator.
    pub fn parse(name: &str) -> Path {
        name.split(SEPARATOR)
            .flat_map(|part| part.split('.'))
            .map(String::from)
            .collect()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn push(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }

    /// Returns `true` if `self` is `other` or a leading part of it.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.fields.starts_with(&self.fields)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.join(SEPARATOR))
    }
}

impl From<&str> for Path {
    fn from(src: &str) -> Self {
        Path::parse(src)
    }
}

impl From<String> for Path {
    fn from(src: String) -> Self {
        Path::parse(&src)
    }
}

impl From<&Path> for Path {
    fn from(src: &Path) -> Self {
        src.clone()
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Path {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}
