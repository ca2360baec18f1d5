use super::{Error, ErrorKind};

/// Error when a prefetch definition is missing one of its required
/// callables.
///
/// This is raised when the definition is built, never when it is first used.
#[derive(Debug)]
pub(super) struct InvalidDefinition {
    missing: &'static str,
}

impl std::error::Error for InvalidDefinition {}

impl core::fmt::Display for InvalidDefinition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid prefetch definition: you must define a {} function",
            self.missing
        )
    }
}

impl Error {
    /// Creates an invalid definition error naming the missing callable
    /// (`filter`, `reverse_mapper` or `decorator`).
    pub fn invalid_definition(missing: &'static str) -> Error {
        Error::from(ErrorKind::InvalidDefinition(InvalidDefinition { missing }))
    }

    /// Returns `true` if this error is an invalid definition error.
    pub fn is_invalid_definition(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidDefinition(_))
    }
}
