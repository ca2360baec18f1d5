use super::{Error, ErrorKind};

/// Error when a schema declaration is invalid.
///
/// This occurs when:
/// - Two models share a name
/// - A belongs-to relation names a model that was never registered
/// - A foreign key or primary key names a field the model does not have
/// - A prefetch registry is attached to an unknown model
///
/// These errors are caught while the database handle is built.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidSchema(_))
    }
}
