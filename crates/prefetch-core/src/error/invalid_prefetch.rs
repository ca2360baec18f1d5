use super::{Error, ErrorKind};

/// Error when a requested prefetch name cannot be resolved to a chain of
/// forward relations ending in a prefetch definition.
///
/// Raised when the prefetch is requested, before any query runs.
#[derive(Debug)]
pub(super) struct InvalidPrefetch {
    /// The full name as requested, e.g. `note__tags`.
    name: Box<str>,

    /// The model the prefetch was requested on.
    model: Box<str>,

    reason: Reason,
}

#[derive(Debug)]
enum Reason {
    /// The part is neither a definition nor a forward relation.
    UnknownPart(Box<str>),

    /// The part follows a definition, which must be last.
    TrailingPart(Box<str>),

    /// Every part was a forward relation.
    NoDefinition,

    /// A forward relation leads to a model without a prefetch registry.
    NotCapable(Box<str>),

    /// Arguments were passed to a definition that is already built.
    UnexpectedArgs(Box<str>),
}

impl std::error::Error for InvalidPrefetch {}

impl core::fmt::Display for InvalidPrefetch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let InvalidPrefetch {
            name,
            model,
            reason,
        } = self;

        f.write_str("invalid prefetch: ")?;

        match reason {
            Reason::UnknownPart(part) => write!(
                f,
                "invalid part `{part}` in prefetch `{name}` on model `{model}`; \
                 the name is not a prefetch definition nor a forward relation"
            ),
            Reason::TrailingPart(part) => write!(
                f,
                "invalid part `{part}` in prefetch `{name}` on model `{model}`; \
                 no further parts are allowed after a prefetch definition"
            ),
            Reason::NoDefinition => write!(
                f,
                "prefetch `{name}` on model `{model}`; \
                 the last part isn't a prefetch definition"
            ),
            Reason::NotCapable(target) => write!(
                f,
                "prefetch `{name}` on model `{model}`; \
                 model `{target}` does not define any prefetches"
            ),
            Reason::UnexpectedArgs(part) => write!(
                f,
                "invalid part `{part}` in prefetch `{name}` on model `{model}`; \
                 the definition is already instantiated and does not accept arguments"
            ),
        }
    }
}

fn invalid_prefetch(name: &str, model: &str, reason: Reason) -> Error {
    Error::from(ErrorKind::InvalidPrefetch(InvalidPrefetch {
        name: name.into(),
        model: model.into(),
        reason,
    }))
}

impl Error {
    pub fn invalid_prefetch_unknown_part(part: &str, name: &str, model: &str) -> Error {
        invalid_prefetch(name, model, Reason::UnknownPart(part.into()))
    }

    pub fn invalid_prefetch_trailing_part(part: &str, name: &str, model: &str) -> Error {
        invalid_prefetch(name, model, Reason::TrailingPart(part.into()))
    }

    pub fn invalid_prefetch_no_definition(name: &str, model: &str) -> Error {
        invalid_prefetch(name, model, Reason::NoDefinition)
    }

    pub fn invalid_prefetch_not_capable(name: &str, model: &str, target: &str) -> Error {
        invalid_prefetch(name, model, Reason::NotCapable(target.into()))
    }

    pub fn invalid_prefetch_unexpected_args(part: &str, name: &str, model: &str) -> Error {
        invalid_prefetch(name, model, Reason::UnexpectedArgs(part.into()))
    }

    /// Returns `true` if this error is an invalid prefetch error.
    pub fn is_invalid_prefetch(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidPrefetch(_))
    }

    /// Returns the offending part of the prefetch name, if the error concerns
    /// a single part.
    pub fn invalid_prefetch_part(&self) -> Option<&str> {
        match self.kind() {
            ErrorKind::InvalidPrefetch(err) => match &err.reason {
                Reason::UnknownPart(part)
                | Reason::TrailingPart(part)
                | Reason::UnexpectedArgs(part) => Some(part),
                Reason::NoDefinition | Reason::NotCapable(_) => None,
            },
            _ => None,
        }
    }
}
