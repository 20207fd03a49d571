use rimedb_schema::error::ResolveError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without origin-specific detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an interceptor-origin invariant violation.
    pub(crate) fn interceptor_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Interceptor,
            message.into(),
        )
    }

    /// Construct an entity-origin error for failures inside application
    /// state (accessor bodies, storage slots).
    pub fn entity_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Entity, message.into())
    }

    #[must_use]
    pub const fn is_reentrant_load(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Intercept(InterceptError::ReentrantLoad { .. }))
        )
    }

    #[must_use]
    pub const fn is_unknown_attribute(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Intercept(InterceptError::UnknownAttribute { .. }))
        )
    }

    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self.class, ErrorClass::Config)
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self.class, ErrorClass::Conflict)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<ResolveError> for InternalError {
    fn from(err: ResolveError) -> Self {
        Self {
            class: ErrorClass::Config,
            origin: ErrorOrigin::Resolve,
            message: err.to_string(),
            detail: Some(ErrorDetail::Resolve(err)),
        }
    }
}

impl From<EnhanceError> for InternalError {
    fn from(err: EnhanceError) -> Self {
        Self {
            class: ErrorClass::Conflict,
            origin: ErrorOrigin::Enhance,
            message: err.to_string(),
            detail: Some(ErrorDetail::Enhance(err)),
        }
    }
}

impl From<InterceptError> for InternalError {
    fn from(err: InterceptError) -> Self {
        Self {
            class: err.class(),
            origin: ErrorOrigin::Interceptor,
            message: err.to_string(),
            detail: Some(ErrorDetail::Intercept(err)),
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
/// This enum is intentionally extensible.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ErrorDetail {
    #[error("{0}")]
    Enhance(EnhanceError),
    #[error("{0}")]
    Intercept(InterceptError),
    #[error("{0}")]
    Resolve(ResolveError),
}

///
/// EnhanceError
///
/// Enhancement-specific structured error detail.
/// Never returned directly; always wrapped in [`ErrorDetail::Enhance`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EnhanceError {
    #[error("cannot intercept sealed accessor '{attribute}' on '{entity}'")]
    SealedAccessor { entity: String, attribute: String },
}

///
/// InterceptError
///
/// Interceptor-specific structured error detail, scoped to one instance and
/// one attribute. Never returned directly; always wrapped in
/// [`ErrorDetail::Intercept`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum InterceptError {
    #[error("attribute '{attribute}' on '{entity}' is read-only")]
    ReadOnlyAttribute { entity: String, attribute: String },

    #[error("re-entrant load of attribute '{attribute}' on '{entity}'")]
    ReentrantLoad { entity: String, attribute: String },

    #[error("unknown attribute '{attribute}' on '{entity}'")]
    UnknownAttribute { entity: String, attribute: String },
}

impl InterceptError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::ReadOnlyAttribute { .. } => ErrorClass::Unsupported,
            Self::ReentrantLoad { .. } => ErrorClass::InvariantViolation,
            Self::UnknownAttribute { .. } => ErrorClass::NotFound,
        }
    }

    pub(crate) fn read_only(entity: &str, attribute: &str) -> Self {
        Self::ReadOnlyAttribute {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn reentrant_load(entity: &str, attribute: &str) -> Self {
        Self::ReentrantLoad {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn unknown_attribute(entity: &str, attribute: &str) -> Self {
        Self::UnknownAttribute {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorClass {
    Config,
    Conflict,
    Internal,
    InvariantViolation,
    NotFound,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::InvariantViolation => "invariant_violation",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorOrigin {
    Enhance,
    Entity,
    Interceptor,
    Resolve,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Enhance => "enhance",
            Self::Entity => "entity",
            Self::Interceptor => "interceptor",
            Self::Resolve => "resolve",
        };
        write!(f, "{label}")
    }
}
