use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// AccessKind
///
/// How the persistence layer reaches an attribute's value: directly through
/// its storage slot, or through its accessor pair. The same enum identifies
/// a declaration site (persistence metadata on the field vs on the getter).
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum AccessKind {
    Field,
    Property,
}

///
/// FetchKind
///
/// When an attribute's value is materialized: eagerly at load time, or
/// deferred until first access.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum FetchKind {
    #[default]
    Eager,

    Lazy,
}

impl FetchKind {
    #[must_use]
    pub const fn is_lazy(self) -> bool {
        matches!(self, Self::Lazy)
    }
}
