use crate::types::{AccessKind, FetchKind};
use serde::Serialize;

///
/// AttributeDescriptor
///
/// Merged metadata for one logical attribute: a field and its corresponding
/// accessor pair folded into a single descriptor keyed by attribute name.
/// `declared_access` is `None` until an explicit override says otherwise;
/// resolution replaces it with an unconditional [`AccessKind`].
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub declared_access: Option<AccessKind>,
    pub identifier: bool,
    pub transient: bool,
    pub fetch: FetchKind,

    /// Where the persistence metadata was found (field vs getter). Drives
    /// the class-level default when this attribute is the identifier.
    pub metadata_site: AccessKind,

    pub has_field: bool,
    pub has_getter: bool,
    pub has_setter: bool,
    pub sealed: bool,
    pub read_only: bool,
}

impl AttributeDescriptor {
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        !self.transient
    }
}

///
/// ResolvedAttribute
///
/// One attribute after resolution: the effective access kind is final and
/// never unspecified.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResolvedAttribute {
    pub name: String,
    pub access: AccessKind,
    pub fetch: FetchKind,
    pub identifier: bool,
    pub transient: bool,
    pub read_only: bool,
    pub sealed: bool,
}

impl ResolvedAttribute {
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        !self.transient
    }

    /// Whether the runtime may write this attribute back.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !self.read_only
    }
}
