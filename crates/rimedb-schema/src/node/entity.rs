use crate::{node::ResolvedAttribute, types::AccessKind};
use serde::Serialize;

///
/// EntityTypeDescriptor
///
/// Resolved access metadata for one entity type. Owned by the enhancement
/// pipeline and immutable once resolution completes: the fields are private
/// and only read accessors are exposed. Attribute order is declaration
/// order, which makes every derived surface deterministic.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EntityTypeDescriptor {
    type_path: String,
    class_access: AccessKind,
    attributes: Vec<ResolvedAttribute>,
}

impl EntityTypeDescriptor {
    pub(crate) fn new(
        type_path: String,
        class_access: AccessKind,
        attributes: Vec<ResolvedAttribute>,
    ) -> Self {
        Self {
            type_path,
            class_access,
            attributes,
        }
    }

    #[must_use]
    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    /// The class-level default access kind, derived from where the
    /// identifier's persistence metadata is declared.
    #[must_use]
    pub const fn class_access(&self) -> AccessKind {
        self.class_access
    }

    #[must_use]
    pub fn attributes(&self) -> &[ResolvedAttribute] {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&ResolvedAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Position of an attribute in declaration order.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// The identifier attribute. Resolution guarantees exactly one.
    #[must_use]
    pub fn identifier(&self) -> &ResolvedAttribute {
        self.attributes
            .iter()
            .find(|a| a.identifier)
            .expect("resolved descriptor always carries exactly one identifier")
    }
}
