use crate::types::{AccessKind, FetchKind};
use serde::{Deserialize, Serialize};

///
/// ClassDeclaration
///
/// Raw declaration metadata for one entity class, exactly as handed over by
/// the persistence context: ordered fields and ordered accessor pairs, each
/// possibly carrying an explicit access-kind annotation.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClassDeclaration {
    pub type_path: String,
    pub fields: Vec<FieldDeclaration>,
    pub accessors: Vec<AccessorDeclaration>,
}

impl ClassDeclaration {
    #[must_use]
    pub fn new(type_path: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            fields: Vec::new(),
            accessors: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn accessor(mut self, accessor: AccessorDeclaration) -> Self {
        self.accessors.push(accessor);
        self
    }
}

///
/// FieldDeclaration
///
/// One declared field. `persistent` means the field carries persistence
/// metadata; `transient` marks state excluded from persistence that derived
/// attributes may still route through.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldDeclaration {
    pub name: String,
    pub persistent: bool,
    pub identifier: bool,
    pub transient: bool,
    pub declared_access: Option<AccessKind>,
    pub fetch: FetchKind,
}

impl FieldDeclaration {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            persistent: true,
            identifier: false,
            transient: false,
            declared_access: None,
            fetch: FetchKind::Eager,
        }
    }

    #[must_use]
    pub const fn identifier(mut self) -> Self {
        self.identifier = true;
        self
    }

    /// Mark the field transient: excluded from persistence, still resolvable.
    #[must_use]
    pub const fn transient(mut self) -> Self {
        self.persistent = false;
        self.transient = true;
        self
    }

    #[must_use]
    pub const fn declared_access(mut self, kind: AccessKind) -> Self {
        self.declared_access = Some(kind);
        self
    }

    #[must_use]
    pub const fn fetch(mut self, fetch: FetchKind) -> Self {
        self.fetch = fetch;
        self
    }
}

///
/// AccessorDeclaration
///
/// One declared getter/setter pair for a logical attribute. `sealed` marks
/// an accessor that cannot be rewritten; `read_only` permits a missing
/// setter for derived values that are never written back.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AccessorDeclaration {
    pub name: String,
    pub has_getter: bool,
    pub has_setter: bool,
    pub persistent: bool,
    pub identifier: bool,
    pub declared_access: Option<AccessKind>,
    pub fetch: FetchKind,
    pub sealed: bool,
    pub read_only: bool,
}

impl AccessorDeclaration {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_getter: true,
            has_setter: true,
            persistent: false,
            identifier: false,
            declared_access: None,
            fetch: FetchKind::Eager,
            sealed: false,
            read_only: false,
        }
    }

    /// Mark the getter as carrying persistence metadata.
    #[must_use]
    pub const fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    #[must_use]
    pub const fn identifier(mut self) -> Self {
        self.identifier = true;
        self
    }

    #[must_use]
    pub const fn declared_access(mut self, kind: AccessKind) -> Self {
        self.declared_access = Some(kind);
        self
    }

    #[must_use]
    pub const fn fetch(mut self, fetch: FetchKind) -> Self {
        self.fetch = fetch;
        self
    }

    #[must_use]
    pub const fn getter_only(mut self) -> Self {
        self.has_getter = true;
        self.has_setter = false;
        self
    }

    #[must_use]
    pub const fn setter_only(mut self) -> Self {
        self.has_getter = false;
        self.has_setter = true;
        self
    }

    #[must_use]
    pub const fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}
