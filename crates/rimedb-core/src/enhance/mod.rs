//! Enhancement: rewrite a resolved entity type so every access point
//! funnels through the interception hook, preserving the attribute's
//! external contract.

pub(crate) mod registry;

pub use registry::enhanced_types;

use crate::{
    error::{EnhanceError, InternalError},
    intercept::EnhancedEntity,
    traits::{EntityState, PersistenceContext},
    value::Value,
};
use rimedb_schema::{
    node::{ClassDeclaration, EntityTypeDescriptor},
    types::AccessKind,
};
use std::{rc::Rc, sync::Arc};

/// Enhance an entity class from its raw declaration metadata.
///
/// One-time, load-time transformation: the first call for a type path
/// resolves, rewrites and caches the enhanced type; every later call
/// returns the same shared instance. Failures are surfaced immediately and
/// never cached.
pub fn enhance(class: &ClassDeclaration) -> Result<Arc<EnhancedType>, InternalError> {
    registry::enhance(class)
}

///
/// AccessShim
///
/// Dispatch plan for one attribute of an enhanced type: which access point
/// the rewrite funnels through, and whether interception bookkeeping
/// applies. Transient attributes keep a pass-through shim so the external
/// contract stays intact without dirty or lazy tracking.
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct AccessShim {
    pub access: AccessKind,
    pub intercepted: bool,
    pub lazy: bool,
    pub writable: bool,
}

impl AccessShim {
    pub(crate) fn read_through(
        &self,
        attribute: &str,
        state: &dyn EntityState,
    ) -> Result<Value, InternalError> {
        match self.access {
            AccessKind::Field => state.read_field(attribute),
            AccessKind::Property => state.get_property(attribute),
        }
    }

    pub(crate) fn write_through(
        &self,
        attribute: &str,
        state: &mut dyn EntityState,
        value: Value,
    ) -> Result<(), InternalError> {
        match self.access {
            AccessKind::Field => state.write_field(attribute, value),
            AccessKind::Property => state.set_property(attribute, value),
        }
    }
}

///
/// EnhancedType
///
/// One enhanced entity type: the resolved descriptor plus the per-attribute
/// dispatch plans computed by the rewrite. Immutable and shared; instances
/// are materialized from it via [`EnhancedType::attach`].
///

#[derive(Debug)]
pub struct EnhancedType {
    descriptor: EntityTypeDescriptor,
    shims: Vec<AccessShim>,
}

impl EnhancedType {
    // Pure transformation: descriptor in, enhanced definition out. The
    // conflict scan runs before anything is cached.
    pub(crate) fn build(descriptor: EntityTypeDescriptor) -> Result<Self, EnhanceError> {
        let mut shims = Vec::with_capacity(descriptor.attributes().len());

        for attribute in descriptor.attributes() {
            if attribute.is_persistent()
                && attribute.access == AccessKind::Property
                && attribute.sealed
            {
                return Err(EnhanceError::SealedAccessor {
                    entity: descriptor.type_path().to_string(),
                    attribute: attribute.name.clone(),
                });
            }

            shims.push(AccessShim {
                access: attribute.access,
                intercepted: attribute.is_persistent(),
                lazy: attribute.is_persistent() && attribute.fetch.is_lazy(),
                writable: attribute.is_writable(),
            });
        }

        Ok(Self { descriptor, shims })
    }

    #[must_use]
    pub const fn descriptor(&self) -> &EntityTypeDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn type_path(&self) -> &str {
        self.descriptor.type_path()
    }

    pub(crate) fn shim(&self, index: usize) -> &AccessShim {
        &self.shims[index]
    }

    /// Materialize a stored instance: lazy attributes start absent and are
    /// fetched on first access.
    #[must_use]
    pub fn attach<S: EntityState>(
        self: &Arc<Self>,
        state: S,
        context: Rc<dyn PersistenceContext>,
    ) -> EnhancedEntity<S> {
        EnhancedEntity::materialize(self.clone(), state, context, false)
    }

    /// Associate a newly constructed instance: every attribute already has
    /// its value, so nothing starts absent.
    #[must_use]
    pub fn attach_new<S: EntityState>(
        self: &Arc<Self>,
        state: S,
        context: Rc<dyn PersistenceContext>,
    ) -> EnhancedEntity<S> {
        EnhancedEntity::materialize(self.clone(), state, context, true)
    }
}
