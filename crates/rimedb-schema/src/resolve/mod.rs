//! Access-strategy resolution: compute the class-level default from the
//! identifier's declaration site, apply attribute-level overrides, and
//! validate that every resolved access point is reachable.

use crate::{
    build::build_descriptors,
    error::ResolveError,
    node::{AttributeDescriptor, ClassDeclaration, EntityTypeDescriptor, ResolvedAttribute},
    types::AccessKind,
};

/// Resolve the effective access strategy for every attribute of a class.
///
/// Runs once per entity type; the returned descriptor is immutable and is
/// shared read-only for the lifetime of the type. Resolution is
/// deterministic: identical metadata always yields an identical descriptor.
pub fn resolve_access(class: &ClassDeclaration) -> Result<EntityTypeDescriptor, ResolveError> {
    let descriptors = build_descriptors(class)?;

    let identifier = locate_identifier(class, &descriptors)?;

    // The single computed source of the class-level default: FIELD if the
    // identifier's persistence metadata sits on the field, PROPERTY if it
    // sits on the getter.
    let class_access = identifier.metadata_site;

    let mut attributes = Vec::with_capacity(descriptors.len());
    for descriptor in &descriptors {
        let access = effective_access(descriptor, class_access);
        validate_strategy(&class.type_path, descriptor, access)?;

        attributes.push(ResolvedAttribute {
            name: descriptor.name.clone(),
            access,
            fetch: descriptor.fetch,
            identifier: descriptor.identifier,
            transient: descriptor.transient,
            read_only: descriptor.read_only,
            sealed: descriptor.sealed,
        });
    }

    Ok(EntityTypeDescriptor::new(
        class.type_path.clone(),
        class_access,
        attributes,
    ))
}

fn locate_identifier<'a>(
    class: &ClassDeclaration,
    descriptors: &'a [AttributeDescriptor],
) -> Result<&'a AttributeDescriptor, ResolveError> {
    let mut identifiers = descriptors.iter().filter(|d| d.is_persistent() && d.identifier);

    let Some(identifier) = identifiers.next() else {
        return Err(ResolveError::NoIdentifier {
            entity: class.type_path.clone(),
        });
    };

    if let Some(second) = identifiers.next() {
        return Err(ResolveError::MultipleIdentifier {
            entity: class.type_path.clone(),
            first: identifier.name.clone(),
            second: second.name.clone(),
        });
    }

    Ok(identifier)
}

// An explicit attribute-level override wins unconditionally; everything else
// inherits the class default. Transient attributes fall back to their own
// declaration site so that direct access always has somewhere to go.
const fn effective_access(descriptor: &AttributeDescriptor, class_access: AccessKind) -> AccessKind {
    match descriptor.declared_access {
        Some(kind) => kind,
        None if descriptor.transient => descriptor.metadata_site,
        None => class_access,
    }
}

fn validate_strategy(
    entity: &str,
    descriptor: &AttributeDescriptor,
    access: AccessKind,
) -> Result<(), ResolveError> {
    match access {
        AccessKind::Field => {
            if !descriptor.has_field {
                return Err(ResolveError::invalid_access_strategy(
                    entity,
                    &descriptor.name,
                    "field access requires a directly reachable storage location; \
                     getter-declared attributes need an explicit property override",
                ));
            }
        }
        AccessKind::Property => {
            if !descriptor.has_getter {
                return Err(ResolveError::invalid_access_strategy(
                    entity,
                    &descriptor.name,
                    "property access requires a getter",
                ));
            }
            if descriptor.is_persistent() && !descriptor.has_setter && !descriptor.read_only {
                return Err(ResolveError::invalid_access_strategy(
                    entity,
                    &descriptor.name,
                    "property access requires a setter unless the attribute is read-only",
                ));
            }
        }
    }

    Ok(())
}
