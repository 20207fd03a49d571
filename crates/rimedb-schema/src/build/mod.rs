//! Descriptor construction: fold raw field and accessor declarations into
//! one merged descriptor per logical attribute.

use crate::{
    MAX_ATTRIBUTE_NAME_LEN, MAX_TYPE_PATH_LEN,
    error::ResolveError,
    node::{AccessorDeclaration, AttributeDescriptor, ClassDeclaration, FieldDeclaration},
    types::AccessKind,
};

/// Merge a class declaration into per-attribute descriptors.
///
/// Pure metadata construction: declaration order is preserved, a field and
/// its accessor pair fold into one descriptor keyed by name, and conflicting
/// persistence claims fail instead of being silently resolved.
pub fn build_descriptors(
    class: &ClassDeclaration,
) -> Result<Vec<AttributeDescriptor>, ResolveError> {
    validate_class(class)?;

    let mut descriptors: Vec<AttributeDescriptor> = Vec::new();

    for field in &class.fields {
        if !field.persistent && !field.transient {
            continue;
        }
        if descriptors.iter().any(|d| d.name == field.name) {
            return Err(ResolveError::duplicate_attribute(
                &class.type_path,
                &field.name,
                "field declared more than once",
            ));
        }

        descriptors.push(descriptor_from_field(field));
    }

    let mut seen_accessors: Vec<&str> = Vec::new();
    for accessor in &class.accessors {
        if seen_accessors.contains(&accessor.name.as_str()) {
            return Err(ResolveError::duplicate_attribute(
                &class.type_path,
                &accessor.name,
                "accessor pair declared more than once",
            ));
        }
        seen_accessors.push(&accessor.name);

        match descriptors.iter_mut().find(|d| d.name == accessor.name) {
            Some(descriptor) => merge_accessor(&class.type_path, descriptor, accessor)?,
            None => {
                if accessor.persistent {
                    descriptors.push(descriptor_from_accessor(accessor));
                }
                // a plain accessor pair with no persistence claim and no
                // backing field is not an attribute
            }
        }
    }

    Ok(descriptors)
}

fn descriptor_from_field(field: &FieldDeclaration) -> AttributeDescriptor {
    AttributeDescriptor {
        name: field.name.clone(),
        declared_access: field.declared_access,
        identifier: field.identifier,
        transient: field.transient,
        fetch: field.fetch,
        metadata_site: AccessKind::Field,
        has_field: true,
        has_getter: false,
        has_setter: false,
        sealed: false,
        read_only: false,
    }
}

fn descriptor_from_accessor(accessor: &AccessorDeclaration) -> AttributeDescriptor {
    AttributeDescriptor {
        name: accessor.name.clone(),
        declared_access: accessor.declared_access,
        identifier: accessor.identifier,
        transient: false,
        fetch: accessor.fetch,
        metadata_site: AccessKind::Property,
        has_field: false,
        has_getter: accessor.has_getter,
        has_setter: accessor.has_setter,
        sealed: accessor.sealed,
        read_only: accessor.read_only,
    }
}

// Fold an accessor pair into the descriptor created by its backing field.
fn merge_accessor(
    entity: &str,
    descriptor: &mut AttributeDescriptor,
    accessor: &AccessorDeclaration,
) -> Result<(), ResolveError> {
    descriptor.has_getter = accessor.has_getter;
    descriptor.has_setter = accessor.has_setter;
    descriptor.sealed = accessor.sealed;
    descriptor.read_only = accessor.read_only;
    descriptor.identifier = descriptor.identifier || accessor.identifier;

    if !accessor.persistent {
        return Ok(());
    }

    if descriptor.transient {
        // a persistent property supersedes a transient field of the same name
        descriptor.transient = false;
        descriptor.declared_access = accessor.declared_access;
        descriptor.metadata_site = AccessKind::Property;
        descriptor.fetch = accessor.fetch;

        return Ok(());
    }

    // Both the field and the property claim persistence for this name. An
    // explicit access-kind annotation on exactly one side resolves the
    // conflict in that side's favor; anything else is a declaration error.
    match (descriptor.declared_access, accessor.declared_access) {
        (Some(field_kind), Some(accessor_kind)) if field_kind == accessor_kind => {
            descriptor.metadata_site = field_kind;
            if field_kind == AccessKind::Property {
                descriptor.fetch = accessor.fetch;
            }
        }
        (Some(_), None) => {
            // field-side override wins; metadata stays on the field
        }
        (None, Some(kind)) => {
            descriptor.declared_access = Some(kind);
            descriptor.metadata_site = AccessKind::Property;
            descriptor.fetch = accessor.fetch;
        }
        (None, None) => {
            return Err(ResolveError::duplicate_attribute(
                entity,
                &accessor.name,
                "field and property both claim persistence without an explicit access override",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(ResolveError::duplicate_attribute(
                entity,
                &accessor.name,
                "field and property carry conflicting declared access kinds",
            ));
        }
    }

    Ok(())
}

fn validate_class(class: &ClassDeclaration) -> Result<(), ResolveError> {
    if class.type_path.is_empty() {
        return Err(ResolveError::invalid_declaration(
            &class.type_path,
            "type path is empty",
        ));
    }
    if class.type_path.len() > MAX_TYPE_PATH_LEN {
        return Err(ResolveError::invalid_declaration(
            &class.type_path,
            format!("type path exceeds max length {MAX_TYPE_PATH_LEN}"),
        ));
    }

    for name in class
        .fields
        .iter()
        .map(|f| &f.name)
        .chain(class.accessors.iter().map(|a| &a.name))
    {
        if name.is_empty() {
            return Err(ResolveError::invalid_declaration(
                &class.type_path,
                "attribute name is empty",
            ));
        }
        if name.len() > MAX_ATTRIBUTE_NAME_LEN {
            return Err(ResolveError::invalid_declaration(
                &class.type_path,
                format!("attribute name '{name}' exceeds max length {MAX_ATTRIBUTE_NAME_LEN}"),
            ));
        }
    }

    for accessor in &class.accessors {
        if !accessor.has_getter && !accessor.has_setter {
            return Err(ResolveError::invalid_declaration(
                &class.type_path,
                format!("accessor pair '{}' declares neither getter nor setter", accessor.name),
            ));
        }
    }

    Ok(())
}
