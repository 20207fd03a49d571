use thiserror::Error as ThisError;

///
/// ResolveError
///
/// Configuration errors detected while building descriptors or resolving
/// access strategies. All of them are fatal to initializing the entity type
/// and surface before any instance of the type exists.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum ResolveError {
    #[error("duplicate persistent attribute '{attribute}' on '{entity}': {reason}")]
    DuplicateAttribute {
        entity: String,
        attribute: String,
        reason: String,
    },

    #[error("invalid access strategy for '{attribute}' on '{entity}': {reason}")]
    InvalidAccessStrategy {
        entity: String,
        attribute: String,
        reason: String,
    },

    #[error("invalid declaration on '{entity}': {reason}")]
    InvalidDeclaration { entity: String, reason: String },

    #[error("entity '{entity}' declares multiple identifier attributes: '{first}', '{second}'")]
    MultipleIdentifier {
        entity: String,
        first: String,
        second: String,
    },

    #[error("entity '{entity}' declares no identifier attribute")]
    NoIdentifier { entity: String },
}

impl ResolveError {
    pub(crate) fn duplicate_attribute(
        entity: &str,
        attribute: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::DuplicateAttribute {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_access_strategy(
        entity: &str,
        attribute: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAccessStrategy {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_declaration(entity: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            entity: entity.to_string(),
            reason: reason.into(),
        }
    }
}
