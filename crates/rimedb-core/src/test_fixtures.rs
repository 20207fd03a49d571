//! Shared fixtures: the mixed-access entity shape (field-declared
//! identifier, transient ordered map, derived JSON property), a plain
//! slot-backed state, and a recording persistence context.

use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    traits::{EntityHandle, EntityState, PersistenceContext},
    value::Value,
};
use rimedb_schema::{
    node::{AccessorDeclaration, ClassDeclaration, FieldDeclaration},
    types::AccessKind,
};
use std::cell::{Cell, RefCell};

///
/// Endpoint
///
/// Mixed-access entity: `name` is the field-declared identifier, `params`
/// is a transient insertion-ordered map, and `params_as_string` is the
/// persisted derived property whose accessor bodies serialize the map.
///

pub(crate) struct Endpoint {
    pub name: String,
    pub params: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    // Stable, explicit serialization; no expression evaluator anywhere near
    // this path.
    fn params_as_string(&self) -> Value {
        if self.params.is_empty() {
            return Value::Null;
        }

        let map: serde_json::Map<String, serde_json::Value> = self
            .params
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
            .collect();

        Value::Text(serde_json::Value::Object(map).to_string())
    }

    // A malformed payload is a hard error; the map is never silently
    // repopulated with substitute values.
    fn set_params_as_string(&mut self, value: Value) -> Result<(), InternalError> {
        self.params.clear();

        match value {
            Value::Null => Ok(()),
            Value::Text(raw) => {
                let parsed: serde_json::Map<String, serde_json::Value> =
                    serde_json::from_str(&raw).map_err(|err| {
                        InternalError::entity_invalid(format!("malformed params payload: {err}"))
                    })?;

                for (key, entry) in parsed {
                    let serde_json::Value::String(text) = entry else {
                        return Err(InternalError::entity_invalid(
                            "params payload values must be strings",
                        ));
                    };
                    self.params.push((key, text));
                }

                Ok(())
            }
            _ => Err(InternalError::entity_invalid(
                "params payload must be text or null",
            )),
        }
    }
}

impl EntityState for Endpoint {
    fn read_field(&self, attribute: &str) -> Result<Value, InternalError> {
        match attribute {
            "name" => Ok(Value::Text(self.name.clone())),
            "params" => Value::try_map(
                self.params
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::Text(value.clone()))),
            )
            .map_err(|err| InternalError::entity_invalid(err.to_string())),
            other => Err(InternalError::entity_invalid(format!(
                "no field slot '{other}'"
            ))),
        }
    }

    fn write_field(&mut self, attribute: &str, value: Value) -> Result<(), InternalError> {
        match attribute {
            "name" => {
                self.name = value
                    .as_text()
                    .ok_or_else(|| InternalError::entity_invalid("name must be text"))?
                    .to_string();
                Ok(())
            }
            "params" => {
                let entries = value
                    .as_map()
                    .ok_or_else(|| InternalError::entity_invalid("params must be a map"))?;

                self.params.clear();
                for (key, entry) in entries {
                    let text = entry
                        .as_text()
                        .ok_or_else(|| InternalError::entity_invalid("param values must be text"))?;
                    self.params.push((key.clone(), text.to_string()));
                }

                Ok(())
            }
            other => Err(InternalError::entity_invalid(format!(
                "no field slot '{other}'"
            ))),
        }
    }

    fn get_property(&self, attribute: &str) -> Result<Value, InternalError> {
        match attribute {
            "params_as_string" => Ok(self.params_as_string()),
            other => Err(InternalError::entity_invalid(format!(
                "no getter body '{other}'"
            ))),
        }
    }

    fn set_property(&mut self, attribute: &str, value: Value) -> Result<(), InternalError> {
        match attribute {
            "params_as_string" => self.set_params_as_string(value),
            other => Err(InternalError::entity_invalid(format!(
                "no setter body '{other}'"
            ))),
        }
    }
}

/// The mixed-access declaration for [`Endpoint`], under a caller-chosen
/// type path so tests never collide in the process-wide registry.
pub(crate) fn endpoint_class(type_path: &str) -> ClassDeclaration {
    ClassDeclaration::new(type_path)
        .field(FieldDeclaration::new("name").identifier())
        .field(FieldDeclaration::new("params").transient())
        .accessor(
            AccessorDeclaration::new("params_as_string")
                .persistent()
                .declared_access(AccessKind::Property),
        )
}

///
/// RowState
///
/// Plain slot-backed state with no accessor bodies, for field-access tests.
///

#[derive(Default)]
pub(crate) struct RowState {
    slots: Vec<(String, Value)>,
}

impl RowState {
    pub fn with(mut self, attribute: &str, value: Value) -> Self {
        self.slots.push((attribute.to_string(), value));
        self
    }
}

impl EntityState for RowState {
    fn read_field(&self, attribute: &str) -> Result<Value, InternalError> {
        self.slots
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| InternalError::entity_invalid(format!("no field slot '{attribute}'")))
    }

    fn write_field(&mut self, attribute: &str, value: Value) -> Result<(), InternalError> {
        match self.slots.iter_mut().find(|(name, _)| name == attribute) {
            Some((_, slot)) => *slot = value,
            None => self.slots.push((attribute.to_string(), value)),
        }

        Ok(())
    }

    fn get_property(&self, attribute: &str) -> Result<Value, InternalError> {
        Err(InternalError::entity_invalid(format!(
            "no getter body '{attribute}'"
        )))
    }

    fn set_property(&mut self, attribute: &str, _: Value) -> Result<(), InternalError> {
        Err(InternalError::entity_invalid(format!(
            "no setter body '{attribute}'"
        )))
    }
}

///
/// RecordingContext
///
/// Persistence context double that counts fetches, records first-dirty
/// notifications, and can be told to fail or to re-enter the entity during
/// a fetch.
///

#[derive(Default)]
pub(crate) struct RecordingContext {
    pub fetches: Cell<u32>,
    pub backing: RefCell<Vec<(String, Value)>>,
    pub first_dirty: RefCell<Vec<String>>,
    pub fail_fetch: Cell<bool>,
    pub reenter_on_fetch: RefCell<Option<String>>,
}

impl RecordingContext {
    pub fn with_backing(self, attribute: &str, value: Value) -> Self {
        self.backing
            .borrow_mut()
            .push((attribute.to_string(), value));
        self
    }
}

impl PersistenceContext for RecordingContext {
    fn fetch_lazy_value(
        &self,
        entity: &dyn EntityHandle,
        attribute: &str,
    ) -> Result<Value, InternalError> {
        self.fetches.set(self.fetches.get() + 1);

        if self.fail_fetch.get() {
            return Err(InternalError::new(
                ErrorClass::Internal,
                ErrorOrigin::Entity,
                "fetch backend unavailable",
            ));
        }

        let reenter = self.reenter_on_fetch.borrow().clone();
        if let Some(target) = reenter {
            entity.read(&target)?;
        }

        self.backing
            .borrow()
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| {
                InternalError::new(
                    ErrorClass::Internal,
                    ErrorOrigin::Entity,
                    format!("no backing value for '{attribute}'"),
                )
            })
    }

    fn on_first_dirty(&self, _: &dyn EntityHandle, attribute: &str) {
        self.first_dirty.borrow_mut().push(attribute.to_string());
    }
}
