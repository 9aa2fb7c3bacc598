//! Field registry: dotted path -> live value accessor + error slot.
//!
//! Rendering code never touches a registration directly. It registers a
//! field once, then reads values and errors back by path and reports user
//! edits through [`FieldRegistry::edit_field`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::FormError;
use crate::path::FieldPath;
use crate::tree::{FormValueTree, unflatten};
use crate::validation::ValidationErrorSet;

/// Live access to the value behind one rendered field.
pub trait FieldAccessor: Send {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
}

/// Plain single-line text value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl FieldAccessor for TextField {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }
}

struct Registration {
    accessor: Box<dyn FieldAccessor>,
    error: Option<String>,
}

#[derive(Default)]
pub struct FieldRegistry {
    fields: BTreeMap<FieldPath, Registration>,
    initial_data: FormValueTree,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("initial_data", &self.initial_data)
            .finish()
    }
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose fields pick up their default from `initial` when they
    /// register.
    pub fn with_initial_data(initial: FormValueTree) -> Self {
        Self {
            fields: BTreeMap::new(),
            initial_data: initial,
        }
    }

    /// Register `accessor` under `path`.
    ///
    /// Registering a path twice keeps the latest accessor.
    pub fn register(&mut self, path: FieldPath, mut accessor: Box<dyn FieldAccessor>) {
        if let Some(default) = self.initial_data.get_str(&path) {
            accessor.set_value(default);
        }
        let previous = self.fields.insert(
            path.clone(),
            Registration {
                accessor,
                error: None,
            },
        );
        if previous.is_some() {
            warn!(%path, "field registered twice; keeping the latest registration");
        } else {
            debug!(%path, "field registered");
        }
    }

    pub fn register_text(&mut self, path: FieldPath) {
        self.register(path, Box::new(TextField::default()));
    }

    /// Remove the registration (and its error). Returns whether it existed.
    pub fn unregister(&mut self, path: &FieldPath) -> bool {
        self.fields.remove(path).is_some()
    }

    /// Scoped view registering relative names under `name`.
    pub fn scope(&mut self, name: &str) -> Result<Scope<'_>, FormError> {
        let prefix = FieldPath::parse(name)?;
        Ok(Scope {
            registry: self,
            prefix,
        })
    }

    pub fn is_registered(&self, path: &FieldPath) -> bool {
        self.fields.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Current value of every registered field, as a nested tree.
    pub fn get_values(&self) -> FormValueTree {
        unflatten(self.flat_values())
    }

    pub fn flat_values(&self) -> BTreeMap<FieldPath, String> {
        self.fields
            .iter()
            .map(|(path, reg)| (path.clone(), reg.accessor.value()))
            .collect()
    }

    pub fn value(&self, path: &FieldPath) -> Option<String> {
        self.fields.get(path).map(|reg| reg.accessor.value())
    }

    /// Seed value for `path` from the initial data, registered or not.
    pub fn default_value(&self, path: &FieldPath) -> Option<&str> {
        self.initial_data.get_str(path)
    }

    /// Programmatic override; leaves the error slot alone.
    pub fn set_field_value(&mut self, path: &FieldPath, value: &str) -> Result<(), FormError> {
        let reg = self
            .fields
            .get_mut(path)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        reg.accessor.set_value(value);
        Ok(())
    }

    /// A user edit: sets the value and clears the field's error.
    pub fn edit_field(&mut self, path: &FieldPath, value: &str) -> Result<(), FormError> {
        let reg = self
            .fields
            .get_mut(path)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        reg.accessor.set_value(value);
        reg.error = None;
        Ok(())
    }

    /// Show `errors`; every field not named in the set is cleared. Messages
    /// for paths that are not registered have no slot and are dropped.
    pub fn set_errors(&mut self, errors: &ValidationErrorSet) {
        for (path, reg) in self.fields.iter_mut() {
            reg.error = errors.get(path).map(str::to_string);
        }
        let orphaned = errors
            .paths()
            .filter(|p| !self.fields.contains_key(*p))
            .count();
        if orphaned > 0 {
            debug!(orphaned, "validation messages without a registered field");
        }
    }

    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.fields.get(path).and_then(|reg| reg.error.as_deref())
    }

    pub fn errors(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.fields
            .iter()
            .filter_map(|(path, reg)| reg.error.as_deref().map(|e| (path, e)))
    }

    pub fn clear_errors(&mut self) {
        for reg in self.fields.values_mut() {
            reg.error = None;
        }
    }
}

/// Registry view rooted at a path prefix. Scopes nest.
pub struct Scope<'a> {
    registry: &'a mut FieldRegistry,
    prefix: FieldPath,
}

impl<'a> Scope<'a> {
    pub fn prefix(&self) -> &FieldPath {
        &self.prefix
    }

    pub fn path(&self, name: &str) -> Result<FieldPath, FormError> {
        self.prefix.join(name)
    }

    pub fn register(
        &mut self,
        name: &str,
        accessor: Box<dyn FieldAccessor>,
    ) -> Result<FieldPath, FormError> {
        let path = self.path(name)?;
        self.registry.register(path.clone(), accessor);
        Ok(path)
    }

    pub fn register_text(&mut self, name: &str) -> Result<FieldPath, FormError> {
        self.register(name, Box::new(TextField::default()))
    }

    pub fn scope(&mut self, name: &str) -> Result<Scope<'_>, FormError> {
        let prefix = self.path(name)?;
        Ok(Scope {
            registry: &mut *self.registry,
            prefix,
        })
    }
}
