use super::Value;
use crate::{bail, schema::app, Result};

use indexmap::IndexMap;
use std::hash::{Hash, Hasher};

/// A materialized row of a model.
///
/// Fields are kept in schema order. A belongs-to field holds
/// [`Value::Record`] once it has been joined with `include`, and
/// [`Value::Null`] otherwise. Data attached by a prefetch lives in a separate
/// map so that it can never be confused with a stored field.
#[derive(Debug, Clone)]
pub struct Record {
    model: app::ModelId,

    /// Index of the primary key within `fields`
    key: usize,

    fields: IndexMap<String, Value>,

    prefetched: IndexMap<String, Value>,
}

impl Record {
    /// Creates a record of the given model with every field set to null.
    pub fn new(model: &app::Model) -> Record {
        Record {
            model: model.id,
            key: model.primary_key.index,
            fields: model
                .fields
                .iter()
                .map(|field| (field.name.clone(), Value::Null))
                .collect(),
            prefetched: IndexMap::new(),
        }
    }

    pub fn model(&self) -> app::ModelId {
        self.model
    }

    /// The record's primary key value.
    pub fn key(&self) -> &Value {
        self.fields
            .get_index(self.key)
            .map(|(_, value)| value)
            .unwrap_or(&Value::Null)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    /// Sets a field. Fails if the model has no field with that name.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let Some(slot) = self.fields.get_mut(field) else {
            bail!("record of {:?} has no field `{field}`", self.model);
        };
        *slot = value.into();
        Ok(())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// The record joined through a belongs-to field, if it was loaded and is
    /// not null.
    pub fn related(&self, field: &str) -> Option<&Record> {
        self.fields.get(field).and_then(Value::as_record)
    }

    pub fn related_mut(&mut self, field: &str) -> Option<&mut Record> {
        self.fields.get_mut(field).and_then(Value::as_record_mut)
    }

    /// Data attached under `name` by a prefetch decorator. `None` means the
    /// prefetch was not requested for this record.
    pub fn prefetched(&self, name: &str) -> Option<&Value> {
        self.prefetched.get(name)
    }

    pub fn is_prefetched(&self, name: &str) -> bool {
        self.prefetched.contains_key(name)
    }

    pub fn set_prefetched(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.prefetched.insert(name.into(), value.into());
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
            && self.fields == other.fields
            && self.prefetched == other.prefetched
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.model.hash(state);
        self.key().hash(state);
    }
}
