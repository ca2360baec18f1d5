use super::{FieldTy, Model, ModelId};
use crate::{Error, Result};

use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    /// Builds a schema from fully resolved models, checking that the models
    /// are consistent with each other.
    pub fn from_models(models: impl IntoIterator<Item = Model>) -> Result<Schema> {
        let schema = Schema {
            models: models.into_iter().map(|model| (model.id, model)).collect(),
        };
        schema.verify()?;
        Ok(schema)
    }

    /// Get a model by ID
    #[track_caller]
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        let id = id.into();
        self.models
            .get(&id)
            .unwrap_or_else(|| panic!("no model with id {id:?}"))
    }

    pub fn get_model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(&id)
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.values().find(|model| model.name == name)
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    fn verify(&self) -> Result<()> {
        let mut names = std::collections::HashSet::new();

        for model in self.models() {
            if !names.insert(model.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate model name `{}`",
                    model.name
                )));
            }

            if model.primary_key.model != model.id
                || model.primary_key.index >= model.fields.len()
            {
                return Err(Error::invalid_schema(format!(
                    "model `{}` has an invalid primary key",
                    model.name
                )));
            }

            for (index, field) in model.fields.iter().enumerate() {
                if field.id != model.id.field(index) {
                    return Err(Error::invalid_schema(format!(
                        "field `{}` of model `{}` has a mismatched id",
                        field.name, model.name
                    )));
                }

                let FieldTy::BelongsTo(belongs_to) = &field.ty else {
                    continue;
                };

                if self.get_model(belongs_to.target).is_none() {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}::{}` targets an unknown model",
                        model.name, field.name
                    )));
                }

                let foreign_key = model.fields.get(belongs_to.foreign_key.index);
                if belongs_to.foreign_key.model != model.id
                    || !matches!(foreign_key, Some(fk) if !fk.is_relation())
                {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}::{}` must use a primitive field of `{}` as its foreign key",
                        model.name, field.name, model.name
                    )));
                }
            }
        }

        Ok(())
    }
}
