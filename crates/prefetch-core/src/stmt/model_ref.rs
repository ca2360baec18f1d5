use crate::{
    schema::app::{ModelId, Schema},
    Error, Result,
};

/// Reference to a model, either by id or by a name resolved on first use.
///
/// Prefetch filters build queries before any schema is at hand, so they name
/// the related model and leave the lookup to the database handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelRef {
    Id(ModelId),
    Name(String),
}

impl ModelRef {
    pub fn resolve(&self, schema: &Schema) -> Result<ModelId> {
        match self {
            ModelRef::Id(id) => schema
                .get_model(*id)
                .map(|model| model.id)
                .ok_or_else(|| Error::invalid_schema(format!("unknown model id {id:?}"))),
            ModelRef::Name(name) => schema
                .model_by_name(name)
                .map(|model| model.id)
                .ok_or_else(|| Error::invalid_schema(format!("unknown model `{name}`"))),
        }
    }
}

impl From<ModelId> for ModelRef {
    fn from(src: ModelId) -> Self {
        ModelRef::Id(src)
    }
}

impl From<&str> for ModelRef {
    fn from(src: &str) -> Self {
        ModelRef::Name(src.to_string())
    }
}

impl From<String> for ModelRef {
    fn from(src: String) -> Self {
        ModelRef::Name(src)
    }
}
