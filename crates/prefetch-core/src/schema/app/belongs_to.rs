use super::{FieldId, FieldTy, Model, ModelId, Schema};

/// A forward relation: the owning record points at exactly one record of the
/// target model through a foreign key field.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Model the relation points at
    pub target: ModelId,

    /// The primitive field on the owning model holding the target's key
    pub foreign_key: FieldId,
}

impl BelongsTo {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}

impl From<BelongsTo> for FieldTy {
    fn from(value: BelongsTo) -> Self {
        Self::BelongsTo(value)
    }
}
