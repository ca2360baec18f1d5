use super::{BelongsTo, ModelId, Schema};
use crate::stmt;

use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model.
    pub id: FieldId,

    /// The field name
    pub name: String,

    /// Primitive or relation
    pub ty: FieldTy,

    /// True if the field can be null.
    pub nullable: bool,

    /// True if the field is the primary key
    pub primary_key: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    Primitive(stmt::Type),
    BelongsTo(BelongsTo),
}

impl Field {
    pub fn is_relation(&self) -> bool {
        matches!(self.ty, FieldTy::BelongsTo(_))
    }

    /// Returns the forward relation if this field is one.
    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match &self.ty {
            FieldTy::BelongsTo(belongs_to) => Some(belongs_to),
            FieldTy::Primitive(_) => None,
        }
    }

    pub fn as_primitive(&self) -> Option<stmt::Type> {
        match &self.ty {
            FieldTy::Primitive(ty) => Some(*ty),
            FieldTy::BelongsTo(_) => None,
        }
    }

    /// Returns a fully qualified name for the field.
    pub fn full_name(&self, schema: &Schema) -> String {
        let model = schema.model(self.id.model);
        format!("{}::{}", model.name, self.name)
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}
