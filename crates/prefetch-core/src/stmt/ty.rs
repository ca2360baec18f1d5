use super::Value;

/// Type of a primitive field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I64,
    String,
}

impl Type {
    /// Returns `true` if `value` can be stored in a field of this type.
    /// `Null` is accepted here; nullability is checked by the field.
    pub fn is_compatible(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Type::Bool, Value::Bool(_))
                | (Type::I64, Value::I64(_))
                | (Type::String, Value::String(_))
        )
    }
}
