use prefetch_core::stmt;

/// A field as declared by the application.
#[derive(Debug, Clone)]
pub struct Field {
    /// The field name
    pub name: String,

    /// Primitive or relation
    pub ty: FieldTy,

    /// True if the field can be null
    pub nullable: bool,

    /// True if the field is the primary key
    pub primary_key: bool,
}

/// Field type with unresolved references
#[derive(Debug, Clone)]
pub enum FieldTy {
    Primitive(stmt::Type),
    BelongsTo(BelongsTo),
}

/// Declaration of a forward relation.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Name of the target model
    pub target: String,

    /// Name of the field on the declaring model holding the target's key
    pub foreign_key: String,
}

impl Field {
    /// An auto-incrementing `i64` primary key.
    pub fn key(name: impl Into<String>) -> Field {
        Field {
            primary_key: true,
            ..Field::primitive(name, stmt::Type::I64)
        }
    }

    pub fn primitive(name: impl Into<String>, ty: stmt::Type) -> Field {
        Field {
            name: name.into(),
            ty: FieldTy::Primitive(ty),
            nullable: false,
            primary_key: false,
        }
    }

    pub fn i64(name: impl Into<String>) -> Field {
        Field::primitive(name, stmt::Type::I64)
    }

    pub fn string(name: impl Into<String>) -> Field {
        Field::primitive(name, stmt::Type::String)
    }

    pub fn bool(name: impl Into<String>) -> Field {
        Field::primitive(name, stmt::Type::Bool)
    }

    /// A forward relation to `target` through `foreign_key`. The relation is
    /// nullable exactly when its foreign key is.
    pub fn belongs_to(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Field {
        Field {
            name: name.into(),
            ty: FieldTy::BelongsTo(BelongsTo {
                target: target.into(),
                foreign_key: foreign_key.into(),
            }),
            nullable: false,
            primary_key: false,
        }
    }

    pub fn nullable(mut self) -> Field {
        self.nullable = true;
        self
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.ty, FieldTy::BelongsTo(_))
    }
}
