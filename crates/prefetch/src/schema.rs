mod field;
pub use field::{BelongsTo, Field, FieldTy};

mod model;
pub use model::Model;

pub use prefetch_core::schema::*;
