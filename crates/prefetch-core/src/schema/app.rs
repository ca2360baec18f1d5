mod belongs_to;
pub use belongs_to::BelongsTo;

mod field;
pub use field::{Field, FieldId, FieldTy};

mod model;
pub use model::{Model, ModelId};

mod schema;
pub use schema::Schema;
