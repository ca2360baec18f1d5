mod filter;
pub use filter::Filter;

mod model_ref;
pub use model_ref::ModelRef;

mod path;
pub use path::{Path, SEPARATOR};

mod query;
pub use query::Query;

mod record;
pub use record::Record;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
