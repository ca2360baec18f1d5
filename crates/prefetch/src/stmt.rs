mod create;
pub use create::Create;

mod select;
pub use select::Select;

pub use prefetch_core::stmt::{Filter, ModelRef, Path, Query, Record, Type, Value, SEPARATOR};

use crate::{chain, engine, Chain, Db, Error, PrefetchRequest, Result};
use prefetch_core::schema::app::ModelId;
