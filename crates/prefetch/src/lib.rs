mod chain;
pub use chain::{Chain, Forwarder};

pub mod db;
pub use db::{Db, DEFAULT_DATABASE};

mod definition;
pub use definition::{Prefetch, Prefetcher, PrefetcherBuilder};

pub mod driver;

mod engine;

mod registry;
pub use registry::{Args, Entry, PrefetchRequest, Registry};

pub mod schema;

pub mod stmt;
pub use stmt::{Create, Select};

pub use prefetch_core::{bail, err, Error, Result};
