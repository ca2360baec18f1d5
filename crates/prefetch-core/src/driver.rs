mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::app::Schema};

use std::{fmt::Debug, sync::Arc};

/// The query-execution collaborator.
///
/// A driver runs already-resolved operations against one logical database.
/// It owns no prefetch logic: it filters records, performs the eager joins
/// an operation asks for, and stores new records.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Execute a database operation
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response>;
}
