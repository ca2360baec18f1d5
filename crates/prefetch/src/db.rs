mod builder;
pub use builder::Builder;

use crate::{driver::Driver, err, stmt, Create, Error, Registry, Result, Select};

use prefetch_core::{
    driver::{
        operation::{Operation, QueryRecords},
        Response,
    },
    schema::app::{ModelId, Schema},
    stmt::Record,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// Name of the database passed to [`Builder::build`].
pub const DEFAULT_DATABASE: &str = "default";

/// State shared between all `Db` clones. Immutable once built.
pub(crate) struct Shared {
    pub(crate) schema: Arc<Schema>,

    /// Prefetch definitions per model. A model without an entry is not
    /// prefetch-capable.
    pub(crate) registries: IndexMap<ModelId, Registry>,

    pub(crate) databases: IndexMap<String, Box<dyn Driver>>,
}

/// A database handle.
///
/// Cloning is cheap; all clones share the schema, the prefetch registries and
/// the drivers.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Starts a query over all records of `model`.
    pub fn select(&self, model: &str) -> Result<Select> {
        let model = self.model_id(model)?;
        Ok(Select::new(self.clone(), model))
    }

    /// Starts building a new record of `model`.
    pub fn create(&self, model: &str) -> Result<Create> {
        let model = self.model_id(model)?;
        Ok(Create::new(self.clone(), self.schema().model(model)))
    }

    /// Runs a query and returns every matching record. The query runs on the
    /// database it names, or on the default one.
    pub async fn query(&self, query: stmt::Query) -> Result<Vec<Record>> {
        let model = query.model.resolve(self.schema())?;

        let op = QueryRecords {
            model,
            filter: query.filter,
            include: query.include,
        };

        self.exec(query.using.as_deref(), op.into())
            .await?
            .into_records()
    }

    /// Sends an operation to the named database.
    pub async fn exec(&self, database: Option<&str>, op: Operation) -> Result<Response> {
        let name = database.unwrap_or(DEFAULT_DATABASE);

        let Some(driver) = self.shared.databases.get(name) else {
            return Err(err!("unknown database `{name}`"));
        };

        if let Some(query) = op.as_query() {
            let Some(model) = self.schema().get_model(query.model) else {
                return Err(Error::invalid_schema(format!(
                    "unknown model id {:?}",
                    query.model
                )));
            };

            tracing::debug!(
                database = name,
                model = %model.name,
                include = query.include.len(),
                "executing query"
            );
        }

        driver.exec(&self.shared.schema, op).await
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    /// The prefetch registry of a model, if the model is prefetch-capable.
    pub fn registry(&self, model: ModelId) -> Option<&Registry> {
        self.shared.registries.get(&model)
    }

    pub fn databases(&self) -> impl Iterator<Item = &str> {
        self.shared.databases.keys().map(String::as_str)
    }

    fn model_id(&self, name: &str) -> Result<ModelId> {
        stmt::ModelRef::from(name).resolve(self.schema())
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("schema", &self.shared.schema)
            .field("registries", &self.shared.registries)
            .field("databases", &self.shared.databases)
            .finish()
    }
}
