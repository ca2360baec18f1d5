use super::*;

use indexmap::IndexMap;
use std::fmt;

/// A query over one model that can carry prefetch requests.
///
/// Builder methods return a modified copy; a `Select` is never changed by
/// deriving another one from it. Prefetch names are resolved when they are
/// added and fetched once per call to [`all`](Self::all),
/// [`first`](Self::first) or [`get`](Self::get).
#[derive(Clone)]
pub struct Select {
    db: Db,

    model: ModelId,

    /// Base query, including the joins required by forwarding chains
    untyped: Query,

    /// Resolved chains by requested name, in request order
    prefetch: IndexMap<String, Chain>,
}

impl Select {
    pub(crate) fn new(db: Db, model: ModelId) -> Select {
        Select {
            db,
            model,
            untyped: Query::all(model),
            prefetch: IndexMap::new(),
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn filter(&self, filter: impl Into<Filter>) -> Select {
        let mut select = self.clone();
        select.untyped.filter.add_filter(filter);
        select
    }

    /// Eagerly joins the records along a belongs-to path.
    pub fn include(&self, path: impl Into<Path>) -> Select {
        let mut select = self.clone();
        select.untyped.add_include(path);
        select
    }

    /// Runs the base query, and every bulk prefetch query, on the named
    /// database.
    pub fn using(&self, database: impl Into<String>) -> Select {
        let mut select = self.clone();
        select.untyped.using = Some(database.into());
        select
    }

    /// Returns a copy with the given prefetches added.
    ///
    /// Every name is resolved immediately, so a bad name fails here rather
    /// than when the rows are loaded. Requesting a name twice replaces the
    /// earlier request.
    pub fn with_prefetch<I>(&self, requests: I) -> Result<Select>
    where
        I: IntoIterator,
        I::Item: Into<PrefetchRequest>,
    {
        let mut select = self.clone();

        for request in requests {
            let request = request.into();
            let chain = chain::resolve(&self.db, self.model, &request)?;
            select.prefetch.insert(request.name().to_string(), chain);
        }

        for chain in select.prefetch.values() {
            if let Some(path) = chain.include_path() {
                select.untyped.add_include(path);
            }
        }

        Ok(select)
    }

    /// Names of the requested prefetches, in request order.
    pub fn prefetches(&self) -> impl Iterator<Item = &str> {
        self.prefetch.keys().map(String::as_str)
    }

    pub fn chain(&self, name: &str) -> Option<&Chain> {
        self.prefetch.get(name)
    }

    /// The base query that [`all`](Self::all) sends to the database.
    pub fn to_query(&self) -> &Query {
        &self.untyped
    }

    pub async fn all(&self) -> Result<Vec<Record>> {
        let mut rows = self.db.query(self.untyped.clone()).await?;
        self.prefetch_into(&mut rows).await?;
        Ok(rows)
    }

    /// The first matching record, if any. Prefetches run for that record
    /// only.
    pub async fn first(&self) -> Result<Option<Record>> {
        let mut rows = self.db.query(self.untyped.clone()).await?;
        rows.truncate(1);
        self.prefetch_into(&mut rows).await?;
        Ok(rows.pop())
    }

    /// The only matching record. Fails if there are none or more than one.
    pub async fn get(&self) -> Result<Record> {
        let mut rows = self.db.query(self.untyped.clone()).await?;

        match rows.len() {
            0 => return Err(Error::record_not_found(self.describe())),
            1 => {}
            n => {
                return Err(Error::too_many_records(format!(
                    "{}; rows={n}",
                    self.describe()
                )))
            }
        }

        self.prefetch_into(&mut rows).await?;
        Ok(rows.remove(0))
    }

    async fn prefetch_into(&self, rows: &mut [Record]) -> Result<()> {
        let model = self.db.schema().model(self.model);
        let using = self.untyped.using.as_deref();

        for (name, chain) in &self.prefetch {
            engine::fetch(&self.db, rows, name, model, chain, using).await?;
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("model={}", self.db.schema().model(self.model).name)
    }
}

impl fmt::Debug for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("model", &self.model)
            .field("query", &self.untyped)
            .field("prefetch", &self.prefetch)
            .finish()
    }
}
