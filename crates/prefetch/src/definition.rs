use crate::{stmt::Query, Error, Result};

use prefetch_core::stmt::{Record, Value};

use std::fmt;

/// A named strategy for batch-fetching one kind of related data for one
/// kind of primary record.
///
/// Implement the trait directly, or wrap four closures with
/// [`Prefetcher::builder`].
///
/// ```ignore
/// struct Books;
///
/// impl Prefetch for Books {
///     fn filter(&self, keys: &[Value]) -> Result<Query> {
///         Ok(Query::filter("Book", Filter::in_list("author_id", keys.to_vec())))
///     }
///
///     fn reverse_mapper(&self, book: &Record) -> Result<Vec<Value>> {
///         Ok(vec![book.get("author_id").cloned().unwrap_or_default()])
///     }
///
///     fn decorator(&self, author: &mut Record, books: Option<&[Record]>) -> Result<()> {
///         author.set_prefetched("books", books.unwrap_or_default().to_vec());
///         Ok(())
///     }
/// }
/// ```
pub trait Prefetch: Send + Sync + 'static {
    /// Returns the bulk query for the related records of all `keys`.
    fn filter(&self, keys: &[Value]) -> Result<Query>;

    /// Maps a related record back to the keys of the primary records it
    /// belongs to. An empty list, or null keys, drop the record.
    fn reverse_mapper(&self, related: &Record) -> Result<Vec<Value>>;

    /// Attaches related data to a primary record.
    ///
    /// Called once per primary record with `None` before the bulk query runs,
    /// to set the "no related items" default, and again with `Some` for
    /// records that have related items.
    fn decorator(&self, primary: &mut Record, related: Option<&[Record]>) -> Result<()>;

    /// The key of a primary record. Defaults to its primary key.
    fn mapper(&self, primary: &Record) -> Result<Value> {
        Ok(primary.key().clone())
    }

    /// Whether several primary records may share one key. Forced on when the
    /// prefetch is reached through a forward relation.
    fn collect(&self) -> bool {
        false
    }
}

type FilterFn = dyn Fn(&[Value]) -> Result<Query> + Send + Sync;
type ReverseMapperFn = dyn Fn(&Record) -> Result<Vec<Value>> + Send + Sync;
type DecoratorFn = dyn Fn(&mut Record, Option<&[Record]>) -> Result<()> + Send + Sync;
type MapperFn = dyn Fn(&Record) -> Result<Value> + Send + Sync;

/// A [`Prefetch`] assembled from standalone functions.
pub struct Prefetcher {
    filter: Box<FilterFn>,
    reverse_mapper: Box<ReverseMapperFn>,
    decorator: Box<DecoratorFn>,
    mapper: Option<Box<MapperFn>>,
    collect: bool,
}

#[derive(Default)]
pub struct PrefetcherBuilder {
    filter: Option<Box<FilterFn>>,
    reverse_mapper: Option<Box<ReverseMapperFn>>,
    decorator: Option<Box<DecoratorFn>>,
    mapper: Option<Box<MapperFn>>,
    collect: bool,
}

impl Prefetcher {
    pub fn builder() -> PrefetcherBuilder {
        PrefetcherBuilder::default()
    }
}

impl PrefetcherBuilder {
    pub fn filter(
        mut self,
        filter: impl Fn(&[Value]) -> Result<Query> + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn reverse_mapper(
        mut self,
        reverse_mapper: impl Fn(&Record) -> Result<Vec<Value>> + Send + Sync + 'static,
    ) -> Self {
        self.reverse_mapper = Some(Box::new(reverse_mapper));
        self
    }

    pub fn decorator(
        mut self,
        decorator: impl Fn(&mut Record, Option<&[Record]>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.decorator = Some(Box::new(decorator));
        self
    }

    pub fn mapper(
        mut self,
        mapper: impl Fn(&Record) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.mapper = Some(Box::new(mapper));
        self
    }

    pub fn collect(mut self, collect: bool) -> Self {
        self.collect = collect;
        self
    }

    /// Fails if `filter`, `reverse_mapper` or `decorator` was not supplied.
    pub fn build(self) -> Result<Prefetcher> {
        let Some(filter) = self.filter else {
            return Err(Error::invalid_definition("filter"));
        };
        let Some(reverse_mapper) = self.reverse_mapper else {
            return Err(Error::invalid_definition("reverse_mapper"));
        };
        let Some(decorator) = self.decorator else {
            return Err(Error::invalid_definition("decorator"));
        };

        Ok(Prefetcher {
            filter,
            reverse_mapper,
            decorator,
            mapper: self.mapper,
            collect: self.collect,
        })
    }
}

impl Prefetch for Prefetcher {
    fn filter(&self, keys: &[Value]) -> Result<Query> {
        (self.filter)(keys)
    }

    fn reverse_mapper(&self, related: &Record) -> Result<Vec<Value>> {
        (self.reverse_mapper)(related)
    }

    fn decorator(&self, primary: &mut Record, related: Option<&[Record]>) -> Result<()> {
        (self.decorator)(primary, related)
    }

    fn mapper(&self, primary: &Record) -> Result<Value> {
        match &self.mapper {
            Some(mapper) => mapper(primary),
            None => Ok(primary.key().clone()),
        }
    }

    fn collect(&self) -> bool {
        self.collect
    }
}

impl fmt::Debug for Prefetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefetcher")
            .field("mapper", &self.mapper.as_ref().map(|_| "<fn>"))
            .field("collect", &self.collect)
            .finish_non_exhaustive()
    }
}
