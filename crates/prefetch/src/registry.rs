use crate::{Prefetch, Result};

use prefetch_core::stmt::Value;

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

type FactoryFn = dyn Fn(&Args) -> Result<Arc<dyn Prefetch>> + Send + Sync;

/// A registered prefetch: either a ready definition or a factory that builds
/// one from request arguments.
#[derive(Clone)]
pub enum Entry {
    Instance(Arc<dyn Prefetch>),
    Factory(Arc<FactoryFn>),
}

impl Entry {
    pub fn instance(prefetch: impl Prefetch) -> Entry {
        Entry::Instance(Arc::new(prefetch))
    }

    /// Registers a parameterized prefetch. The factory runs every time the
    /// name is requested, with the request's arguments or empty ones.
    pub fn factory<F, P>(factory: F) -> Entry
    where
        F: Fn(&Args) -> Result<P> + Send + Sync + 'static,
        P: Prefetch,
    {
        Entry::Factory(Arc::new(move |args| {
            factory(args).map(|prefetch| Arc::new(prefetch) as Arc<dyn Prefetch>)
        }))
    }

    pub fn is_factory(&self) -> bool {
        matches!(self, Entry::Factory(_))
    }
}

impl<P: Prefetch> From<P> for Entry {
    fn from(value: P) -> Self {
        Entry::instance(value)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Instance(_) => f.write_str("Instance"),
            Entry::Factory(_) => f.write_str("Factory"),
        }
    }
}

/// The named prefetch definitions of one model.
///
/// A model is prefetch-capable when a registry is attached to it with
/// [`Builder::prefetch`](crate::db::Builder::prefetch), even an empty one.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: IndexMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Adds a definition under `name`, replacing any previous one.
    pub fn define(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Registry {
        self.definitions.insert(name.into(), entry.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<N: Into<String>, E: Into<Entry>> FromIterator<(N, E)> for Registry {
    fn from_iter<T: IntoIterator<Item = (N, E)>>(iter: T) -> Self {
        Registry {
            definitions: iter
                .into_iter()
                .map(|(name, entry)| (name.into(), entry.into()))
                .collect(),
        }
    }
}

/// Arguments for a parameterized prefetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keyword: IndexMap<String, Value>,
}

impl Args {
    pub fn new() -> Args {
        Args::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Args {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Args {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn get_keyword(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// A prefetch requested on a query: a possibly `__`-separated name and,
/// for parameterized definitions, arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefetchRequest {
    name: String,
    args: Option<Args>,
}

impl PrefetchRequest {
    pub fn new(name: impl Into<String>) -> PrefetchRequest {
        PrefetchRequest {
            name: name.into(),
            args: None,
        }
    }

    pub fn with_args(name: impl Into<String>, args: Args) -> PrefetchRequest {
        PrefetchRequest {
            name: name.into(),
            args: Some(args),
        }
    }

    /// The full name, also used as the key results are attached under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> Option<&Args> {
        self.args.as_ref()
    }
}

impl From<&str> for PrefetchRequest {
    fn from(value: &str) -> Self {
        PrefetchRequest::new(value)
    }
}

impl From<String> for PrefetchRequest {
    fn from(value: String) -> Self {
        PrefetchRequest::new(value)
    }
}

impl From<&PrefetchRequest> for PrefetchRequest {
    fn from(value: &PrefetchRequest) -> Self {
        value.clone()
    }
}

impl<N: Into<String>> From<(N, Args)> for PrefetchRequest {
    fn from((name, args): (N, Args)) -> Self {
        PrefetchRequest::with_args(name, args)
    }
}
