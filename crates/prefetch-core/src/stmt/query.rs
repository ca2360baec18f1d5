use super::{Filter, ModelRef, Path};

/// A query for the records of one model.
///
/// This is what a prefetch `filter` returns: a description of the bulk
/// query, executed later by the database handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The model being selected
    pub model: ModelRef,

    /// How to filter the records
    pub filter: Filter,

    /// Belongs-to paths to join eagerly
    pub include: Vec<Path>,

    /// Name of the database to run against. `None` uses the default.
    pub using: Option<String>,
}

impl Query {
    pub fn all(model: impl Into<ModelRef>) -> Query {
        Query::filter(model, Filter::All)
    }

    pub fn filter(model: impl Into<ModelRef>, filter: impl Into<Filter>) -> Query {
        Query {
            model: model.into(),
            filter: filter.into(),
            include: vec![],
            using: None,
        }
    }

    pub fn and(mut self, filter: impl Into<Filter>) -> Query {
        self.filter.add_filter(filter);
        self
    }

    pub fn include(mut self, path: impl Into<Path>) -> Query {
        self.add_include(path);
        self
    }

    pub fn using(mut self, database: impl Into<String>) -> Query {
        self.using = Some(database.into());
        self
    }

    /// Adds an eager join, merging it with the joins already requested. A
    /// path already covered by a longer one is dropped, and a longer path
    /// replaces the shorter paths it covers.
    pub fn add_include(&mut self, path: impl Into<Path>) {
        let path = path.into();

        if path.is_empty() || self.include.iter().any(|existing| path.is_prefix_of(existing)) {
            return;
        }

        self.include.retain(|existing| !existing.is_prefix_of(&path));
        self.include.push(path);
    }
}
