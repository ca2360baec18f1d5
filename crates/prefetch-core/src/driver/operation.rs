use crate::{
    schema::app::ModelId,
    stmt::{Filter, Path, Record},
};

#[derive(Debug, Clone)]
pub enum Operation {
    /// Store a new record
    Insert(Insert),

    /// Select the records of a model matching a filter
    Query(QueryRecords),
}

#[derive(Debug, Clone)]
pub struct Insert {
    /// The record to store. A null primary key asks the driver to assign one.
    pub record: Record,
}

#[derive(Debug, Clone)]
pub struct QueryRecords {
    /// The model being selected
    pub model: ModelId,

    /// Which records to return
    pub filter: Filter,

    /// Belongs-to paths to join into each returned record
    pub include: Vec<Path>,
}

impl Operation {
    pub fn is_query(&self) -> bool {
        matches!(self, Operation::Query(_))
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Operation::Insert(_))
    }

    pub fn as_query(&self) -> Option<&QueryRecords> {
        match self {
            Operation::Query(query) => Some(query),
            Operation::Insert(_) => None,
        }
    }
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Operation::Insert(value)
    }
}

impl From<QueryRecords> for Operation {
    fn from(value: QueryRecords) -> Self {
        Operation::Query(value)
    }
}
