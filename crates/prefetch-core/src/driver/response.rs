use crate::{bail, stmt::Record, Result};

#[derive(Debug, Clone)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Records returned by the operation
    Records(Vec<Record>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn records(records: Vec<Record>) -> Self {
        Self {
            rows: Rows::Records(records),
        }
    }

    pub fn into_records(self) -> Result<Vec<Record>> {
        self.rows.into_records()
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_records(&self) -> bool {
        matches!(self, Self::Records(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Rows::Count(count) => *count as usize,
            Rows::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_records(self) -> Result<Vec<Record>> {
        match self {
            Rows::Records(records) => Ok(records),
            Rows::Count(_) => bail!("invalid result: expected records, got a row count"),
        }
    }
}
