use super::*;

use prefetch_core::{driver::operation::Insert, schema::app};

/// Builds and inserts one record.
#[derive(Debug)]
pub struct Create {
    db: Db,
    record: Record,
    using: Option<String>,
}

impl Create {
    pub(crate) fn new(db: Db, model: &app::Model) -> Create {
        Create {
            db,
            record: Record::new(model),
            using: None,
        }
    }

    /// Sets a field. Fails if the model has no field with that name.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Result<Create> {
        self.record.set(field, value)?;
        Ok(self)
    }

    pub fn using(mut self, database: impl Into<String>) -> Create {
        self.using = Some(database.into());
        self
    }

    /// Inserts the record and returns it as stored, with its key assigned.
    pub async fn exec(self) -> Result<Record> {
        let response = self
            .db
            .exec(self.using.as_deref(), Insert { record: self.record }.into())
            .await?;

        let mut records = response.into_records()?;
        match records.pop() {
            Some(record) if records.is_empty() => Ok(record),
            _ => Err(Error::from_args(format_args!(
                "insert did not return exactly one record"
            ))),
        }
    }
}
