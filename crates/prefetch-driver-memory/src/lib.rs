mod include;

use prefetch_core::{
    async_trait, bail,
    driver::{
        operation::{Insert, Operation, QueryRecords},
        Driver, Response,
    },
    err,
    schema::app::{FieldTy, ModelId, Schema},
    stmt::{self, Record, Value},
    Error, Result,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use url::Url;

/// An in-memory database.
///
/// Records are kept per model in insertion order. Queries scan the table,
/// apply the filter and then join the requested belongs-to paths.
#[derive(Debug)]
pub struct Memory {
    label: String,
    tables: Mutex<HashMap<ModelId, Table>>,
}

#[derive(Debug, Default)]
struct Table {
    records: Vec<Record>,
    next_id: i64,
}

impl Memory {
    /// Create a driver from a `memory://` URL. The host, if any, is used as a
    /// label in logs.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "memory" {
            bail!(
                "connection URL does not have a `memory` scheme; url={}",
                url_str
            );
        }

        let label = url.host_str().filter(|host| !host.is_empty());
        Ok(Memory::labeled(label.unwrap_or("default")))
    }

    pub fn in_memory() -> Self {
        Memory::labeled("default")
    }

    fn labeled(label: &str) -> Self {
        Memory {
            label: label.to_string(),
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn tables(&self) -> Result<MutexGuard<'_, HashMap<ModelId, Table>>> {
        self.tables
            .lock()
            .map_err(|_| err!("memory database `{}` is poisoned", self.label))
    }

    fn insert(&self, schema: &Schema, insert: Insert) -> Result<Response> {
        let mut record = insert.record;
        let Some(model) = schema.get_model(record.model()) else {
            bail!("insert into unknown model {:?}", record.model());
        };

        for field in &model.fields {
            match &field.ty {
                FieldTy::BelongsTo(_) => {
                    // Only the foreign key is stored; joins are rebuilt on read.
                    record.set(&field.name, Value::Null)?;
                }
                FieldTy::Primitive(ty) => {
                    let value = record.get(&field.name).unwrap_or(&Value::Null);

                    if !ty.is_compatible(value) {
                        bail!(
                            "field `{}` expects {:?}; value={}",
                            field.full_name(schema),
                            ty,
                            value
                        );
                    }

                    if value.is_null() && !field.nullable && !field.primary_key {
                        bail!("field `{}` cannot be null", field.full_name(schema));
                    }
                }
            }
        }

        let mut tables = self.tables()?;
        let table = tables.entry(model.id).or_default();

        if record.key().is_null() {
            if model.primary_key_field().as_primitive() != Some(stmt::Type::I64) {
                bail!("model `{}` needs an explicit primary key", model.name);
            }
            table.next_id += 1;
            record.set(&model.primary_key_field().name, table.next_id)?;
        } else {
            if table.records.iter().any(|stored| stored.key() == record.key()) {
                bail!(
                    "duplicate primary key {} for model `{}`",
                    record.key(),
                    model.name
                );
            }
            if let Value::I64(key) = record.key() {
                table.next_id = table.next_id.max(*key);
            }
        }

        table.records.push(record.clone());

        tracing::trace!(
            database = %self.label,
            model = %model.name,
            key = %record.key(),
            "inserted record"
        );

        Ok(Response::records(vec![record]))
    }

    fn query(&self, schema: &Schema, query: QueryRecords) -> Result<Response> {
        let Some(model) = schema.get_model(query.model) else {
            bail!("query on unknown model {:?}", query.model);
        };

        let tables = self.tables()?;

        let mut records = vec![];

        if let Some(table) = tables.get(&query.model) {
            for record in &table.records {
                if query.filter.eval(record)? {
                    records.push(record.clone());
                }
            }
        }

        for record in &mut records {
            for path in &query.include {
                include::join(schema, &tables, record, path.fields())?;
            }
        }

        tracing::trace!(
            database = %self.label,
            model = %model.name,
            rows = records.len(),
            "queried records"
        );

        Ok(Response::records(records))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::in_memory()
    }
}

#[async_trait]
impl Driver for Memory {
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        match op {
            Operation::Insert(insert) => self.insert(schema, insert),
            Operation::Query(query) => self.query(schema, query),
        }
    }
}
