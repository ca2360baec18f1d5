use crate::{Chain, Db, Forwarder, Result};

use prefetch_core::{
    schema::app::Model,
    stmt::{Record, Value},
};

use indexmap::IndexMap;
use std::time::Instant;

/// Runs one prefetch over materialized rows: indexes the records the chain
/// leads to by key, issues one bulk query for all keys, then hands each
/// record its related items.
///
/// Errors from the definition are logged and returned unchanged. Records
/// decorated before the failure keep their decoration.
pub(crate) async fn fetch(
    db: &Db,
    rows: &mut [Record],
    name: &str,
    model: &Model,
    chain: &Chain,
    using: Option<&str>,
) -> Result<()> {
    let res = run(db, rows, name, model, chain, using).await;

    if let Err(err) = &res {
        tracing::error!(
            prefetch = name,
            model = %model.name,
            error = %err,
            "prefetch failed"
        );
    }

    res
}

async fn run(
    db: &Db,
    rows: &mut [Record],
    name: &str,
    model: &Model,
    chain: &Chain,
    using: Option<&str>,
) -> Result<()> {
    let definition = chain.definition();

    // Key -> indices of the rows whose target has that key
    let mut data_mapping: IndexMap<Value, Vec<usize>> = IndexMap::new();

    let start = Instant::now();
    for (index, row) in rows.iter_mut().enumerate() {
        let Some(target) = forward_mut(row, chain.forwarders()) else {
            continue;
        };

        let key = definition.mapper(target)?;

        if chain.collect() {
            data_mapping.entry(key).or_default().push(index);
        } else {
            // A later row with the same key shadows the earlier one.
            data_mapping.insert(key, vec![index]);
        }

        definition.decorator(target, None)?;
    }
    tracing::debug!(
        prefetch = name,
        model = %model.name,
        rows = rows.len(),
        keys = data_mapping.len(),
        elapsed = ?start.elapsed(),
        "built data mapping"
    );

    let start = Instant::now();
    let keys: Vec<Value> = data_mapping.keys().cloned().collect();
    let mut query = definition.filter(&keys)?;
    if let Some(database) = using {
        query.using = Some(database.to_string());
    }
    let related = db.query(query).await?;
    tracing::debug!(
        prefetch = name,
        model = %model.name,
        related = related.len(),
        elapsed = ?start.elapsed(),
        "filtered related records"
    );

    let start = Instant::now();
    let mut relation_mapping: IndexMap<Value, Vec<Record>> = IndexMap::new();
    for record in &related {
        for key in definition.reverse_mapper(record)? {
            if key.is_empty_key() {
                continue;
            }
            relation_mapping.entry(key).or_default().push(record.clone());
        }
    }

    for (key, items) in &relation_mapping {
        let Some(indices) = data_mapping.get(key) else {
            continue;
        };

        for &index in indices {
            if let Some(target) = forward_mut(&mut rows[index], chain.forwarders()) {
                definition.decorator(target, Some(items.as_slice()))?;
            }
        }
    }
    tracing::debug!(
        prefetch = name,
        model = %model.name,
        keys = relation_mapping.len(),
        elapsed = ?start.elapsed(),
        "attached related records"
    );

    Ok(())
}

/// Walks the joined records along `forwarders`. `None` if a hop is null or
/// was not loaded.
fn forward_mut<'a>(mut record: &'a mut Record, forwarders: &[Forwarder]) -> Option<&'a mut Record> {
    for hop in forwarders {
        record = record.related_mut(&hop.field)?;
    }
    Some(record)
}
