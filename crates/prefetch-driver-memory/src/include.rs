use super::Table;

use prefetch_core::{
    bail,
    schema::app::{Field, ModelId, Schema},
    stmt::{Record, Value},
    Result,
};
use std::collections::HashMap;

/// Joins the belongs-to chain `path` into `record`.
///
/// A null foreign key, or one that points at a missing record, leaves the
/// relation field null and stops the walk. Joins already present on the
/// record are reused so several paths sharing a prefix compose.
pub(crate) fn join(
    schema: &Schema,
    tables: &HashMap<ModelId, Table>,
    record: &mut Record,
    path: &[String],
) -> Result<()> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(());
    };

    let Some(model) = schema.get_model(record.model()) else {
        bail!("cannot include `{head}`; unknown model {:?}", record.model());
    };
    let Some(belongs_to) = model.field_by_name(head).and_then(Field::as_belongs_to) else {
        bail!(
            "cannot include `{head}`; it is not a belongs-to relation of `{}`",
            model.name
        );
    };

    if let Some(joined) = record.related_mut(head) {
        return join(schema, tables, joined, rest);
    }

    let foreign_key = &model.field(belongs_to.foreign_key).name;
    let key = record.get(foreign_key).cloned().unwrap_or_default();

    let target = match key {
        Value::Null => None,
        key => tables.get(&belongs_to.target).and_then(|table| {
            table
                .records
                .iter()
                .find(|candidate| candidate.key() == &key)
                .cloned()
        }),
    };

    match target {
        Some(mut target) => {
            join(schema, tables, &mut target, rest)?;
            record.set(head, target)
        }
        None => record.set(head, Value::Null),
    }
}
