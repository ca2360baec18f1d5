use crate::{Args, Db, Entry, Error, Prefetch, PrefetchRequest, Result};

use prefetch_core::{
    schema::app::{FieldId, ModelId},
    stmt::Path,
};

use std::{fmt, sync::Arc};

/// A requested prefetch name resolved against the schema: the forward
/// relations to walk from each row, then the definition to run on the
/// records they lead to.
#[derive(Clone)]
pub struct Chain {
    forwarders: Vec<Forwarder>,
    definition: Arc<dyn Prefetch>,
    collect: bool,
}

/// One belongs-to hop of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forwarder {
    /// Name of the relation field, holding the joined record
    pub field: String,

    /// The relation's foreign key
    pub foreign_key: FieldId,

    /// Model the relation points to
    pub target: ModelId,
}

impl Chain {
    pub fn forwarders(&self) -> &[Forwarder] {
        &self.forwarders
    }

    pub fn definition(&self) -> &Arc<dyn Prefetch> {
        &self.definition
    }

    /// Whether several rows may share one key. Always true once the chain
    /// walks a forward relation.
    pub fn collect(&self) -> bool {
        self.collect
    }

    /// The eager join that loads every hop of the chain, if it has any.
    pub fn include_path(&self) -> Option<Path> {
        if self.forwarders.is_empty() {
            return None;
        }

        Some(self.forwarders.iter().map(|hop| hop.field.as_str()).collect())
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("forwarders", &self.forwarders)
            .field("collect", &self.collect)
            .finish_non_exhaustive()
    }
}

/// Resolves a prefetch request made on `root` into a chain.
///
/// Parts are matched left to right. A part is looked up in the current
/// model's registry first, then among its belongs-to fields. Once a
/// definition matches it must be the last part.
pub(crate) fn resolve(db: &Db, root: ModelId, request: &PrefetchRequest) -> Result<Chain> {
    let schema = db.schema();
    let root = schema.model(root);
    let name = request.name();

    let mut model = root;
    let mut forwarders = vec![];
    let mut definition = None;

    for part in Path::parse(name).fields() {
        if definition.is_some() {
            return Err(Error::invalid_prefetch_trailing_part(
                part, name, &root.name,
            ));
        }

        let Some(registry) = db.registry(model.id) else {
            return Err(Error::invalid_prefetch_not_capable(
                name,
                &root.name,
                &model.name,
            ));
        };

        if let Some(entry) = registry.get(part) {
            definition = Some(instantiate(entry, request, part, &root.name)?);
            continue;
        }

        let Some((field, belongs_to)) = model
            .field_by_name(part)
            .and_then(|field| field.as_belongs_to().map(|rel| (field, rel)))
        else {
            return Err(Error::invalid_prefetch_unknown_part(
                part, name, &root.name,
            ));
        };

        forwarders.push(Forwarder {
            field: field.name.clone(),
            foreign_key: belongs_to.foreign_key,
            target: belongs_to.target,
        });
        model = belongs_to.target(schema);
    }

    let Some(definition) = definition else {
        return Err(Error::invalid_prefetch_no_definition(name, &root.name));
    };

    let collect = definition.collect() || !forwarders.is_empty();

    Ok(Chain {
        forwarders,
        definition,
        collect,
    })
}

fn instantiate(
    entry: &Entry,
    request: &PrefetchRequest,
    part: &str,
    model: &str,
) -> Result<Arc<dyn Prefetch>> {
    match (entry, request.args()) {
        (Entry::Instance(definition), None) => Ok(definition.clone()),
        (Entry::Instance(_), Some(_)) => Err(Error::invalid_prefetch_unexpected_args(
            part,
            request.name(),
            model,
        )),
        (Entry::Factory(factory), Some(args)) => factory(args),
        (Entry::Factory(factory), None) => factory(&Args::default()),
    }
}
