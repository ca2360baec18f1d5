use super::{Db, Shared, DEFAULT_DATABASE};
use crate::{
    driver::{self, Driver},
    schema::{self, app},
    Error, Registry, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    /// Model declarations (unresolved)
    models: Vec<schema::Model>,

    /// Prefetch registries, keyed by model name
    registries: Vec<(String, Registry)>,

    /// Named databases other than the default one
    databases: IndexMap<String, Box<dyn Driver>>,
}

impl Builder {
    pub fn register(&mut self, model: schema::Model) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Makes `model` prefetch-capable with the given definitions.
    pub fn prefetch(&mut self, model: impl Into<String>, registry: Registry) -> &mut Self {
        self.registries.push((model.into(), registry));
        self
    }

    /// Adds a named database that queries can be routed to with `using`.
    pub fn database(&mut self, name: impl Into<String>, driver: impl Driver) -> &mut Self {
        self.databases.insert(name.into(), Box::new(driver));
        self
    }

    /// Adds a named database opened from a connection URL.
    pub fn database_url(&mut self, name: impl Into<String>, url: &str) -> Result<&mut Self> {
        self.databases.insert(name.into(), driver::connect(url)?);
        Ok(self)
    }

    pub fn build_app_schema(&self) -> Result<app::Schema> {
        let mut ids = IndexMap::new();
        for (index, model) in self.models.iter().enumerate() {
            if ids.insert(model.name.as_str(), app::ModelId(index)).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate model name `{}`",
                    model.name
                )));
            }
        }

        let models = self
            .models
            .iter()
            .map(|model| convert_model(model, ids[model.name.as_str()], &ids))
            .collect::<Result<Vec<_>>>()?;

        app::Schema::from_models(models)
    }

    /// Resolves the schema and registries and returns a handle whose default
    /// database is `driver`.
    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        self.build_boxed(Box::new(driver))
    }

    /// Like [`build`](Self::build), opening the default database from a
    /// connection URL.
    pub fn connect(&mut self, url: &str) -> Result<Db> {
        let driver = driver::connect(url)?;
        self.build_boxed(driver)
    }

    fn build_boxed(&mut self, driver: Box<dyn Driver>) -> Result<Db> {
        let schema = self.build_app_schema()?;

        let mut registries = IndexMap::new();
        for (name, registry) in std::mem::take(&mut self.registries) {
            let Some(model) = schema.model_by_name(&name) else {
                return Err(Error::invalid_schema(format!(
                    "prefetch registry attached to unknown model `{name}`"
                )));
            };

            if registries.insert(model.id, registry).is_some() {
                return Err(Error::invalid_schema(format!(
                    "model `{name}` has more than one prefetch registry"
                )));
            }
        }

        let mut databases = IndexMap::new();
        databases.insert(DEFAULT_DATABASE.to_string(), driver);
        for (name, driver) in std::mem::take(&mut self.databases) {
            if databases.insert(name.clone(), driver).is_some() {
                return Err(Error::invalid_schema(format!(
                    "database `{name}` is configured twice"
                )));
            }
        }

        Ok(Db {
            shared: Arc::new(Shared {
                schema: Arc::new(schema),
                registries,
                databases,
            }),
        })
    }
}

fn convert_model(
    model: &schema::Model,
    id: app::ModelId,
    ids: &IndexMap<&str, app::ModelId>,
) -> Result<app::Model> {
    let mut primary_key = None;
    let mut fields = Vec::with_capacity(model.fields.len());

    for (index, field) in model.fields.iter().enumerate() {
        if field.primary_key {
            if primary_key.is_some() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` declares more than one primary key",
                    model.name
                )));
            }
            primary_key = Some(id.field(index));
        }

        let (ty, nullable) = match &field.ty {
            schema::FieldTy::Primitive(ty) => (app::FieldTy::Primitive(*ty), field.nullable),
            schema::FieldTy::BelongsTo(belongs_to) => {
                let Some(&target) = ids.get(belongs_to.target.as_str()) else {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}::{}` targets unknown model `{}`",
                        model.name, field.name, belongs_to.target
                    )));
                };

                let Some(fk_index) = model
                    .fields
                    .iter()
                    .position(|candidate| candidate.name == belongs_to.foreign_key)
                else {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}::{}` uses unknown foreign key `{}`",
                        model.name, field.name, belongs_to.foreign_key
                    )));
                };

                let ty = app::BelongsTo {
                    target,
                    foreign_key: id.field(fk_index),
                };
                (ty.into(), model.fields[fk_index].nullable)
            }
        };

        fields.push(app::Field {
            id: id.field(index),
            name: field.name.clone(),
            ty,
            nullable,
            primary_key: field.primary_key,
        });
    }

    let Some(primary_key) = primary_key else {
        return Err(Error::invalid_schema(format!(
            "model `{}` has no primary key",
            model.name
        )));
    };

    Ok(app::Model {
        id,
        name: model.name.clone(),
        fields,
        primary_key,
    })
}
