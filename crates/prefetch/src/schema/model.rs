use super::Field;

/// A model as declared by the application.
///
/// This is the unresolved form of [`app::Model`](super::app::Model): it has no
/// `ModelId` yet, and belongs-to relations name their target model rather
/// than pointing at it. Names are resolved when the [`Db`](crate::Db) is
/// built, so models may reference models registered after them.
#[derive(Debug, Clone)]
pub struct Model {
    /// Name of the model
    pub name: String,

    /// Fields contained by the model
    pub fields: Vec<Field>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Model {
        Model {
            name: name.into(),
            fields: vec![],
        }
    }

    pub fn field(mut self, field: Field) -> Model {
        self.fields.push(field);
        self
    }

    /// Find a field by name
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}
