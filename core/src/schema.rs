use serde::{Deserialize, Serialize};

/// How a field participates in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Kept verbatim for retrieval, never tokenized.
    Stored,
    /// Tokenized and searchable, not retrievable.
    Indexed,
    /// Both stored and searchable.
    StoredIndexed,
}

impl FieldKind {
    pub fn is_stored(self) -> bool {
        matches!(self, FieldKind::Stored | FieldKind::StoredIndexed)
    }

    pub fn is_indexed(self) -> bool {
        matches!(self, FieldKind::Indexed | FieldKind::StoredIndexed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDef {
            name: name.into(),
            kind,
        }
    }
}

/// The fixed set of named fields a document may carry. Fields submitted
/// outside the schema are kept stored-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Schema { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Schema of the sample record set: a short name and a free-text
    /// description, both stored and searchable.
    pub fn sample_data() -> Self {
        Schema::new(vec![
            FieldDef::new("name", FieldKind::StoredIndexed),
            FieldDef::new("description", FieldKind::StoredIndexed),
        ])
    }
}
