use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type DocId = u32;

/// Field values stored verbatim for retrieval, keyed by field name.
pub type StoredFields = BTreeMap<String, String>;

/// One record submitted for indexing. The id is caller-assigned and stable
/// across updates; re-submitting an id replaces the previous version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub fields: BTreeMap<String, String>,
}

impl Document {
    pub fn new(id: DocId) -> Self {
        Document {
            id,
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// One search result: the matching document, its rank score, and the fields
/// that were stored for it. Score values are implementation-defined; only
/// their relative order is a contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: DocId,
    pub score: f32,
    pub fields: StoredFields,
}
