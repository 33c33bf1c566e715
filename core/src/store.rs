use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::{DocId, StoredFields};
use crate::error::{Result, SearchError};

/// Holds the retrievable field values for each live document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocumentStore {
    docs: HashMap<DocId, StoredFields>,
}

impl DocumentStore {
    /// Replaces any existing stored fields for `id`. Empty field sets are
    /// accepted.
    pub fn put(&mut self, id: DocId, fields: StoredFields) {
        self.docs.insert(id, fields);
    }

    pub fn get(&self, id: DocId) -> Result<&StoredFields> {
        self.docs.get(&id).ok_or(SearchError::NotFound(id))
    }

    /// Removes the entry, reporting whether anything was removed. Idempotent.
    pub fn delete(&mut self, id: DocId) -> bool {
        self.docs.remove(&id).is_some()
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.docs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.docs.keys().copied()
    }

    pub fn clear(&mut self) {
        self.docs.clear();
    }

    pub(crate) fn shrink(&mut self) {
        self.docs.shrink_to_fit();
    }
}
