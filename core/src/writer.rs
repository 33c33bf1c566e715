use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::document::{DocId, Document, StoredFields};
use crate::error::Result;
use crate::index::FieldTerms;
use crate::persist::DirectoryPersistence;
use crate::schema::{FieldKind, Schema};
use crate::tokenizer::tokenize;
use crate::IndexState;

/// The only mutation path into the index.
///
/// Writer calls are serialized by an internal lock; each document of a batch
/// is applied under a single write-lock scope, so readers see it either fully
/// before or fully after, never half-replaced.
pub struct IndexWriter {
    schema: Schema,
    state: Arc<RwLock<IndexState>>,
    // Doubles as the single-writer op lock; None when the index is in-memory.
    durable: Mutex<Option<DirectoryPersistence>>,
}

impl IndexWriter {
    pub(crate) fn new(
        schema: Schema,
        state: Arc<RwLock<IndexState>>,
        durable: Option<DirectoryPersistence>,
    ) -> Self {
        IndexWriter {
            schema,
            state,
            durable: Mutex::new(durable),
        }
    }

    /// Adds or replaces documents, keyed by id. Replacement removes the prior
    /// postings, re-tokenizes the indexed fields, then stores the new field
    /// values; batch order is call order and a later entry for the same id
    /// wins. Documents already applied stay applied if a later one fails.
    pub fn add_or_update(&self, documents: Vec<Document>) -> Result<()> {
        let durable = self.durable.lock();
        for document in documents {
            let id = document.id;
            let (terms, stored) = self.analyze(&document);
            let mut state = self.state.write();
            state.inverted.remove_postings(id);
            if let Err(e) = state.inverted.add_postings(id, &terms) {
                // Leave the document fully absent rather than torn.
                state.store.delete(id);
                return Err(e);
            }
            state.store.put(id, stored);
            drop(state);
            tracing::debug!(id, "indexed document");
        }
        self.flush(&durable)
    }

    /// Removes the document, reporting whether it existed. Idempotent.
    pub fn delete(&self, id: DocId) -> Result<bool> {
        let durable = self.durable.lock();
        let mut state = self.state.write();
        state.inverted.remove_postings(id);
        let existed = state.store.delete(id);
        drop(state);
        if existed {
            tracing::debug!(id, "deleted document");
            self.flush(&durable)?;
        }
        Ok(existed)
    }

    /// Drops all documents and postings. The empty snapshot is persisted
    /// before memory is swapped, so a storage failure leaves the prior state
    /// intact.
    pub fn clear_all(&self) -> Result<()> {
        let durable = self.durable.lock();
        if let Some(d) = durable.as_ref() {
            d.save(&IndexState::default())?;
        }
        let mut state = self.state.write();
        state.store.clear();
        state.inverted.clear();
        drop(state);
        tracing::info!("cleared index");
        Ok(())
    }

    /// Flushes the current state to storage; a no-op for in-memory indexes.
    pub fn commit(&self) -> Result<()> {
        let durable = self.durable.lock();
        self.flush(&durable)
    }

    /// Reclaims capacity left behind by deletions and rewrites the snapshot.
    /// Never changes stored fields or query results.
    pub fn compact(&self) -> Result<()> {
        let durable = self.durable.lock();
        {
            let mut state = self.state.write();
            state.store.shrink();
            state.inverted.shrink();
        }
        self.flush(&durable)
    }

    /// Splits a document into indexable term frequencies per field and the
    /// stored field values. Fields outside the schema are kept stored-only.
    fn analyze(&self, document: &Document) -> (FieldTerms, StoredFields) {
        let mut terms = FieldTerms::new();
        let mut stored = StoredFields::new();
        for (name, value) in &document.fields {
            let kind = self
                .schema
                .field(name)
                .map(|f| f.kind)
                .unwrap_or(FieldKind::Stored);
            if kind.is_stored() {
                stored.insert(name.clone(), value.clone());
            }
            if kind.is_indexed() {
                let mut freqs: BTreeMap<String, u32> = BTreeMap::new();
                for term in tokenize(value) {
                    *freqs.entry(term).or_insert(0) += 1;
                }
                if !freqs.is_empty() {
                    terms.insert(name.clone(), freqs);
                }
            }
        }
        (terms, stored)
    }

    fn flush(&self, durable: &Option<DirectoryPersistence>) -> Result<()> {
        if let Some(d) = durable.as_ref() {
            let state = self.state.read();
            d.save(&state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;

    fn writer() -> IndexWriter {
        IndexWriter::new(
            Schema::sample_data(),
            Arc::new(RwLock::new(IndexState::default())),
            None,
        )
    }

    fn doc(id: DocId, name: &str, description: &str) -> Document {
        Document::new(id)
            .field("name", name)
            .field("description", description)
    }

    #[test]
    fn store_and_postings_stay_consistent() {
        let w = writer();
        w.add_or_update(vec![
            doc(1, "Belgrad", "City in Serbia"),
            doc(2, "Moscow", "City in Russia"),
        ])
        .unwrap();
        w.delete(1).unwrap();
        w.add_or_update(vec![doc(3, "Chicago", "City in USA")]).unwrap();

        let state = w.state.read();
        let stored: Vec<DocId> = state.store.ids().collect();
        for id in &stored {
            assert!(state.inverted.has_postings(*id));
        }
        for id in state.inverted.doc_ids() {
            assert!(state.store.contains(id));
        }
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn replace_leaves_no_stale_postings() {
        let w = writer();
        w.add_or_update(vec![doc(1, "Belgrad", "City in Serbia")]).unwrap();
        w.add_or_update(vec![doc(1, "Moscow", "City in Russia")]).unwrap();

        let state = w.state.read();
        assert!(state.inverted.lookup("name", "belgrad").is_empty());
        assert_eq!(state.inverted.lookup("name", "moscow").len(), 1);
    }

    #[test]
    fn later_batch_entry_for_same_id_wins() {
        let w = writer();
        w.add_or_update(vec![
            doc(1, "Belgrad", "City in Serbia"),
            doc(1, "Moscow", "City in Russia"),
        ])
        .unwrap();

        let state = w.state.read();
        assert!(state.inverted.lookup("name", "belgrad").is_empty());
        assert_eq!(state.store.get(1).unwrap().get("name").unwrap(), "Moscow");
    }

    #[test]
    fn indexed_only_fields_are_not_stored() {
        let schema = Schema::new(vec![
            FieldDef::new("name", FieldKind::StoredIndexed),
            FieldDef::new("keywords", FieldKind::Indexed),
            FieldDef::new("payload", FieldKind::Stored),
        ]);
        let w = IndexWriter::new(
            schema,
            Arc::new(RwLock::new(IndexState::default())),
            None,
        );
        w.add_or_update(vec![Document::new(1)
            .field("name", "Mumbai")
            .field("keywords", "harbour gateway")
            .field("payload", "opaque blob")])
            .unwrap();

        let state = w.state.read();
        let stored = state.store.get(1).unwrap();
        assert!(!stored.contains_key("keywords"));
        assert_eq!(stored.get("payload").unwrap(), "opaque blob");
        assert_eq!(state.inverted.lookup("keywords", "harbour").len(), 1);
        assert!(state.inverted.lookup("payload", "opaque").is_empty());
    }
}
