use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::document::DocId;
use crate::error::{Result, SearchError};

/// Per-document term frequencies grouped by field name.
pub type FieldTerms = BTreeMap<String, BTreeMap<String, u32>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub id: DocId,
    pub freq: u32,
}

/// Term to postings mapping, one map per field so lookups stay field-scoped.
///
/// A reverse map from document id to its (field, term) pairs makes removal
/// proportional to the document rather than the whole index. Invariants: no
/// posting list carries the same id twice, and term entries are dropped as
/// soon as their posting list empties.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, HashMap<String, Vec<Posting>>>,
    doc_terms: HashMap<DocId, Vec<(String, String)>>,
}

impl InvertedIndex {
    /// Inserts postings for a document that has none yet. The caller removes
    /// prior postings first; finding live ones here is a bug in the mutation
    /// path, not a recoverable condition.
    pub fn add_postings(&mut self, id: DocId, terms: &FieldTerms) -> Result<()> {
        if self.doc_terms.contains_key(&id) {
            return Err(SearchError::InvariantViolation(format!(
                "add_postings called for document {id} which still has postings"
            )));
        }
        let mut pairs = Vec::new();
        for (field, freqs) in terms {
            let by_term = self.postings.entry(field.clone()).or_default();
            for (term, freq) in freqs {
                by_term
                    .entry(term.clone())
                    .or_default()
                    .push(Posting { id, freq: *freq });
                pairs.push((field.clone(), term.clone()));
            }
        }
        self.doc_terms.insert(id, pairs);
        Ok(())
    }

    /// Removes every posting for `id` and any term whose posting list becomes
    /// empty. Removing an id with no postings is a no-op.
    pub fn remove_postings(&mut self, id: DocId) {
        let Some(pairs) = self.doc_terms.remove(&id) else {
            return;
        };
        for (field, term) in pairs {
            let Some(by_term) = self.postings.get_mut(&field) else {
                continue;
            };
            if let Some(list) = by_term.get_mut(&term) {
                list.retain(|p| p.id != id);
                if list.is_empty() {
                    by_term.remove(&term);
                }
            }
            if by_term.is_empty() {
                self.postings.remove(&field);
            }
        }
    }

    /// Current posting list for a field-scoped term, empty when absent.
    /// Order is stable between mutations.
    pub fn lookup(&self, field: &str, term: &str) -> &[Posting] {
        self.postings
            .get(field)
            .and_then(|by_term| by_term.get(term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_postings(&self, id: DocId) -> bool {
        self.doc_terms.contains_key(&id)
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.doc_terms.keys().copied()
    }

    pub fn term_count(&self) -> usize {
        self.postings.values().map(HashMap::len).sum()
    }

    pub fn clear(&mut self) {
        self.postings.clear();
        self.doc_terms.clear();
    }

    pub(crate) fn shrink(&mut self) {
        for by_term in self.postings.values_mut() {
            for list in by_term.values_mut() {
                list.shrink_to_fit();
            }
            by_term.shrink_to_fit();
        }
        self.postings.shrink_to_fit();
        self.doc_terms.shrink_to_fit();
    }
}
