use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::document::{DocId, SearchHit, StoredFields};
use crate::error::Result;
use crate::tokenizer::tokenize;
use crate::IndexState;

/// Read surface over the index. Cheap to clone; every call takes one read
/// lock, so results always reflect a single consistent index state.
#[derive(Clone)]
pub struct QueryEngine {
    state: Arc<RwLock<IndexState>>,
}

impl QueryEngine {
    pub(crate) fn new(state: Arc<RwLock<IndexState>>) -> Self {
        QueryEngine { state }
    }

    /// Field-scoped exact-term search. Each query term is normalized with the
    /// same tokenizer used at indexing time; candidates matching any
    /// (field, term) pair are ranked by summed term frequency descending,
    /// ties broken by ascending id, truncated to `limit`. An empty query
    /// yields an empty result.
    pub fn search(&self, query: &[(String, String)], limit: usize) -> Vec<SearchHit> {
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let state = self.state.read();
        let mut freqs: HashMap<DocId, u32> = HashMap::new();
        for (field, raw) in query {
            for term in tokenize(raw) {
                for posting in state.inverted.lookup(field, &term) {
                    *freqs.entry(posting.id).or_insert(0) += posting.freq;
                }
            }
        }
        let mut ranked: Vec<(DocId, u32)> = freqs.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        tracing::debug!(terms = query.len(), hits = ranked.len(), "search");
        ranked
            .into_iter()
            .filter_map(|(id, freq)| {
                state.store.get(id).ok().map(|fields| SearchHit {
                    id,
                    score: freq as f32,
                    fields: fields.clone(),
                })
            })
            .collect()
    }

    /// Stored fields of a live document.
    pub fn get(&self, id: DocId) -> Result<StoredFields> {
        self.state.read().store.get(id).cloned()
    }

    pub fn num_docs(&self) -> usize {
        self.state.read().store.len()
    }
}
