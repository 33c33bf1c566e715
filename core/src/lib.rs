//! A small field-scoped full-text index: documents with stored and indexed
//! fields go in through an [`IndexWriter`], term queries come back out of a
//! [`QueryEngine`]. State lives in memory, optionally snapshotted to a
//! directory guarded by a write lock.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

pub mod document;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod schema;
pub mod store;
pub mod tokenizer;
pub mod writer;

pub use document::{DocId, Document, SearchHit, StoredFields};
pub use error::{Result, SearchError};
pub use query::QueryEngine;
pub use schema::{FieldDef, FieldKind, Schema};
pub use writer::IndexWriter;

use index::InvertedIndex;
use persist::DirectoryPersistence;
use store::DocumentStore;

/// Where the index keeps its state.
#[derive(Debug, Clone)]
pub enum IndexConfig {
    Memory,
    Directory(PathBuf),
}

/// The document store and inverted index, mutated together under one lock so
/// they can never disagree about which documents are live.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct IndexState {
    pub(crate) store: DocumentStore,
    pub(crate) inverted: InvertedIndex,
}

/// An open index: one writer, any number of cloned query engines.
pub struct Index {
    writer: IndexWriter,
    query: QueryEngine,
}

impl Index {
    /// Opens an index with the given schema. Directory-backed indexes are
    /// created when missing, restored from their snapshot when present, and
    /// locked for the lifetime of this instance.
    pub fn open(schema: Schema, config: IndexConfig) -> Result<Index> {
        let (durable, restored) = match config {
            IndexConfig::Memory => (None, None),
            IndexConfig::Directory(path) => {
                let (durable, restored) = DirectoryPersistence::open(&path)?;
                (Some(durable), restored)
            }
        };
        let state = Arc::new(RwLock::new(restored.unwrap_or_default()));
        Ok(Index {
            writer: IndexWriter::new(schema, Arc::clone(&state), durable),
            query: QueryEngine::new(state),
        })
    }

    pub fn writer(&self) -> &IndexWriter {
        &self.writer
    }

    pub fn query(&self) -> &QueryEngine {
        &self.query
    }
}
