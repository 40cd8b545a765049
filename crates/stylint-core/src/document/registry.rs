//! Binding between editor buffers and their documents

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::Document;
use crate::error::StylintError;
use crate::result::Result;

/// Identifier of a text buffer in the host editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferId(pub u64);

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document shared between the edit thread and the lint host.
///
/// The mutex serialises every notification for the document.
pub type SharedDocument = Arc<Mutex<Document>>;

/// Maps buffers to the document parsed from them
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: DashMap<BufferId, SharedDocument>,
    next_id: AtomicU64,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under a freshly allocated buffer id
    pub fn open(&self, document: Document) -> BufferId {
        let mut buffer = BufferId(self.next_id.fetch_add(1, Ordering::Relaxed));
        while self.documents.contains_key(&buffer) {
            buffer = BufferId(self.next_id.fetch_add(1, Ordering::Relaxed));
        }
        self.documents
            .insert(buffer, Arc::new(Mutex::new(document)));
        tracing::debug!(%buffer, "document opened");
        buffer
    }

    /// Register a document under a host-chosen buffer id
    pub fn open_with_id(&self, buffer: BufferId, document: Document) -> Result<SharedDocument> {
        let shared = Arc::new(Mutex::new(document));
        match self.documents.entry(buffer) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(StylintError::BufferInUse { buffer: buffer.0 })
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(shared.clone());
                tracing::debug!(%buffer, "document opened");
                Ok(shared)
            }
        }
    }

    /// Document parsed from `buffer`
    pub fn get(&self, buffer: BufferId) -> Option<SharedDocument> {
        self.documents.get(&buffer).map(|entry| entry.value().clone())
    }

    pub fn close(&self, buffer: BufferId) -> Option<SharedDocument> {
        let removed = self.documents.remove(&buffer).map(|(_, doc)| doc);
        tracing::debug!(%buffer, found = removed.is_some(), "document closed");
        removed
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Open buffers, sorted
    pub fn buffers(&self) -> Vec<BufferId> {
        let mut buffers: Vec<BufferId> = self.documents.iter().map(|entry| *entry.key()).collect();
        buffers.sort();
        buffers
    }
}
