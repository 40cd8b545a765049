//! Editor sessions
//!
//! A [`LintSession`] wires documents to linting. Connecting a buffer
//! subscribes a fresh [`DeclarationIndex`] and [`ValidationPipeline`] to its
//! document; disconnecting removes both subscriptions again. Revalidation
//! requests the index raises during a notification wait in the buffer's
//! queue until [`LintSession::pump`] replays them.

use std::collections::HashMap;
use std::sync::Arc;

use stylint_core::{
    BufferId, DeclarationIndex, Diagnostic, DocumentRegistry, Result, RevalidationQueue,
    SharedDocument, StylintConfig, StylintError, SubscriptionId,
};

use crate::pipeline::ValidationPipeline;
use crate::registry::CheckerRegistry;

struct Connection {
    document: SharedDocument,
    index: Arc<DeclarationIndex>,
    pipeline: Arc<ValidationPipeline>,
    queue: RevalidationQueue,
    subscriptions: [SubscriptionId; 2],
}

pub struct LintSession {
    documents: Arc<DocumentRegistry>,
    checkers: CheckerRegistry,
    locale: String,
    connections: HashMap<BufferId, Connection>,
}

impl LintSession {
    /// Session with the built-in checkers and default configuration
    pub fn new(documents: Arc<DocumentRegistry>) -> Self {
        Self::with_config(documents, &StylintConfig::default())
    }

    pub fn with_config(documents: Arc<DocumentRegistry>, config: &StylintConfig) -> Self {
        let mut checkers = CheckerRegistry::with_builtins();
        checkers.apply_config(config);
        Self {
            documents,
            checkers,
            locale: config.locale().to_string(),
            connections: HashMap::new(),
        }
    }

    pub fn checkers(&self) -> &CheckerRegistry {
        &self.checkers
    }

    pub fn checkers_mut(&mut self) -> &mut CheckerRegistry {
        &mut self.checkers
    }

    /// Start linting the document bound to `buffer`
    pub fn connect(&mut self, buffer: BufferId) -> Result<()> {
        if self.connections.contains_key(&buffer) {
            return Err(StylintError::AlreadyConnected { buffer: buffer.0 });
        }
        let document = self
            .documents
            .get(buffer)
            .ok_or(StylintError::UnknownBuffer { buffer: buffer.0 })?;
        let pipeline = Arc::new(ValidationPipeline::new(&self.checkers, self.locale.clone())?);
        let (sender, queue) = RevalidationQueue::channel();
        let index = Arc::new(DeclarationIndex::new(Arc::new(sender)));

        let subscriptions = {
            let mut doc = document.lock();
            let root = doc.tree().root();
            index.on_tree_replaced(doc.tree(), root);
            pipeline.check_tree(doc.tree(), root);
            [doc.subscribe(index.clone()), doc.subscribe(pipeline.clone())]
        };

        tracing::info!(%buffer, declarations = index.len(), "buffer connected");
        self.connections.insert(
            buffer,
            Connection {
                document,
                index,
                pipeline,
                queue,
                subscriptions,
            },
        );
        Ok(())
    }

    /// Stop linting `buffer` and release both subscriptions
    pub fn disconnect(&mut self, buffer: BufferId) -> Result<()> {
        let connection = self
            .connections
            .remove(&buffer)
            .ok_or(StylintError::UnknownBuffer { buffer: buffer.0 })?;
        let mut doc = connection.document.lock();
        for subscription in connection.subscriptions {
            if !doc.unsubscribe(subscription) {
                tracing::warn!(%buffer, ?subscription, "subscription was already gone");
            }
        }
        tracing::info!(%buffer, "buffer disconnected");
        Ok(())
    }

    /// Replay queued revalidation requests; returns how many nodes were re-checked
    pub fn pump(&mut self, buffer: BufferId) -> Result<usize> {
        let connection = self
            .connections
            .get_mut(&buffer)
            .ok_or(StylintError::UnknownBuffer { buffer: buffer.0 })?;
        let requests = connection.queue.drain();
        if requests.is_empty() {
            return Ok(0);
        }
        let revalidated = connection.document.lock().force_revalidate(&requests);
        tracing::debug!(
            %buffer,
            requested = requests.len(),
            revalidated,
            "revalidation pumped"
        );
        Ok(revalidated)
    }

    /// Pump every connected buffer
    pub fn pump_all(&mut self) -> usize {
        let buffers: Vec<BufferId> = self.connections.keys().copied().collect();
        buffers
            .into_iter()
            .filter_map(|buffer| self.pump(buffer).ok())
            .sum()
    }

    /// Diagnostics of `buffer` in document order
    pub fn diagnostics(&self, buffer: BufferId) -> Result<Vec<Diagnostic>> {
        let connection = self.connection(buffer)?;
        let doc = connection.document.lock();
        Ok(connection.pipeline.diagnostics(doc.tree()))
    }

    pub fn index(&self, buffer: BufferId) -> Option<Arc<DeclarationIndex>> {
        self.connections
            .get(&buffer)
            .map(|connection| connection.index.clone())
    }

    pub fn is_connected(&self, buffer: BufferId) -> bool {
        self.connections.contains_key(&buffer)
    }

    /// Connected buffers, sorted
    pub fn connected_buffers(&self) -> Vec<BufferId> {
        let mut buffers: Vec<BufferId> = self.connections.keys().copied().collect();
        buffers.sort();
        buffers
    }

    fn connection(&self, buffer: BufferId) -> Result<&Connection> {
        self.connections
            .get(&buffer)
            .ok_or(StylintError::UnknownBuffer { buffer: buffer.0 })
    }
}

impl Drop for LintSession {
    fn drop(&mut self) {
        let buffers: Vec<BufferId> = self.connections.keys().copied().collect();
        for buffer in buffers {
            let _ = self.disconnect(buffer);
        }
    }
}

impl std::fmt::Debug for LintSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintSession")
            .field("checkers", &self.checkers)
            .field("locale", &self.locale)
            .field("connected", &self.connected_buffers())
            .finish()
    }
}
