//! Deferred re-validation requests
//!
//! The declaration index learns that a rule block must be checked again
//! while it is handling a tree notification, where the tree cannot be
//! touched. It hands the rule block to a [`RevalidationScheduler`] instead;
//! the host drains the matching [`RevalidationQueue`] once the notification
//! has returned and replays the requests through
//! [`Document::force_revalidate`](crate::document::Document::force_revalidate).
//!
//! Requests are fire-and-forget: no ordering among pending requests, no
//! cancellation, and a request for a node that disappeared in the meantime
//! simply resolves to nothing.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::tree::NodeId;

/// Sink for re-validation requests
pub trait RevalidationScheduler: Send + Sync {
    /// Queue `rule_block` for re-validation without blocking
    fn schedule(&self, rule_block: NodeId);
}

/// Sending half of a revalidation channel
#[derive(Debug, Clone)]
pub struct RevalidationSender {
    sender: UnboundedSender<NodeId>,
}

impl RevalidationScheduler for RevalidationSender {
    fn schedule(&self, rule_block: NodeId) {
        if self.sender.send(rule_block).is_err() {
            tracing::debug!(?rule_block, "revalidation queue closed, request dropped");
        }
    }
}

/// Receiving half of a revalidation channel, owned by the host
#[derive(Debug)]
pub struct RevalidationQueue {
    receiver: UnboundedReceiver<NodeId>,
}

impl RevalidationQueue {
    /// Create a connected scheduler/queue pair
    pub fn channel() -> (RevalidationSender, RevalidationQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (RevalidationSender { sender }, RevalidationQueue { receiver })
    }

    /// Take every request queued so far
    pub fn drain(&mut self) -> Vec<NodeId> {
        let mut pending = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(node) => pending.push(node),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        pending
    }

    /// Wait for the next request; `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<NodeId> {
        self.receiver.recv().await
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
