//! Collaborator insertion queue
//!
//! Dictation, AI rewrite, the phrase picker and image upload resolve
//! asynchronously. Each collaborator holds an [`InsertionSender`] and submits
//! the resolved result; the editor drains the queue on `DrainInsertions` and
//! applies requests in arrival order, at wherever the caret (or the end of
//! the content) is at drain time.

use std::sync::mpsc::{self, Receiver, Sender};

/// A resolved collaborator request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionRequest {
    /// Text to insert, wrapped in tracking markup when `track` is set
    Text { text: String, track: bool },
    /// Uploaded image URL (never tracked)
    Image { url: String },
    /// The collaborator's operation rejected; nothing is inserted
    Failed { source: String },
}

/// Cloneable submission handle given to collaborators
#[derive(Debug, Clone)]
pub struct InsertionSender {
    tx: Sender<InsertionRequest>,
}

impl InsertionSender {
    /// Submit a request. Returns false if the editor is gone.
    pub fn send(&self, request: InsertionRequest) -> bool {
        self.tx.send(request).is_ok()
    }

    pub fn text(&self, text: impl Into<String>, track: bool) -> bool {
        self.send(InsertionRequest::Text {
            text: text.into(),
            track,
        })
    }

    pub fn image(&self, url: impl Into<String>) -> bool {
        self.send(InsertionRequest::Image { url: url.into() })
    }

    pub fn failed(&self, source: impl Into<String>) -> bool {
        self.send(InsertionRequest::Failed {
            source: source.into(),
        })
    }
}

/// Single-consumer end owned by the editor
#[derive(Debug)]
pub struct InsertionQueue {
    tx: Sender<InsertionRequest>,
    rx: Receiver<InsertionRequest>,
}

impl Default for InsertionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InsertionQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// A new submission handle for a collaborator
    pub fn sender(&self) -> InsertionSender {
        InsertionSender {
            tx: self.tx.clone(),
        }
    }

    /// Take every pending request (non-blocking), oldest first
    pub fn drain(&self) -> Vec<InsertionRequest> {
        let requests: Vec<InsertionRequest> = self.rx.try_iter().collect();
        if !requests.is_empty() {
            tracing::debug!(target: "queue", count = requests.len(), "drained insertions");
        }
        requests
    }
}
