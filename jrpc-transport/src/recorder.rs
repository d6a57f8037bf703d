use crate::{Transport, TransportError};
use std::collections::VecDeque;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Io(io::ErrorKind, String),
}

impl Reply {
    fn into_result(self) -> Result<String, TransportError> {
        match self {
            Reply::Text(text) => Ok(text),
            Reply::Io(kind, message) => Err(io::Error::new(kind, message).into()),
        }
    }
}

/// Replays canned responses and records every request passed to it.
///
/// Queued replies are consumed in order; once the queue is empty the
/// fallback reply (if any) answers every further request.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    inner: Mutex<RecorderInner>,
}

#[derive(Debug, Default)]
struct RecorderInner {
    replies: VecDeque<Reply>,
    fallback: Option<Reply>,
    requests: Vec<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every request with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.lock().fallback = Some(Reply::Text(text.into()));
        transport
    }

    /// Fails every request with an I/O error.
    pub fn failing(kind: io::ErrorKind, message: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.lock().fallback = Some(Reply::Io(kind, message.into()));
        transport
    }

    /// Queues one reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push_reply(text);
        self
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.lock().replies.push_back(Reply::Text(text.into()));
    }

    /// Queues one I/O failure.
    pub fn push_failure(&self, kind: io::ErrorKind, message: impl Into<String>) {
        self.lock().replies.push_back(Reply::Io(kind, message.into()));
    }

    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<String> {
        self.lock().requests.last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, RecorderInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for RecordingTransport {
    fn pass(&self, request: &str) -> Result<String, TransportError> {
        let mut inner = self.lock();
        inner.requests.push(request.to_string());
        trace!(count = inner.requests.len(), "Recorded request");

        let reply = match inner.replies.pop_front() {
            Some(reply) => reply,
            None => inner.fallback.clone().ok_or(TransportError::Exhausted)?,
        };
        reply.into_result()
    }
}
