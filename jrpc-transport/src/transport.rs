use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("No response left to replay")]
    Exhausted,
    #[error("{0}")]
    Other(String),
}

/// Moves serialized request text to a server and brings the raw answer back.
///
/// Implementations own every transport concern: connections, timeouts and
/// retries. The client only sees the text or the failure.
pub trait Transport: Send + Sync {
    fn pass(&self, request: &str) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn pass(&self, request: &str) -> Result<String, TransportError> {
        (**self).pass(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn pass(&self, request: &str) -> Result<String, TransportError> {
        (**self).pass(request)
    }
}

/// Adapts a closure into a [`Transport`].
pub struct FnTransport<F> {
    f: F,
}

pub fn from_fn<F>(f: F) -> FnTransport<F>
where
    F: Fn(&str) -> Result<String, TransportError> + Send + Sync,
{
    FnTransport { f }
}

impl<F> Transport for FnTransport<F>
where
    F: Fn(&str) -> Result<String, TransportError> + Send + Sync,
{
    fn pass(&self, request: &str) -> Result<String, TransportError> {
        (self.f)(request)
    }
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTransport")
    }
}
