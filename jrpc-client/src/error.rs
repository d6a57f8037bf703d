use indexmap::IndexMap;
use jrpc_core::{
    BatchOutcome, CoercionError, ConfigError, ErrorPayload, Id, ProtocolError,
};
use jrpc_transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Fatal failure of a single request or a whole batch.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unable to serialize params of method '{method}': {source}")]
    Serialization {
        method: String,
        source: serde_json::Error,
    },
    #[error("Unable to encode request: {0}")]
    Encode(serde_json::Error),
    #[error("I/O error during a request processing: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    /// The server answered a single request with a JSON-RPC error.
    #[error("JSON-RPC error for request with id='{id}': {error}")]
    Rpc { id: Id, error: ErrorPayload },
}

impl From<jrpc_core::Error> for ClientError {
    fn from(err: jrpc_core::Error) -> Self {
        match err {
            jrpc_core::Error::Config(e) => ClientError::Config(e),
            jrpc_core::Error::Serialization { method, source } => {
                ClientError::Serialization { method, source }
            }
            jrpc_core::Error::Encode(e) => ClientError::Encode(e),
            jrpc_core::Error::Protocol(e) => ClientError::Protocol(e),
            jrpc_core::Error::Coercion(e) => ClientError::Coercion(e),
        }
    }
}

/// Failure of a batch execution.
///
/// `Partial` is the aggregate failure: the response was coherent but at least
/// one call came back with a JSON-RPC error. The successes of the other calls
/// are still available through it.
#[derive(Debug)]
pub enum BatchError<T> {
    Client(ClientError),
    Partial(BatchOutcome<T>),
}

impl<T> BatchError<T> {
    pub fn successes(&self) -> Option<&IndexMap<Id, T>> {
        match self {
            BatchError::Partial(outcome) => Some(&outcome.successes),
            BatchError::Client(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&IndexMap<Id, ErrorPayload>> {
        match self {
            BatchError::Partial(outcome) => Some(&outcome.errors),
            BatchError::Client(_) => None,
        }
    }

    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            BatchError::Client(err) => Some(err),
            BatchError::Partial(_) => None,
        }
    }

    pub fn into_outcome(self) -> Option<BatchOutcome<T>> {
        match self {
            BatchError::Partial(outcome) => Some(outcome),
            BatchError::Client(_) => None,
        }
    }
}

impl<T> From<ClientError> for BatchError<T> {
    fn from(err: ClientError) -> Self {
        BatchError::Client(err)
    }
}

impl<T> fmt::Display for BatchError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Client(err) => write!(f, "{}", err),
            BatchError::Partial(outcome) => {
                let ids = outcome
                    .errors
                    .keys()
                    .map(|id| format!("'{}'", id))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Batch completed with {} failed of {} requests: {}",
                    outcome.errors.len(),
                    outcome.len(),
                    ids
                )
            }
        }
    }
}

impl<T: fmt::Debug> std::error::Error for BatchError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Client(err) => Some(err),
            BatchError::Partial(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_transport_error_is_wrapped_with_prefix() {
        let err = ClientError::from(TransportError::Io(io::Error::other("Network is down")));
        assert!(err
            .to_string()
            .starts_with("I/O error during a request processing"));
        assert!(err.to_string().contains("Network is down"));
    }

    #[test]
    fn test_core_errors_map_to_client_errors() {
        let err: ClientError = jrpc_core::Error::Config(ConfigError::EmptyBatch).into();
        assert!(matches!(err, ClientError::Config(ConfigError::EmptyBatch)));

        let err: ClientError =
            jrpc_core::Error::Protocol(ProtocolError::UnspecifiedId { id: Id::Number(10) }).into();
        assert_eq!(err.to_string(), "Unspecified id: '10' in response");
    }

    #[test]
    fn test_partial_failure_display_and_accessors() {
        let mut outcome = BatchOutcome::new();
        outcome.successes.insert(Id::Number(1), "Steven".to_string());
        outcome
            .errors
            .insert(Id::Number(2), ErrorPayload::new(-32603, "Internal error"));

        let err = BatchError::Partial(outcome);
        assert_eq!(
            err.to_string(),
            "Batch completed with 1 failed of 2 requests: '2'"
        );
        assert_eq!(err.successes().unwrap().len(), 1);
        assert_eq!(err.errors().unwrap()[&Id::Number(2)].code, -32603);
        assert!(err.client_error().is_none());
        assert!(err.into_outcome().is_some());
    }

    #[test]
    fn test_client_variant_exposes_source() {
        use std::error::Error as _;

        let err: BatchError<String> = ClientError::Config(ConfigError::EmptyBatch).into();
        assert!(err.successes().is_none());
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Requests are not set");
    }
}
