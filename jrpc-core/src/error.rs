use crate::ids::{Id, IdKind};
use crate::response::JsonKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Classification of the codes reserved by JSON-RPC 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Implementation-defined server errors, -32099..=-32000.
    ServerError(i64),
    /// Anything outside the reserved ranges.
    Application(i64),
}

impl ErrorCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            -32700 => ErrorCode::ParseError,
            -32600 => ErrorCode::InvalidRequest,
            -32601 => ErrorCode::MethodNotFound,
            -32602 => ErrorCode::InvalidParams,
            -32603 => ErrorCode::InternalError,
            -32099..=-32000 => ErrorCode::ServerError(code),
            _ => ErrorCode::Application(code),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerError(code) | ErrorCode::Application(code) => *code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::ParseError => write!(f, "parse_error"),
            ErrorCode::InvalidRequest => write!(f, "invalid_request"),
            ErrorCode::MethodNotFound => write!(f, "method_not_found"),
            ErrorCode::InvalidParams => write!(f, "invalid_params"),
            ErrorCode::InternalError => write!(f, "internal_error"),
            ErrorCode::ServerError(code) => write!(f, "server_error({})", code),
            ErrorCode::Application(code) => write!(f, "application_error({})", code),
        }
    }
}

/// The `error` member of a response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorPayload {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        ErrorPayload {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(code: i64, message: impl Into<String>, data: Value) -> Self {
        ErrorPayload {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from_code(self.code)
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorPayload {}

/// Local misconfiguration, always detected before anything is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Requests are not set")]
    EmptyBatch,
    #[error("Batch of {size} requests exceeds the configured maximum of {max}")]
    BatchTooLarge { size: usize, max: usize },
    #[error("Return type isn't specified for request with id='{id}'")]
    MissingReturnType { id: Id },
    #[error("Common and detailed configurations of return types shouldn't be mixed")]
    MixedReturnTypes,
    #[error("Id: '{id}' has wrong type: '{actual}'. Should be: '{expected}'")]
    IdTypeMismatch {
        id: Id,
        actual: IdKind,
        expected: IdKind,
    },
    #[error("Duplicate id='{id}' in batch")]
    DuplicateId { id: Id },
    #[error("Method name is empty for request with id='{id}'")]
    EmptyMethod { id: Id },
    #[error("Method isn't specified")]
    MissingMethod,
    #[error("Both positional and named params are set for method '{method}'")]
    ConflictingParams { method: String },
}

/// The response cannot be trusted as a coherent answer to what was sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    #[error("Unable to parse a JSON response: {snippet} ({reason})")]
    Parse { snippet: String, reason: String },
    #[error("Expected {expected} but was {actual}")]
    Shape { expected: JsonKind, actual: JsonKind },
    #[error("Not a JSON-RPC response: {snippet}")]
    NotJsonRpc { snippet: String },
    #[error("Bad protocol version: '{version}'")]
    BadVersion { version: String },
    #[error("Invalid id in response: {snippet}")]
    InvalidId { snippet: String },
    #[error("Neither result or error is set in response with id='{id}'")]
    NeitherResultNorError { id: Id },
    #[error("Both result and error are set in response with id='{id}'")]
    BothResultAndError { id: Id },
    #[error("Malformed error object in response with id='{id}': {reason}")]
    MalformedError { id: Id, reason: String },
    #[error("Unspecified id: '{id}' in response")]
    UnspecifiedId { id: Id },
    #[error("Duplicate response for id='{id}'")]
    DuplicateResponse { id: Id },
    #[error("No response for requests with ids: {}", join_ids(.ids))]
    MissingResponses { ids: Vec<Id> },
}

/// A result payload did not fit the type the caller asked for.
#[derive(Debug, Error)]
#[error("Unable to convert result of request with id='{id}' to '{type_name}': {source}")]
pub struct CoercionError {
    pub id: Id,
    pub type_name: &'static str,
    pub source: serde_json::Error,
}

/// Everything the engine itself can fail with. Transport failures live in the
/// transport crate and are added by the client.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unable to serialize params of method '{method}': {source}")]
    Serialization {
        method: String,
        source: serde_json::Error,
    },
    #[error("Unable to encode request: {0}")]
    Encode(serde_json::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

fn join_ids(ids: &[Id]) -> String {
    ids.iter()
        .map(|id| format!("'{}'", id))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_code_classification() {
        assert_eq!(ErrorCode::from_code(-32700), ErrorCode::ParseError);
        assert_eq!(ErrorCode::from_code(-32603), ErrorCode::InternalError);
        assert_eq!(ErrorCode::from_code(-32050), ErrorCode::ServerError(-32050));
        assert_eq!(ErrorCode::from_code(42), ErrorCode::Application(42));
        assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(ErrorCode::ServerError(-32000).code(), -32000);
    }

    #[test]
    fn test_error_payload_deserialization() {
        let payload: ErrorPayload =
            serde_json::from_value(json!({"code": -32603, "message": "Internal error"})).unwrap();
        assert_eq!(payload, ErrorPayload::new(-32603, "Internal error"));
        assert_eq!(payload.error_code(), ErrorCode::InternalError);

        let payload: ErrorPayload = serde_json::from_value(
            json!({"code": 1, "message": "Player not found", "data": {"name": "Steven"}}),
        )
        .unwrap();
        assert_eq!(payload.data, Some(json!({"name": "Steven"})));
    }

    #[test]
    fn test_error_payload_serialization_skips_missing_data() {
        let json = serde_json::to_string(&ErrorPayload::new(-32601, "Method not found")).unwrap();
        assert_eq!(json, r#"{"code":-32601,"message":"Method not found"}"#);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::EmptyBatch.to_string(), "Requests are not set");
        assert_eq!(
            ConfigError::MissingReturnType { id: Id::Number(1) }.to_string(),
            "Return type isn't specified for request with id='1'"
        );
        assert_eq!(
            ConfigError::IdTypeMismatch {
                id: Id::Number(1),
                actual: IdKind::Number,
                expected: IdKind::String,
            }
            .to_string(),
            "Id: '1' has wrong type: 'number'. Should be: 'string'"
        );
    }

    #[test]
    fn test_protocol_error_messages() {
        let err = ProtocolError::Shape {
            expected: JsonKind::Array,
            actual: JsonKind::Object,
        };
        assert_eq!(err.to_string(), "Expected array but was object");

        let err = ProtocolError::UnspecifiedId { id: Id::Number(10) };
        assert_eq!(err.to_string(), "Unspecified id: '10' in response");

        let err = ProtocolError::MissingResponses {
            ids: vec![Id::Number(2), Id::from("b")],
        };
        assert_eq!(err.to_string(), "No response for requests with ids: '2', 'b'");
    }
}
