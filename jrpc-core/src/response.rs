// Response parsing and validation.
// Turns raw response text into envelopes, rejecting anything that is not a
// well-formed JSON-RPC 2.0 answer of the expected shape.

use crate::error::{ErrorPayload, ProtocolError};
use crate::ids::Id;
use crate::request::JSONRPC_VERSION;
use serde_json::{Map, Value};
use std::fmt;
use tracing::trace;

/// Default number of characters of offending text quoted in protocol errors.
pub const DEFAULT_SNIPPET_LEN: usize = 256;

/// Kind of a JSON value, used to describe shape mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        write!(f, "{}", s)
    }
}

/// What was sent, and therefore what the root of the response must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Single,
    Batch,
}

impl Shape {
    pub fn expected_kind(&self) -> JsonKind {
        match self {
            Shape::Single => JsonKind::Object,
            Shape::Batch => JsonKind::Array,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Result(Value),
    Error(ErrorPayload),
}

/// One validated response element.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub id: Id,
    pub outcome: Outcome,
}

impl Envelope {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

pub fn parse(text: &str, shape: Shape) -> Result<Vec<Envelope>, ProtocolError> {
    parse_with_limit(text, shape, DEFAULT_SNIPPET_LEN)
}

/// Parses `text` and validates every element. Envelopes keep arrival order.
pub fn parse_with_limit(
    text: &str,
    shape: Shape,
    snippet_len: usize,
) -> Result<Vec<Envelope>, ProtocolError> {
    let root: Value = serde_json::from_str(text).map_err(|e| ProtocolError::Parse {
        snippet: snippet(text, snippet_len),
        reason: e.to_string(),
    })?;

    let actual = JsonKind::of(&root);
    if actual != shape.expected_kind() {
        return Err(ProtocolError::Shape {
            expected: shape.expected_kind(),
            actual,
        });
    }

    let elements = match root {
        Value::Array(elements) => elements,
        single => vec![single],
    };
    trace!(count = elements.len(), ?shape, "Validating response elements");

    elements
        .into_iter()
        .map(|element| parse_envelope(element, snippet_len))
        .collect()
}

pub fn parse_envelope(element: Value, snippet_len: usize) -> Result<Envelope, ProtocolError> {
    let mut obj = match element {
        Value::Object(obj) => obj,
        other => {
            return Err(ProtocolError::NotJsonRpc {
                snippet: snippet(&other.to_string(), snippet_len),
            })
        }
    };

    check_version(&obj, snippet_len)?;

    let id = obj
        .get("id")
        .and_then(Id::from_value)
        .ok_or_else(|| ProtocolError::InvalidId {
            snippet: obj
                .get("id")
                .map(Value::to_string)
                .unwrap_or_else(|| "<missing>".to_string()),
        })?;

    let result = obj.remove("result");
    // Some servers send `"error": null` next to a result.
    let error = obj.remove("error").filter(|e| !e.is_null());

    let outcome = match (result, error) {
        (Some(result), None) => Outcome::Result(result),
        (None, Some(error)) => {
            let payload = serde_json::from_value::<ErrorPayload>(error).map_err(|e| {
                ProtocolError::MalformedError {
                    id: id.clone(),
                    reason: e.to_string(),
                }
            })?;
            Outcome::Error(payload)
        }
        (Some(_), Some(_)) => return Err(ProtocolError::BothResultAndError { id }),
        (None, None) => return Err(ProtocolError::NeitherResultNorError { id }),
    };

    Ok(Envelope { id, outcome })
}

fn check_version(obj: &Map<String, Value>, snippet_len: usize) -> Result<(), ProtocolError> {
    match obj.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => Ok(()),
        Some(Value::String(version)) => Err(ProtocolError::BadVersion {
            version: version.clone(),
        }),
        Some(other) => Err(ProtocolError::BadVersion {
            version: format!("{} {}", JsonKind::of(other), other),
        }),
        None => Err(ProtocolError::NotJsonRpc {
            snippet: snippet(&Value::Object(obj.clone()).to_string(), snippet_len),
        }),
    }
}

fn snippet(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str("...");
        cut
    }
}
