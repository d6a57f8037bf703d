use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Correlation token of a single call.
///
/// Equality is type-sensitive: `Id::Number(10)` never matches `Id::String("10")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    String(String),
}

/// Declared type of an identifier, used to pin every id of a batch to one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Number,
    String,
}

impl Id {
    pub fn kind(&self) -> IdKind {
        match self {
            Id::Number(_) => IdKind::Number,
            Id::String(_) => IdKind::String,
        }
    }

    /// Reads an id from a response element. Only integers and strings qualify.
    pub fn from_value(value: &Value) -> Option<Id> {
        match value {
            Value::Number(n) => n.as_i64().map(Id::Number),
            Value::String(s) => Some(Id::String(s.clone())),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Id::Number(n) => Some(*n),
            Id::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Id::Number(_) => None,
            Id::String(s) => Some(s),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::String(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdKind::Number => "number",
            IdKind::String => "string",
        };
        write!(f, "{}", s)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Number(value)
    }
}

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Id::Number(i64::from(value))
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Id::Number(i64::from(value))
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::String(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::String(value)
    }
}

/// Source of ids for calls that were not given one explicitly.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    fn next_id(&self) -> Id;
}

/// Monotonic numeric ids starting from 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        SequentialIdGenerator {
            next: AtomicU64::new(first),
        }
    }

    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Id {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        // Wraps into the positive i64 range so the id always round-trips through JSON.
        Id::Number((id & (i64::MAX as u64)) as i64)
    }
}

/// Random positive numeric ids, kept below 2^53 so JavaScript peers read them exactly.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> Id {
        Id::Number((rand::random::<u64>() >> 11) as i64)
    }
}

/// Random UUID v4 string ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> Id {
        Id::String(uuid::Uuid::new_v4().to_string())
    }
}
