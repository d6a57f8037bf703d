use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments of a call: either positional or named, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Params {
    /// Converts caller arguments into params.
    ///
    /// Sequences (including tuples) become positional params, maps and structs
    /// become named params, unit/`None` means no arguments and any other scalar
    /// is sent as a single positional argument.
    pub fn from_args<A: Serialize>(args: A) -> Result<Self, serde_json::Error> {
        let params = match serde_json::to_value(args)? {
            Value::Array(values) => Params::Positional(values),
            Value::Object(map) => Params::Named(map),
            Value::Null => Params::empty(),
            scalar => Params::Positional(vec![scalar]),
        };
        Ok(params)
    }

    pub fn empty() -> Self {
        Params::Positional(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Params::Positional(values) => values.is_empty(),
            Params::Named(map) => map.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(map) => map.len(),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Params::Named(_))
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::empty()
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Named(map)
    }
}
