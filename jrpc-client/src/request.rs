use crate::client::Client;
use crate::error::ClientError;
use jrpc_core::{ConfigError, Id, Params, PendingCall, ReturnType};
use jrpc_transport::Transport;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Builder for a single call.
///
/// Positional arguments come from [`params`](Self::params), named ones from
/// repeated [`param`](Self::param) calls (or a struct passed to `params`).
/// Mixing the two styles is rejected at execution time.
#[derive(Debug)]
pub struct RequestBuilder<'a, T> {
    client: &'a Client<T>,
    id: Option<Id>,
    method: Option<String>,
    positional: Option<Vec<Value>>,
    named: Map<String, Value>,
    deferred: Option<ClientError>,
}

impl<'a, T: Transport> RequestBuilder<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self {
            client,
            id: None,
            method: None,
            positional: None,
            named: Map::new(),
            deferred: None,
        }
    }

    /// Use this id instead of one from the client's generator.
    pub fn id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Repeated calls accumulate: positional values are appended, named ones
    /// merged. Unit and `None` add nothing.
    pub fn params<A: Serialize>(mut self, args: A) -> Self {
        match Params::from_args(args) {
            Ok(Params::Positional(values)) if values.is_empty() => {}
            Ok(Params::Positional(values)) => {
                self.positional.get_or_insert_with(Vec::new).extend(values)
            }
            Ok(Params::Named(map)) => self.named.extend(map),
            Err(source) => self.defer_serialization(source),
        }
        self
    }

    pub fn param<V: Serialize>(mut self, name: impl Into<String>, value: V) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.named.insert(name.into(), value);
            }
            Err(source) => self.defer_serialization(source),
        }
        self
    }

    fn defer_serialization(&mut self, source: serde_json::Error) {
        if self.deferred.is_none() {
            self.deferred = Some(ClientError::Serialization {
                method: self.method.clone().unwrap_or_default(),
                source,
            });
        }
    }

    /// Execute and return the raw result.
    pub fn execute(self) -> Result<Value, ClientError> {
        self.execute_with(ReturnType::of())
    }

    /// Execute and deserialize the result into `R`.
    pub fn execute_as<R: DeserializeOwned + 'static>(self) -> Result<R, ClientError> {
        self.execute_with(ReturnType::of())
    }

    /// Execute with a custom result conversion.
    pub fn execute_with<R>(self, return_type: ReturnType<R>) -> Result<R, ClientError> {
        let client = self.client;
        let call = self.into_call(return_type)?;
        client.execute_call(&call)
    }

    fn into_call<R>(self, return_type: ReturnType<R>) -> Result<PendingCall<R>, ClientError> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        let method = self.method.ok_or(ConfigError::MissingMethod)?;
        let id = match self.id {
            Some(id) => id,
            None => self.client.next_id(),
        };
        if method.is_empty() {
            return Err(ConfigError::EmptyMethod { id }.into());
        }

        let params = match (self.positional, self.named.is_empty()) {
            (Some(_), false) => return Err(ConfigError::ConflictingParams { method }.into()),
            (Some(values), true) => Params::Positional(values),
            (None, false) => Params::Named(self.named),
            (None, true) => Params::empty(),
        };

        Ok(PendingCall::new(id, method, params).with_return_type(return_type))
    }
}
