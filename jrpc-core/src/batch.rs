use crate::coerce::ReturnType;
use crate::error::{ConfigError, Error};
use crate::ids::{Id, IdKind};
use crate::params::Params;
use crate::reconcile::{self, BatchOutcome};
use crate::request::{self, Request};
use crate::response::Envelope;
use std::collections::HashSet;

/// A call waiting to be sent.
#[derive(Debug, Clone)]
pub struct PendingCall<T> {
    pub id: Id,
    pub method: String,
    pub params: Params,
    pub return_type: Option<ReturnType<T>>,
}

impl<T> PendingCall<T> {
    pub fn new(id: impl Into<Id>, method: impl Into<String>, params: Params) -> Self {
        PendingCall {
            id: id.into(),
            method: method.into(),
            params,
            return_type: None,
        }
    }

    pub fn with_return_type(mut self, return_type: ReturnType<T>) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn request(&self) -> Request<'_> {
        Request::new(&self.id, &self.method, &self.params)
    }
}

/// Checks `id` against the batch-wide id kind, if one is configured.
pub fn check_id_kind(id: &Id, expected: Option<IdKind>) -> Result<(), ConfigError> {
    match expected {
        Some(expected) if id.kind() != expected => Err(ConfigError::IdTypeMismatch {
            id: id.clone(),
            actual: id.kind(),
            expected,
        }),
        _ => Ok(()),
    }
}

/// A validated, immutable batch. Construction performs every pre-flight check,
/// so a `BatchRequest` can always be encoded and reconciled.
#[derive(Debug, Clone)]
pub struct BatchRequest<T> {
    calls: Vec<PendingCall<T>>,
    common_return_type: Option<ReturnType<T>>,
    id_kind: Option<IdKind>,
}

impl<T> BatchRequest<T> {
    pub fn new(
        calls: Vec<PendingCall<T>>,
        common_return_type: Option<ReturnType<T>>,
        id_kind: Option<IdKind>,
    ) -> Result<Self, ConfigError> {
        if calls.is_empty() {
            return Err(ConfigError::EmptyBatch);
        }

        let has_detailed = calls.iter().any(|call| call.return_type.is_some());
        if common_return_type.is_some() && has_detailed {
            return Err(ConfigError::MixedReturnTypes);
        }

        let mut seen = HashSet::with_capacity(calls.len());
        for call in &calls {
            if common_return_type.is_none() && call.return_type.is_none() {
                return Err(ConfigError::MissingReturnType {
                    id: call.id.clone(),
                });
            }
            check_id_kind(&call.id, id_kind)?;
            if call.method.is_empty() {
                return Err(ConfigError::EmptyMethod {
                    id: call.id.clone(),
                });
            }
            if !seen.insert(&call.id) {
                return Err(ConfigError::DuplicateId {
                    id: call.id.clone(),
                });
            }
        }

        Ok(BatchRequest {
            calls,
            common_return_type,
            id_kind,
        })
    }

    pub fn calls(&self) -> &[PendingCall<T>] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn id_kind(&self) -> Option<IdKind> {
        self.id_kind
    }

    /// The per-call type wins over the batch-wide one.
    pub fn return_type_for<'a>(
        &'a self,
        call: &'a PendingCall<T>,
    ) -> Result<&'a ReturnType<T>, ConfigError> {
        call.return_type
            .as_ref()
            .or(self.common_return_type.as_ref())
            .ok_or_else(|| ConfigError::MissingReturnType {
                id: call.id.clone(),
            })
    }

    pub fn encode(&self) -> Result<String, Error> {
        request::encode_batch(self.calls.iter().map(PendingCall::request))
    }

    pub fn reconcile(&self, envelopes: Vec<Envelope>) -> Result<BatchOutcome<T>, Error> {
        reconcile::reconcile(self, envelopes)
    }
}
