// Batch reconciliation.
// Matches envelopes to the calls that produced them and splits the batch
// into coerced successes and per-call errors.

use crate::batch::{BatchRequest, PendingCall};
use crate::coerce::ReturnType;
use crate::error::{Error, ErrorPayload, ProtocolError};
use crate::ids::Id;
use crate::response::{Envelope, Outcome};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

/// Result of a batch whose response was coherent. Both maps keep arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    pub successes: IndexMap<Id, T>,
    pub errors: IndexMap<Id, ErrorPayload>,
}

impl<T> BatchOutcome<T> {
    pub fn new() -> Self {
        BatchOutcome {
            successes: IndexMap::new(),
            errors: IndexMap::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.successes.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successes.is_empty() && self.errors.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.successes.contains_key(id) || self.errors.contains_key(id)
    }

    pub fn success(&self, id: &Id) -> Option<&T> {
        self.successes.get(id)
    }

    pub fn error(&self, id: &Id) -> Option<&ErrorPayload> {
        self.errors.get(id)
    }

    /// The successes when nothing failed, otherwise the whole outcome back.
    pub fn into_result(self) -> Result<IndexMap<Id, T>, Self> {
        if self.is_success() {
            Ok(self.successes)
        } else {
            Err(self)
        }
    }
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Matches every envelope to its call, then coerces results.
///
/// Matching runs to completion before any coercion, so an unsolicited,
/// duplicated or missing id is always reported ahead of a type mismatch.
pub fn reconcile<T>(
    batch: &BatchRequest<T>,
    envelopes: Vec<Envelope>,
) -> Result<BatchOutcome<T>, Error> {
    let index: HashMap<&Id, &PendingCall<T>> =
        batch.calls().iter().map(|call| (&call.id, call)).collect();

    let mut matched: IndexMap<Id, (&PendingCall<T>, Outcome)> =
        IndexMap::with_capacity(envelopes.len());
    for envelope in envelopes {
        let call = *index
            .get(&envelope.id)
            .ok_or_else(|| ProtocolError::UnspecifiedId {
                id: envelope.id.clone(),
            })?;
        if matched.contains_key(&envelope.id) {
            return Err(ProtocolError::DuplicateResponse { id: envelope.id }.into());
        }
        matched.insert(envelope.id, (call, envelope.outcome));
    }

    let missing: Vec<Id> = batch
        .calls()
        .iter()
        .filter(|call| !matched.contains_key(&call.id))
        .map(|call| call.id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ProtocolError::MissingResponses { ids: missing }.into());
    }

    let mut outcome = BatchOutcome::new();
    for (id, (call, result)) in matched {
        match result {
            Outcome::Error(error) => {
                outcome.errors.insert(id, error);
            }
            Outcome::Result(value) => {
                let value = batch.return_type_for(call)?.coerce(&id, value)?;
                outcome.successes.insert(id, value);
            }
        }
    }

    debug!(
        successes = outcome.successes.len(),
        errors = outcome.errors.len(),
        "Reconciled batch response"
    );
    Ok(outcome)
}

/// Reconciles the answer to a single call.
///
/// The outer result carries fatal failures; the inner one is the call's own
/// success or JSON-RPC error.
pub fn reconcile_single<T>(
    call_id: &Id,
    return_type: &ReturnType<T>,
    envelopes: Vec<Envelope>,
) -> Result<Result<T, ErrorPayload>, Error> {
    let mut envelopes = envelopes.into_iter();
    let envelope = envelopes.next().ok_or_else(|| ProtocolError::MissingResponses {
        ids: vec![call_id.clone()],
    })?;

    if &envelope.id != call_id {
        return Err(ProtocolError::UnspecifiedId { id: envelope.id }.into());
    }
    if let Some(extra) = envelopes.next() {
        return Err(ProtocolError::DuplicateResponse { id: extra.id }.into());
    }

    match envelope.outcome {
        Outcome::Result(value) => Ok(Ok(return_type.coerce(call_id, value)?)),
        Outcome::Error(error) => Ok(Err(error)),
    }
}
