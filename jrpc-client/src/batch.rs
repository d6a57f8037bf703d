use crate::client::Client;
use crate::error::{BatchError, ClientError};
use indexmap::IndexMap;
use jrpc_core::{
    check_id_kind, BatchOutcome, BatchRequest, Id, IdKind, Params, PendingCall, ReturnType,
};
use jrpc_transport::Transport;
use serde::Serialize;
use tracing::{debug, warn};

/// Builder for a batch of calls whose results share the type `R`.
///
/// Staging never fails on its own: the first problem found while adding calls
/// is kept and reported by [`build`](Self::build) or `execute`, before
/// anything is sent.
///
/// ```no_run
/// use jrpc_client::{Client, HttpTransport, IdKind, ReturnType};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Player {
///     name: String,
/// }
///
/// let client = Client::new(HttpTransport::with_url("http://localhost:8080/rpc")?);
/// let players = client
///     .batch::<Player>()
///     .add(1, "findPlayer", ("Steven", "Stamkos"))
///     .add(2, "findPlayer", ("Vladimir", "Sobotka"))
///     .keys_type(IdKind::Number)
///     .return_type(ReturnType::of())
///     .execute()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct BatchRequestBuilder<'a, T, R> {
    client: &'a Client<T>,
    calls: Vec<PendingCall<R>>,
    return_type: Option<ReturnType<R>>,
    id_kind: Option<IdKind>,
    deferred: Option<ClientError>,
}

impl<'a, T: Transport, R> BatchRequestBuilder<'a, T, R> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self {
            client,
            calls: Vec::new(),
            return_type: None,
            id_kind: None,
            deferred: None,
        }
    }

    /// Add a call whose result type comes from [`return_type`](Self::return_type).
    ///
    /// Tuples and sequences are sent as positional params, structs and maps
    /// as named params.
    pub fn add<A: Serialize>(self, id: impl Into<Id>, method: &str, args: A) -> Self {
        self.stage(id.into(), method, args, None)
    }

    /// Add a call with its own result type.
    pub fn add_with_type<A: Serialize>(
        self,
        id: impl Into<Id>,
        method: &str,
        args: A,
        return_type: ReturnType<R>,
    ) -> Self {
        self.stage(id.into(), method, args, Some(return_type))
    }

    /// Add a call assembled by hand.
    pub fn add_call(mut self, call: PendingCall<R>) -> Self {
        if self.deferred.is_none() {
            if let Err(err) = check_id_kind(&call.id, self.id_kind) {
                self.deferred = Some(err.into());
                return self;
            }
            self.calls.push(call);
        }
        self
    }

    /// Result type shared by every call of the batch.
    pub fn return_type(mut self, return_type: ReturnType<R>) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Pin every id of the batch to one kind.
    pub fn keys_type(mut self, kind: IdKind) -> Self {
        self.id_kind = Some(kind);
        self
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    fn stage<A: Serialize>(
        mut self,
        id: Id,
        method: &str,
        args: A,
        return_type: Option<ReturnType<R>>,
    ) -> Self {
        if self.deferred.is_some() {
            return self;
        }
        match Params::from_args(args) {
            Ok(params) => {
                let mut call = PendingCall::new(id, method, params);
                call.return_type = return_type;
                self.add_call(call)
            }
            Err(source) => {
                self.deferred = Some(ClientError::Serialization {
                    method: method.to_string(),
                    source,
                });
                self
            }
        }
    }

    /// Runs every pre-flight check and freezes the batch.
    pub fn build(self) -> Result<BatchRequest<R>, ClientError> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        Ok(BatchRequest::new(
            self.calls,
            self.return_type,
            self.id_kind,
        )?)
    }

    /// Execute the batch and return every outcome, failed calls included.
    pub fn execute_outcome(self) -> Result<BatchOutcome<R>, ClientError> {
        let client = self.client;
        let batch = self.build()?;
        client.execute_batch(&batch)
    }

    /// Execute the batch. Any per-call error turns the whole execution into
    /// [`BatchError::Partial`], which still carries the successes.
    pub fn execute(self) -> Result<IndexMap<Id, R>, BatchError<R>> {
        match self.execute_outcome()?.into_result() {
            Ok(successes) => {
                debug!(count = successes.len(), "Batch succeeded");
                Ok(successes)
            }
            Err(outcome) => {
                warn!(
                    failed = outcome.errors.len(),
                    succeeded = outcome.successes.len(),
                    "Batch completed with errors"
                );
                Err(BatchError::Partial(outcome))
            }
        }
    }
}
