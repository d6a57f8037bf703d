// JSON-RPC 2.0 Client
// Builds single requests and batches, passes them through a transport and
// reconciles the answers:
// - typed results per call or per batch
// - partial batch failures surfaced with the successful results intact
// - every protocol malformation reported before any result is handed out

use crate::batch::BatchRequestBuilder;
use crate::error::ClientError;
use crate::request::RequestBuilder;
use jrpc_core::{
    encode_request, parse_with_limit, reconcile_single, BatchOutcome, BatchRequest, ConfigError,
    Envelope, Id, IdGenerator, PendingCall, SequentialIdGenerator, Shape, DEFAULT_SNIPPET_LEN,
};
use jrpc_transport::Transport;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum number of calls in a single batch
    pub max_batch_size: usize,
    /// How much of an unparseable response is quoted in errors
    pub response_snippet_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 100,
            response_snippet_len: DEFAULT_SNIPPET_LEN,
        }
    }
}

/// Main client struct. Holds no per-execution state, so one client can serve
/// many threads as long as its transport can.
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
    id_generator: Arc<dyn IdGenerator>,
}

impl<T: Transport> Client<T> {
    /// Create a new client with default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            id_generator: Arc::new(SequentialIdGenerator::new()),
        }
    }

    /// Replace the generator used for requests that were not given an id.
    pub fn with_id_generator(mut self, id_generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Arc::new(id_generator);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a batch whose successful results are all `R`.
    pub fn batch<R>(&self) -> BatchRequestBuilder<'_, T, R> {
        BatchRequestBuilder::new(self)
    }

    /// Start a single request.
    pub fn request(&self) -> RequestBuilder<'_, T> {
        RequestBuilder::new(self)
    }

    pub(crate) fn next_id(&self) -> Id {
        self.id_generator.next_id()
    }

    /// Sends an already validated batch and reconciles the answer.
    pub fn execute_batch<R>(&self, batch: &BatchRequest<R>) -> Result<BatchOutcome<R>, ClientError> {
        if batch.len() > self.config.max_batch_size {
            return Err(ConfigError::BatchTooLarge {
                size: batch.len(),
                max: self.config.max_batch_size,
            }
            .into());
        }

        let body = batch.encode()?;
        debug!(calls = batch.len(), "Sending batch request");

        let envelopes = self.round_trip(&body, Shape::Batch)?;
        debug!(envelopes = envelopes.len(), "Reconciling batch response");

        Ok(batch.reconcile(envelopes)?)
    }

    /// Sends one call. The call must carry its return type.
    pub fn execute_call<R>(&self, call: &PendingCall<R>) -> Result<R, ClientError> {
        let return_type = call
            .return_type
            .as_ref()
            .ok_or_else(|| ConfigError::MissingReturnType {
                id: call.id.clone(),
            })?;

        let body = encode_request(&call.request())?;
        debug!(id = %call.id, method = %call.method, "Sending request");

        let envelopes = self.round_trip(&body, Shape::Single)?;
        match reconcile_single(&call.id, return_type, envelopes)? {
            Ok(value) => Ok(value),
            Err(error) => Err(ClientError::Rpc {
                id: call.id.clone(),
                error,
            }),
        }
    }

    fn round_trip(&self, body: &str, shape: Shape) -> Result<Vec<Envelope>, ClientError> {
        trace!("Request body: {}", body);
        let text = self.transport.pass(body)?;
        trace!("Response body: {}", text);

        Ok(parse_with_limit(
            &text,
            shape,
            self.config.response_snippet_len,
        )?)
    }
}

impl<T: fmt::Debug> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .field("id_generator", &self.id_generator)
            .finish()
    }
}
