pub mod batch;
pub mod client;
pub mod error;
pub mod logging;
pub mod request;

pub use batch::BatchRequestBuilder;
pub use client::{Client, ClientConfig};
pub use error::{BatchError, ClientError};
pub use request::RequestBuilder;

pub use jrpc_core::{
    BatchOutcome, BatchRequest, CoercionError, ConfigError, ErrorCode, ErrorPayload, Id,
    IdGenerator, IdKind, Params, PendingCall, ProtocolError, RandomIdGenerator, ReturnType,
    SequentialIdGenerator, UuidIdGenerator,
};
pub use jrpc_transport::{from_fn, FnTransport, RecordingTransport, Transport, TransportError};
#[cfg(feature = "http")]
pub use jrpc_transport::{HttpTransport, HttpTransportConfig};
