//! Transport-agnostic JSON-RPC 2.0 client engine.
//!
//! The pieces, in the order a call flows through them:
//!
//! - [`ids`] and [`params`]: identifiers and call arguments
//! - [`batch`]: pending calls and the validated [`BatchRequest`]
//! - [`request`]: the wire serializer
//! - [`response`]: parsing and validation of response text into [`Envelope`]s
//! - [`coerce`]: per-call conversion of raw results ([`ReturnType`])
//! - [`reconcile`]: matching envelopes to calls and building a [`BatchOutcome`]
//!
//! Sending text anywhere is left to a transport; see the
//! `currentspace-jrpc-transport` crate.

pub mod batch;
pub mod coerce;
pub mod error;
pub mod ids;
pub mod params;
pub mod reconcile;
pub mod request;
pub mod response;

pub use batch::{check_id_kind, BatchRequest, PendingCall};
pub use coerce::ReturnType;
pub use error::{CoercionError, ConfigError, Error, ErrorCode, ErrorPayload, ProtocolError};
pub use ids::{Id, IdGenerator, IdKind, RandomIdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use params::Params;
pub use reconcile::{reconcile, reconcile_single, BatchOutcome};
pub use request::{encode_batch, encode_request, Request, JSONRPC_VERSION};
pub use response::{parse, parse_with_limit, Envelope, JsonKind, Outcome, Shape, DEFAULT_SNIPPET_LEN};
