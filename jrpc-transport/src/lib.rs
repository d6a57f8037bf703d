pub mod recorder;
pub mod transport;
#[cfg(feature = "http")]
pub mod http;

pub use recorder::RecordingTransport;
pub use transport::{from_fn, FnTransport, Transport, TransportError};
#[cfg(feature = "http")]
pub use http::{HttpTransport, HttpTransportConfig};
