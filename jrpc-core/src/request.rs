use crate::error::Error;
use crate::ids::Id;
use crate::params::Params;
use serde::Serialize;

pub const JSONRPC_VERSION: &str = "2.0";

/// Wire form of one call. Field order matches `{"jsonrpc","id","method","params"}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Request<'a> {
    pub jsonrpc: &'static str,
    pub id: &'a Id,
    pub method: &'a str,
    pub params: &'a Params,
}

impl<'a> Request<'a> {
    pub fn new(id: &'a Id, method: &'a str, params: &'a Params) -> Self {
        Request {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

/// Encodes a single call as a bare object.
pub fn encode_request(request: &Request<'_>) -> Result<String, Error> {
    serde_json::to_string(request).map_err(Error::Encode)
}

/// Encodes calls as a batch array, in the given order.
pub fn encode_batch<'a, I>(requests: I) -> Result<String, Error>
where
    I: IntoIterator<Item = Request<'a>>,
{
    let requests: Vec<Request<'a>> = requests.into_iter().collect();
    serde_json::to_string(&requests).map_err(Error::Encode)
}
