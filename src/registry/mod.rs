//! Explicit method registry with JSON-RPC 2.0 request shaping.
//!
//! Every callable operation is listed in a table with its argument names and
//! a typed handler. [`Registry::dispatch`] turns a request (or a batch of
//! requests) into the matching response object; transport is left to the
//! caller.

mod methods;
pub mod params;

pub use params::Params;

use crate::rsa::CryptoError;
use crate::search::SearchError;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

type Handler = fn(&Registry, &Params) -> Result<Value, RpcError>;

/// Errors surfaced to callers as JSON-RPC error objects.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl RpcError {
    /// JSON-RPC error code.
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse(_) => PARSE_ERROR,
            RpcError::InvalidRequest(_) => INVALID_REQUEST,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => INVALID_PARAMS,
            RpcError::Search(SearchError::InvalidArgument(_)) => INVALID_PARAMS,
            RpcError::Search(_) => INTERNAL_ERROR,
            RpcError::Crypto(CryptoError::Arith(_)) => INTERNAL_ERROR,
            RpcError::Crypto(_) => INVALID_PARAMS,
        }
    }

    /// Machine-readable kind carried in `error.data.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::Parse(_) => "parse_error",
            RpcError::InvalidRequest(_) => "invalid_request",
            RpcError::MethodNotFound(_) => "method_not_found",
            RpcError::InvalidParams(_) => "invalid_params",
            RpcError::Search(err) => err.kind(),
            RpcError::Crypto(CryptoError::InvalidKeySize { .. }) => "invalid_key_size",
            RpcError::Crypto(CryptoError::MessageOutOfRange { .. }) => "message_out_of_range",
            RpcError::Crypto(CryptoError::InvalidModulus(_)) => "invalid_modulus",
            RpcError::Crypto(CryptoError::Arith(_)) => "arithmetic",
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "code": self.code(),
            "message": self.to_string(),
            "data": { "kind": self.kind() },
        })
    }
}

/// One registered method.
pub struct MethodInfo {
    pub name: &'static str,
    pub args: &'static [&'static str],
    pub description: &'static str,
    handler: Handler,
}

/// Table of callable methods.
pub struct Registry {
    methods: Vec<MethodInfo>,
}

impl Registry {
    /// Registry holding every built-in method.
    pub fn with_defaults() -> Self {
        Self {
            methods: methods::default_methods(),
        }
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.iter()
    }

    pub fn get(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Invoke `name` with optional positional or named params.
    pub fn call(&self, name: &str, params: Option<&Value>) -> Result<Value, RpcError> {
        let method = self
            .get(name)
            .ok_or_else(|| RpcError::MethodNotFound(name.to_string()))?;
        let bound = Params::bind(method.name, method.args, params)?;
        debug!(method = method.name, "calling method");
        (method.handler)(self, &bound)
    }

    /// Answer a single request or a batch.
    pub fn dispatch(&self, request: &Value) -> Value {
        match request {
            Value::Array(batch) if batch.is_empty() => error_response(
                Value::Null,
                &RpcError::InvalidRequest("empty batch".to_string()),
            ),
            Value::Array(batch) => {
                Value::Array(batch.iter().map(|item| self.respond(item)).collect())
            }
            single => self.respond(single),
        }
    }

    /// Parse `text` as JSON and dispatch it.
    pub fn dispatch_str(&self, text: &str) -> Value {
        match serde_json::from_str::<Value>(text) {
            Ok(request) => self.dispatch(&request),
            Err(err) => error_response(Value::Null, &RpcError::Parse(err.to_string())),
        }
    }

    fn respond(&self, request: &Value) -> Value {
        let Value::Object(fields) = request else {
            return error_response(
                Value::Null,
                &RpcError::InvalidRequest("request must be an object".to_string()),
            );
        };
        let id = fields.get("id").cloned().unwrap_or(Value::Null);

        if fields.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            return error_response(
                id,
                &RpcError::InvalidRequest("jsonrpc must be \"2.0\"".to_string()),
            );
        }
        let Some(method) = fields.get("method").and_then(Value::as_str) else {
            return error_response(
                id,
                &RpcError::InvalidRequest("method must be a string".to_string()),
            );
        };

        match self.call(method, fields.get("params")) {
            Ok(result) => json!({ "jsonrpc": "2.0", "result": result, "id": id }),
            Err(err) => {
                debug!(method, code = err.code(), error = %err, "call failed");
                error_response(id, &err)
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn error_response(id: Value, err: &RpcError) -> Value {
    json!({ "jsonrpc": "2.0", "error": err.to_json(), "id": id })
}
