//! Blocking JSON-RPC client.
//!
//! bitcoind speaks JSON-RPC 1.0 with parts of 2.0; requests are tagged
//! `"jsonrpc": "2.0"` and carry a random string id. Batch replies may arrive
//! in any order, so they are matched back to their requests by id.

#![allow(missing_docs)]

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::{BituiError, Result};

/// HTTP basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One JSON-RPC call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: String,
}

impl RpcRequest {
    /// Build a request with a fresh random id.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self::with_id(method, params, format!("{:016x}", rand::random::<u64>()))
    }

    #[must_use]
    pub fn with_id(method: impl Into<String>, params: Vec<Value>, id: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// Error object carried in a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    /// "A Primitive or Structured value" per JSON-RPC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One JSON-RPC reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
    #[serde(default)]
    pub id: Value,
}

impl RpcResponse {
    /// The `result` value, or the reply's error object as a [`BituiError::Rpc`].
    pub fn into_result(self, method: &str) -> Result<Value> {
        match self.error {
            Some(err) => Err(BituiError::Rpc {
                method: method.to_string(),
                code: err.code,
                message: err.message,
            }),
            None => Ok(self.result),
        }
    }

    fn id_matches(&self, request: &RpcRequest) -> bool {
        self.id.as_str() == Some(request.id.as_str())
    }
}

/// Reorder batch `responses` to follow `requests`. Replies with an unknown
/// id sort first, the same place a reply for the first request would go.
#[must_use]
pub fn order_by_request(requests: &[RpcRequest], mut responses: Vec<RpcResponse>) -> Vec<RpcResponse> {
    responses.sort_by_key(|response| {
        requests
            .iter()
            .position(|request| response.id_matches(request))
            .unwrap_or(0)
    });
    responses
}

/// JSON-RPC over HTTP POST.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::blocking::Client,
    url: String,
    credentials: Option<Credentials>,
}

impl RpcClient {
    /// Build a client for `url`. `timeout` of `None` keeps reqwest's default.
    pub fn new(
        url: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| BituiError::Transport {
            method: "client setup".to_string(),
            details: e.to_string(),
        })?;
        Ok(Self {
            http,
            url: url.into(),
            credentials,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a single call and return its `result`.
    pub fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let request = RpcRequest::new(method, params);
        let response: RpcResponse = self.post(method, &request)?;
        response.into_result(method)
    }

    /// Send several calls in one HTTP POST. Replies come back in request order.
    pub fn batch(&self, requests: &[RpcRequest]) -> Result<Vec<RpcResponse>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let responses: Vec<RpcResponse> = self.post("batch", requests)?;
        Ok(order_by_request(requests, responses))
    }

    fn post<B, R>(&self, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let transport = |details: String| BituiError::Transport {
            method: method.to_string(),
            details,
        };

        let mut request = self.http.post(&self.url).json(body);
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }
        let response = request.send().map_err(|e| transport(e.to_string()))?;

        // bitcoind answers RPC-level failures with a non-2xx status and a
        // JSON error body, but auth failures with an empty 401.
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(transport(
                "HTTP 401 unauthorized (check username/password or cookie)".to_string(),
            ));
        }
        response
            .json::<R>()
            .map_err(|e| transport(format!("HTTP {status}: {e}")))
    }
}
