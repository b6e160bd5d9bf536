//! bitcoind RPC methods used by the dashboard.

#![allow(missing_docs)]

use serde_json::{Value, json};

use super::client::RpcClient;
use super::{ChainSource, ChainSummary};
use crate::core::errors::{BituiError, Result};
use crate::layout::block::BlockSummary;

/// Supported bitcoind calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    GetBlock,
    GetBlockchainInfo,
    GetBlockCount,
    GetBlockHash,
}

impl Call {
    /// Wire name of the method.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::GetBlock => "getblock",
            Self::GetBlockchainInfo => "getblockchaininfo",
            Self::GetBlockCount => "getblockcount",
            Self::GetBlockHash => "getblockhash",
        }
    }
}

/// Typed facade over [`RpcClient`] for the calls in [`Call`].
#[derive(Debug, Clone)]
pub struct BitcoinRpc {
    client: RpcClient,
}

impl BitcoinRpc {
    #[must_use]
    pub const fn new(client: RpcClient) -> Self {
        Self { client }
    }

    /// Send `call` with `params` and return the raw `result`.
    pub fn method(&self, call: Call, params: Vec<Value>) -> Result<Value> {
        self.client.call(call.method(), params)
    }

    pub fn get_blockchain_info(&self) -> Result<ChainSummary> {
        ChainSummary::from_value(self.method(Call::GetBlockchainInfo, vec![])?)
    }

    pub fn get_block_count(&self) -> Result<u64> {
        let value = self.method(Call::GetBlockCount, vec![])?;
        value.as_u64().ok_or_else(|| unexpected(Call::GetBlockCount, &value))
    }

    pub fn get_block_hash(&self, height: u64) -> Result<String> {
        let value = self.method(Call::GetBlockHash, vec![json!(height)])?;
        match value {
            Value::String(hash) => Ok(hash),
            other => Err(unexpected(Call::GetBlockHash, &other)),
        }
    }

    pub fn get_block(&self, hash: &str) -> Result<BlockSummary> {
        // Verbosity 1: decoded header fields plus txids.
        let value = self.method(Call::GetBlock, vec![json!(hash), json!(1)])?;
        Ok(serde_json::from_value(value)?)
    }
}

impl ChainSource for BitcoinRpc {
    fn get_chain_summary(&mut self) -> Result<ChainSummary> {
        self.get_blockchain_info()
    }

    fn get_block_by_height(&mut self, height: u64) -> Result<BlockSummary> {
        let hash = self.get_block_hash(height)?;
        self.get_block(&hash)
    }
}

fn unexpected(call: Call, value: &Value) -> BituiError {
    BituiError::Serialization {
        context: call.method(),
        details: format!("unexpected result shape: {value}"),
    }
}
