//! Chain data sources: the contract the dashboard consumes, and the bitcoind
//! JSON-RPC implementation of it.

#![allow(missing_docs)]

pub mod auth;
pub mod bitcoin;
pub mod client;

use serde_json::{Map, Value};

use crate::core::errors::{BituiError, Result};
use crate::layout::block::BlockSummary;

/// Chain metadata as returned by the node, in the node's key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChainSummary {
    fields: Map<String, Value>,
}

impl ChainSummary {
    /// Wrap a JSON object. Anything other than an object is a fetch failure.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(BituiError::DataFetch {
                target: "chain summary".to_string(),
                details: format!("expected a JSON object, got {other}"),
            }),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Current chain height (the `blocks` key).
    pub fn tip_height(&self) -> Result<u64> {
        self.fields
            .get("blocks")
            .and_then(Value::as_u64)
            .ok_or_else(|| BituiError::DataFetch {
                target: "chain summary".to_string(),
                details: "missing numeric `blocks` field".to_string(),
            })
    }

    /// One `key -> value` line per field.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key} -> {s}"),
                other => format!("{key} -> {other}"),
            })
            .collect()
    }
}

/// Where the dashboard pulls chain data from.
pub trait ChainSource {
    /// Chain metadata; must carry a numeric `blocks` height.
    fn get_chain_summary(&mut self) -> Result<ChainSummary>;

    /// The block at `height` on the active chain.
    fn get_block_by_height(&mut self, height: u64) -> Result<BlockSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_reads_tip_height() {
        let summary =
            ChainSummary::from_value(json!({"chain": "regtest", "blocks": 110})).unwrap();
        assert_eq!(summary.tip_height().unwrap(), 110);
    }

    #[test]
    fn summary_without_blocks_is_fetch_error() {
        let summary = ChainSummary::from_value(json!({"chain": "main"})).unwrap();
        assert_eq!(summary.tip_height().unwrap_err().code(), "BUI-2001");
        let summary = ChainSummary::from_value(json!({"blocks": "ten"})).unwrap();
        assert!(summary.tip_height().is_err());
    }

    #[test]
    fn non_object_summary_is_rejected() {
        assert!(ChainSummary::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn lines_keep_node_order_and_unquote_strings() {
        let summary = ChainSummary::from_value(json!({
            "chain": "regtest",
            "blocks": 3,
            "pruned": false
        }))
        .unwrap();
        assert_eq!(
            summary.lines(),
            vec!["chain -> regtest", "blocks -> 3", "pruned -> false"]
        );
    }
}
