//! JSON-RPC wire types and quantity decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Block, BlockId};
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RpcResponse {
    /// Decode `result`, or surface the server's error object.
    ///
    /// A missing `result` decodes as JSON `null`, so `Option<T>` targets
    /// see `None`.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        if let Some(error) = self.error {
            return Err(Error::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(serde_json::from_value(self.result.unwrap_or(Value::Null))?)
    }
}

/// Block header as returned by `eth_getBlockByNumber` (only the fields we use).
#[derive(Debug, Deserialize)]
pub struct BlockHeader {
    number: String,
    timestamp: String,
}

impl TryFrom<BlockHeader> for Block {
    type Error = Error;

    fn try_from(header: BlockHeader) -> Result<Self> {
        Ok(Block::new(
            quantity_u64(&header.number)?,
            quantity_u64(&header.timestamp)?,
        ))
    }
}

/// Decode a hex-encoded JSON-RPC quantity (`0x` prefix, no leading zeros
/// required).
pub fn parse_quantity(raw: &str) -> Result<u128> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| Error::Parse(format!("quantity without 0x prefix: {raw}")))?;
    if digits.is_empty() {
        return Err(Error::Parse("empty quantity".into()));
    }
    u128::from_str_radix(digits, 16).map_err(|e| Error::Parse(format!("bad quantity {raw}: {e}")))
}

pub fn quantity_u64(raw: &str) -> Result<u64> {
    let value = parse_quantity(raw)?;
    u64::try_from(value).map_err(|_| Error::Parse(format!("quantity out of range: {raw}")))
}

/// Block parameter for `eth_getBlockByNumber`.
pub fn block_param(id: BlockId) -> Value {
    match id {
        BlockId::Latest => Value::String("latest".into()),
        BlockId::Number(number) => Value::String(format!("{number:#x}")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_hex_quantities() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x19").unwrap(), 25);
        assert_eq!(parse_quantity("0x4a817c800").unwrap(), 20_000_000_000);
        assert!(parse_quantity("25").is_err());
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn u64_quantity_rejects_overflow() {
        assert!(quantity_u64("0x10000000000000000").is_err());
        assert_eq!(quantity_u64("0xffffffffffffffff").unwrap(), u64::MAX);
    }

    #[test]
    fn block_param_encodes_number_as_hex() {
        assert_eq!(block_param(BlockId::Latest), json!("latest"));
        assert_eq!(block_param(BlockId::Number(255)), json!("0xff"));
    }

    #[test]
    fn request_serializes_as_jsonrpc_2() {
        let request = RpcRequest::new(7, "eth_getBlockByNumber", json!(["latest", false]));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "eth_getBlockByNumber",
                "params": ["latest", false],
            })
        );
    }

    #[test]
    fn block_response_decodes_header() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "number": "0x1b4",
                "timestamp": "0x65e1b2c0",
                "hash": "0xdc0818cf78f21a8e70579cb46a43643f78291264dda342ae31049421c82d21ae",
            },
        }))
        .unwrap();

        let header: Option<BlockHeader> = response.into_result().unwrap();
        let block = Block::try_from(header.unwrap()).unwrap();
        assert_eq!(block, Block::new(436, 0x65e1_b2c0));
    }

    #[test]
    fn null_result_decodes_as_none() {
        let response: RpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": null})).unwrap();
        let header: Option<BlockHeader> = response.into_result().unwrap();
        assert!(header.is_none());
    }

    #[test]
    fn error_object_becomes_rpc_error() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "the method eth_mining does not exist"},
        }))
        .unwrap();

        let err = response.into_result::<bool>().unwrap_err();
        assert!(matches!(err, Error::Rpc { code: -32601, .. }));
    }
}
