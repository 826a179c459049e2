//! A `ChainConnection` backed by an Ethereum JSON-RPC endpoint over HTTP.

use std::cell::Cell;

use alloy_primitives::Address;
use alloy_primitives::Bytes;
use alloy_primitives::U64;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;

use super::BlockNumber;
use super::ChainConnection;
use super::Listeners;
use crate::error::DashboardError;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize, Debug)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize, Debug)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

pub struct JsonRpcProvider {
    url: String,
    client: reqwest::Client,
    next_id: Cell<u64>,
    listeners: Listeners,
}

impl JsonRpcProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            next_id: Cell::new(1),
            listeners: Listeners::default(),
        }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, DashboardError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<RpcResponse>()
            .await?;

        unwrap_response(method, resp)
    }
}

fn unwrap_response(method: &str, resp: RpcResponse) -> Result<Value, DashboardError> {
    if let Some(err) = resp.error {
        return Err(DashboardError::ContractRead(format!(
            "{} failed: {} (code {})",
            method, err.message, err.code
        )));
    }
    resp.result
        .ok_or_else(|| DashboardError::Decode(format!("{} returned no result", method)))
}

fn parse_quantity(value: Value) -> Result<BlockNumber, DashboardError> {
    let quantity: U64 = serde_json::from_value(value)?;
    Ok(quantity.to::<u64>())
}

#[async_trait(?Send)]
impl ChainConnection for JsonRpcProvider {
    fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    async fn block_number(&self) -> Result<BlockNumber, DashboardError> {
        let result = self.request("eth_blockNumber", json!([])).await?;
        parse_quantity(result)
    }

    async fn call(&self, to: &Address, calldata: &[u8]) -> Result<Vec<u8>, DashboardError> {
        let params = json!([
            { "to": to, "data": Bytes::copy_from_slice(calldata) },
            "latest"
        ]);
        let result = self.request("eth_call", params).await?;
        let data: Bytes = serde_json::from_value(result)?;
        if data.is_empty() {
            // an empty result means the target has no code or no such function
            return Err(DashboardError::ContractRead(format!(
                "call to {} returned no data",
                to
            )));
        }
        Ok(data.to_vec())
    }
}
