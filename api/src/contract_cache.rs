//! Memoized contract reads keyed by address, method, and arguments.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use alloy_primitives::Address;
use alloy_primitives::hex;
use alloy_primitives::Bytes;
use alloy_sol_types::SolCall;
use dioxus_logger::tracing;
use tokio::sync::RwLock;

use crate::chain::ChainConnection;
use crate::contracts::decode_uint;
use crate::error::DashboardError;
use crate::units::TokenAmount;

/// Identifies one read-only contract call returning a single `uint256`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallKey {
    address: Address,
    signature: &'static str,
    calldata: Bytes,
}

impl CallKey {
    pub fn new<C: SolCall>(address: Address, call: &C) -> Self {
        Self {
            address,
            signature: C::SIGNATURE,
            calldata: call.abi_encode().into(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn calldata(&self) -> &[u8] {
        &self.calldata
    }
}

impl fmt::Display for CallKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {}",
            self.address,
            self.signature,
            hex::encode_prefixed(&self.calldata)
        )
    }
}

/// Shared cache of the latest value seen for each `CallKey`.
///
/// Clones share the same storage.
#[derive(Clone, Default)]
pub struct ContractCache {
    entries: Arc<RwLock<HashMap<CallKey, TokenAmount>>>,
}

impl ContractCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CallKey) -> Option<TokenAmount> {
        self.entries.read().await.get(key).cloned()
    }

    /// Stores a value without calling the chain.
    pub async fn seed(&self, key: CallKey, value: TokenAmount) {
        self.entries.write().await.insert(key, value);
    }

    /// Returns the memoized value, reading the chain only on a miss.
    pub async fn fetch(
        &self,
        chain: &dyn ChainConnection,
        key: &CallKey,
    ) -> Result<TokenAmount, DashboardError> {
        if let Some(value) = self.get(key).await {
            tracing::debug!("cache hit: {}", key);
            return Ok(value);
        }

        let mut entries = self.entries.write().await;

        // another task may have filled the entry while we waited for the lock.
        if let Some(value) = entries.get(key) {
            return Ok(value.clone());
        }

        let value = read_uint(chain, key).await?;
        entries.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Reads the chain unconditionally and replaces the memoized value.
    ///
    /// On failure the previous value stays cached.
    pub async fn revalidate(
        &self,
        chain: &dyn ChainConnection,
        key: &CallKey,
    ) -> Result<TokenAmount, DashboardError> {
        let value = read_uint(chain, key).await?;
        self.entries
            .write()
            .await
            .insert(key.clone(), value.clone());
        Ok(value)
    }
}

async fn read_uint(
    chain: &dyn ChainConnection,
    key: &CallKey,
) -> Result<TokenAmount, DashboardError> {
    let data = chain.call(key.address(), key.calldata()).await?;
    Ok(decode_uint(&data)?.into())
}
