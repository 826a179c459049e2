//! The connection to a blockchain node: contract reads plus block
//! notifications delivered to registered listeners.

pub mod json_rpc;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use alloy_primitives::Address;
use async_trait::async_trait;
use dioxus_logger::tracing;

use crate::error::DashboardError;

pub type BlockNumber = u64;

/// A callback invoked with the number of the block that triggered it.
pub type Listener = Rc<dyn Fn(BlockNumber)>;

/// Events a chain connection can notify listeners about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ChainEvent {
    /// A new block has been observed at the head of the chain.
    #[strum(serialize = "block")]
    Block,
}

/// Listener registry embedded in each `ChainConnection` implementation.
#[derive(Default)]
pub struct Listeners(RefCell<HashMap<ChainEvent, Vec<Listener>>>);

impl Listeners {
    pub fn add(&self, event: ChainEvent, listener: Listener) {
        self.0.borrow_mut().entry(event).or_default().push(listener);
    }

    pub fn remove_all(&self, event: ChainEvent) {
        self.0.borrow_mut().remove(&event);
    }

    pub fn count(&self, event: ChainEvent) -> usize {
        self.0.borrow().get(&event).map_or(0, Vec::len)
    }

    /// Calls every listener registered for `event`.
    ///
    /// The registry is not borrowed while listeners run, so a listener may
    /// register or remove listeners itself.
    pub fn emit(&self, event: ChainEvent, block: BlockNumber) {
        let listeners = self.0.borrow().get(&event).cloned().unwrap_or_default();
        for listener in listeners {
            listener(block);
        }
    }
}

/// A connection to a chain node.
///
/// Implementations only supply the registry and the two outbound calls; the
/// listener methods are provided.
#[async_trait(?Send)]
pub trait ChainConnection {
    fn listeners(&self) -> &Listeners;

    /// Returns the number of the latest block.
    async fn block_number(&self) -> Result<BlockNumber, DashboardError>;

    /// Executes a read-only contract call at the latest block and returns the
    /// raw return data.
    async fn call(&self, to: &Address, calldata: &[u8]) -> Result<Vec<u8>, DashboardError>;

    fn on(&self, event: ChainEvent, listener: Listener) {
        self.listeners().add(event, listener);
    }

    fn remove_all_listeners(&self, event: ChainEvent) {
        self.listeners().remove_all(event);
    }

    fn listener_count(&self, event: ChainEvent) -> usize {
        self.listeners().count(event)
    }

    fn emit(&self, event: ChainEvent, block: BlockNumber) {
        tracing::debug!("{} event: {}", event, block);
        self.listeners().emit(event, block);
    }
}

/// Registers a listener and removes every listener for the same event when
/// dropped.
pub struct Subscription {
    chain: Rc<dyn ChainConnection>,
    event: ChainEvent,
}

impl Subscription {
    pub fn new(chain: Rc<dyn ChainConnection>, event: ChainEvent, listener: Listener) -> Self {
        chain.on(event, listener);
        Self { chain, event }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.chain.remove_all_listeners(self.event);
    }
}

/// Turns periodic block-number polls into `Block` events.
#[derive(Debug, Default)]
pub struct BlockWatcher {
    last_seen: Option<BlockNumber>,
}

impl BlockWatcher {
    /// Polls the head of the chain once.
    ///
    /// Emits a `Block` event and returns the new number when the head moved
    /// since the previous poll. The first successful poll only records the
    /// head, since freshly mounted readers have just fetched anyway.
    pub async fn poll(
        &mut self,
        chain: &dyn ChainConnection,
    ) -> Result<Option<BlockNumber>, DashboardError> {
        let head = chain.block_number().await?;
        let previous = self.last_seen.replace(head);
        match previous {
            Some(prev) if prev != head => {
                chain.emit(ChainEvent::Block, head);
                Ok(Some(head))
            }
            _ => Ok(None),
        }
    }
}
