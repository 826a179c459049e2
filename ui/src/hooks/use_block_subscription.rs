use std::rc::Rc;

use api::chain::BlockNumber;
use api::chain::ChainEvent;
use api::chain::Subscription;
use dioxus::prelude::*;

use crate::app_state::AppState;

/// Calls `on_block` for every new block while the calling component is
/// mounted.
///
/// The subscription lives in the component's hook storage; unmounting drops
/// it, which removes every `Block` listener from the chain connection.
pub fn use_block_subscription(on_block: impl Fn(BlockNumber) + 'static) {
    let app_state = use_context::<AppState>();

    use_hook(move || {
        Rc::new(Subscription::new(
            app_state.chain.clone(),
            ChainEvent::Block,
            Rc::new(on_block),
        ))
    });
}
