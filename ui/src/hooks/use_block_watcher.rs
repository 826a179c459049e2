use api::chain::BlockWatcher;
use dioxus::prelude::*;

use crate::app_state::AppState;
use crate::hooks::use_chain_checker::use_chain_checker;

/// Polls the chain head for as long as the calling component is mounted and
/// emits a `Block` event to the chain's listeners whenever it moves.
pub fn use_block_watcher() {
    let app_state = use_context::<AppState>();
    let checker = use_chain_checker();

    use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let app_state = app_state.clone();
        let mut checker = checker;
        async move {
            let mut watcher = BlockWatcher::default();
            loop {
                let polled = watcher.poll(&*app_state.chain).await;
                if let Some(Some(block)) = checker.check(polled) {
                    dioxus_logger::tracing::debug!("new block {}", block);
                }
                crate::compat::sleep(app_state.config.poll_interval).await;
            }
        }
    });
}
