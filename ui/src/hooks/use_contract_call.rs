//! A polled contract value that can be revalidated on demand.

use api::contract_cache::CallKey;
use api::units::TokenAmount;
use api::DashboardError;
use dioxus::prelude::*;

use crate::app_state::AppState;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
struct Revalidation {
    generation: u64,
    forced: bool,
}

/// Handle to one contract read, owned by the component that created it.
///
/// The read runs in that component's scope, so unmounting cancels it.
#[derive(Clone, Copy)]
pub struct ContractCall {
    key: CopyValue<CallKey>,
    resource: Resource<Result<TokenAmount, DashboardError>>,
    latest: Signal<Option<TokenAmount>>,
    revalidation: Signal<Revalidation>,
}

impl ContractCall {
    /// The most recent successfully read (or seeded) value.
    ///
    /// A failed refresh keeps the previous value.
    pub fn data(&self) -> Option<TokenAmount> {
        self.latest.read().clone()
    }

    /// The error of the latest read, if it failed.
    pub fn error(&self) -> Option<DashboardError> {
        match &*self.resource.read() {
            Some(Err(e)) => Some(e.clone()),
            _ => None,
        }
    }

    /// Seeds a value and/or forces a fresh read that bypasses the cache.
    ///
    /// A seeded value is shown at once and written to the shared cache, so
    /// other readers of the same call pick it up on their next fetch.
    /// `mutate(None, true)` keeps showing the current value until the forced
    /// read lands.
    pub fn mutate(&self, value: Option<TokenAmount>, should_revalidate: bool) {
        if let Some(value) = value {
            let mut latest = self.latest;
            latest.set(Some(value.clone()));

            let cache = consume_context::<AppState>().cache.clone();
            let key = self.key.peek().clone();
            spawn(async move {
                cache.seed(key, value).await;
            });
        }
        if should_revalidate {
            let mut revalidation = self.revalidation;
            revalidation.with_mut(|r| {
                r.generation += 1;
                r.forced = true;
            });
        }
    }
}

/// Reads `key` through the shared contract cache.
///
/// The first read is served from the cache when possible; reads triggered by
/// `mutate(_, true)` always go to the chain. A different `key` on a later
/// render starts a new read.
pub fn use_contract_call(key: CallKey) -> ContractCall {
    let app_state = use_context::<AppState>();
    let mut current_key = use_hook(|| CopyValue::new(key.clone()));
    let latest = use_signal(|| None::<TokenAmount>);
    let revalidation = use_signal(Revalidation::default);

    if *current_key.peek() != key {
        current_key.set(key.clone());
    }

    let resource = use_resource(use_reactive!(|(key,)| {
        let app_state = app_state.clone();
        let mut latest = latest;
        // reading here makes every revalidation restart the resource.
        let forced = revalidation.read().forced;

        async move {
            let result = if forced {
                app_state.cache.revalidate(&*app_state.chain, &key).await
            } else {
                app_state.cache.fetch(&*app_state.chain, &key).await
            };
            match &result {
                Ok(value) => latest.set(Some(value.clone())),
                Err(e) => dioxus_logger::tracing::warn!("reading {} failed: {}", key, e),
            }
            result
        }
    }));

    ContractCall {
        key: current_key,
        resource,
        latest,
        revalidation,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use alloy_primitives::U256;
    use api::config::DashboardConfig;
    use api::contracts::earnedCall;
    use api::Address;

    use super::*;
    use crate::components::deposit_panel::tests::settle;
    use crate::components::deposit_panel::tests::FixedChain;
    use crate::components::deposit_panel::tests::NoIndexer;

    fn earned_key(deposit_id: u64) -> CallKey {
        CallKey::new(
            Address::ZERO,
            &earnedCall {
                depositId: U256::from(deposit_id),
            },
        )
    }

    fn app_state(chain: Rc<FixedChain>) -> AppState {
        AppState::with_parts(DashboardConfig::default(), chain, Rc::new(NoIndexer))
    }

    #[component]
    fn Seeding(app_state: AppState) -> Element {
        use_context_provider(|| app_state.clone());
        let call = use_contract_call(earned_key(1));
        use_hook(|| call.mutate(Some(TokenAmount::from(7u64)), false));

        let shown = call.data().map(|v| v.raw().to_string()).unwrap_or_default();
        rsx! { "{shown}" }
    }

    #[component]
    fn Switching(app_state: AppState) -> Element {
        use_context_provider(|| app_state.clone());
        let mut deposit_id = use_signal(|| 1u64);
        let call = use_contract_call(earned_key(deposit_id()));
        use_future(move || async move {
            crate::compat::sleep(Duration::from_millis(5)).await;
            deposit_id.set(2);
        });

        let read = call.data().is_some();
        rsx! { "{deposit_id} {read}" }
    }

    #[tokio::test]
    async fn seeded_value_reaches_the_shared_cache() {
        let state = app_state(Rc::new(FixedChain::default()));
        let mut dom = VirtualDom::new_with_props(
            Seeding,
            SeedingProps {
                app_state: state.clone(),
            },
        );
        dom.rebuild_in_place();
        settle(&mut dom).await;

        assert_eq!(
            state.cache.get(&earned_key(1)).await,
            Some(TokenAmount::from(7u64))
        );
    }

    #[tokio::test]
    async fn changing_the_key_reads_the_new_call() {
        let chain = Rc::new(FixedChain::answering(1));
        let state = app_state(chain.clone());
        let mut dom = VirtualDom::new_with_props(
            Switching,
            SwitchingProps {
                app_state: state.clone(),
            },
        );
        dom.rebuild_in_place();
        settle(&mut dom).await;

        assert_eq!(chain.calls.get(), 2);
        assert!(state.cache.get(&earned_key(1)).await.is_some());
        assert!(state.cache.get(&earned_key(2)).await.is_some());
        assert_eq!(dioxus_ssr::render(&dom), "2 true");
    }
}
