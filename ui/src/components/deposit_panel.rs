use alloy_primitives::U256;
use api::contract_cache::CallKey;
use api::contracts::earnedCall;
use api::contracts::totalSupplyCall;
use api::deposit::accrued_reward_display;
use api::deposit::DepositRecord;
use api::units::DisplayPrecision;
use api::units::TokenAmount;
use api::Address;
use chrono::DateTime;
use chrono::Utc;
use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::value_row::ValueRow;
use crate::hooks::use_block_subscription::use_block_subscription;
use crate::hooks::use_contract_call::use_contract_call;
use crate::hooks::use_deposit_lookup::use_deposit_lookup;
use crate::hooks::use_is_mobile::use_is_mobile;

/// Shown in record-backed rows until a lookup has succeeded.
const NOT_LOOKED_UP: &str = "-";

fn maturation_display(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|date| date.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Rows for a single pool deposit.
///
/// The two polled values (reward token supply and the deposit's earnings)
/// are re-read on every new block while the panel is mounted. The deposit
/// itself is only read when the user asks for it.
#[component]
pub fn DepositPanel(
    reward_token_address: Address,
    pool_address: Address,
    reward_text: String,
    reward_token_image: String,
    deposit_id: u64,
) -> Element {
    let is_mobile = use_is_mobile();
    let total_supply = use_contract_call(CallKey::new(reward_token_address, &totalSupplyCall {}));
    let earned = use_contract_call(CallKey::new(
        pool_address,
        &earnedCall {
            depositId: U256::from(deposit_id),
        },
    ));
    let lookup = use_deposit_lookup(pool_address, deposit_id);

    use_block_subscription(move |_block| {
        total_supply.mutate(None, true);
        earned.mutate(None, true);
    });

    let record = lookup.record();
    let amount = |pick: fn(&DepositRecord) -> &TokenAmount| {
        record
            .as_ref()
            .map_or_else(|| NOT_LOOKED_UP.to_string(), |r| pick(r).to_string())
    };
    let maturation = record
        .as_ref()
        .map_or_else(|| NOT_LOOKED_UP.to_string(), |r| {
            maturation_display(r.maturation_timestamp)
        });
    let accrued = accrued_reward_display(
        earned.data().as_ref(),
        total_supply.data().as_ref(),
        DisplayPrecision::for_viewport(is_mobile),
    );
    // the accrued row keeps its last value while a refresh is failing.
    let polled_error = earned.error().or_else(|| total_supply.error());

    let rows = [
        ("Deposit Lp Staked", amount(|r| &r.staked_amount)),
        ("Dai Unlocked From Lp", amount(|r| &r.unlocked_secondary)),
        ("Debase Unlocked From Lp", amount(|r| &r.unlocked_reward)),
        ("Deposit Maturation Time", maturation),
        ("Mph88 Reward Earned", amount(|r| &r.incentive_reward)),
        ("Debase Accrued", accrued),
    ];

    rsx! {
        for (label, value) in rows {
            ValueRow {
                key: "{label}",
                label: label.to_string(),
                value,
                token: reward_text.clone(),
                img: reward_token_image.clone(),
                is_mobile,
            }
        }
        if let Some(e) = polled_error {
            tr { class: "deposit-panel__stale",
                td { colspan: "2",
                    small { class: "deposit-panel__error", "Accrued value may be out of date: {e}" }
                }
            }
        }
        tr { class: "deposit-panel__actions",
            td { colspan: "2",
                Button {
                    busy: lookup.is_loading(),
                    on_click: move |_| lookup.find(),
                    "Look up deposit"
                }
                if let Some(e) = lookup.error() {
                    p { class: "deposit-panel__error",
                        small { "Failed to look up deposit {deposit_id}: {e}" }
                        Button {
                            outline: true,
                            on_click: move |_| lookup.find(),
                            "Retry"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use alloy_sol_types::SolValue;
    use api::chain::BlockNumber;
    use api::chain::ChainConnection;
    use api::chain::ChainEvent;
    use api::chain::Listeners;
    use api::config::DashboardConfig;
    use api::indexer::DepositIndexer;
    use api::indexer::FundingStatus;
    use api::DashboardError;
    use async_trait::async_trait;

    use super::*;
    use crate::app_state::AppState;
    use crate::hooks::use_chain_checker::ChainStatus;

    /// Answers every call with the same amount, or reverts when there is none.
    #[derive(Default)]
    pub(crate) struct FixedChain {
        pub listeners: Listeners,
        pub answer: Option<U256>,
        pub calls: Cell<usize>,
    }

    impl FixedChain {
        pub fn answering(tokens: u64) -> Self {
            Self {
                answer: Some(U256::from(tokens) * U256::from(10u64).pow(U256::from(18u64))),
                ..Self::default()
            }
        }
    }

    #[async_trait(?Send)]
    impl ChainConnection for FixedChain {
        fn listeners(&self) -> &Listeners {
            &self.listeners
        }

        async fn block_number(&self) -> Result<BlockNumber, DashboardError> {
            Ok(1)
        }

        async fn call(&self, _to: &Address, _data: &[u8]) -> Result<Vec<u8>, DashboardError> {
            self.calls.set(self.calls.get() + 1);
            self.answer
                .map(|value| value.abi_encode())
                .ok_or_else(|| DashboardError::ContractRead("execution reverted".to_string()))
        }
    }

    pub(crate) struct NoIndexer;

    #[async_trait(?Send)]
    impl DepositIndexer for NoIndexer {
        async fn funding_status(
            &self,
            _nft_id: u64,
            _user: &Address,
        ) -> Result<FundingStatus, DashboardError> {
            Err(DashboardError::Indexer("no matching deposit".to_string()))
        }
    }

    #[component]
    fn Harness(app_state: AppState) -> Element {
        use_context_provider(|| app_state.clone());
        use_context_provider(|| Signal::new(ChainStatus::Connected));

        rsx! {
            table {
                tbody {
                    DepositPanel {
                        reward_token_address: Address::ZERO,
                        pool_address: Address::ZERO,
                        reward_text: "DEBASE",
                        reward_token_image: "/debase.png",
                        deposit_id: 3,
                    }
                }
            }
        }
    }

    fn mount(chain: Rc<FixedChain>) -> VirtualDom {
        let app_state = AppState::with_parts(DashboardConfig::default(), chain, Rc::new(NoIndexer));
        let mut dom = VirtualDom::new_with_props(Harness, HarnessProps { app_state });
        dom.rebuild_in_place();
        dom
    }

    /// Runs pending reads and re-renders until nothing is left to do.
    pub(crate) async fn settle(dom: &mut VirtualDom) {
        while tokio::time::timeout(Duration::from_millis(50), dom.wait_for_work())
            .await
            .is_ok()
        {
            dom.render_immediate_to_vec();
        }
    }

    fn accrued_cell(html: &str) -> &str {
        let row = &html[html.find("Debase Accrued").expect("accrued row")..];
        let start = row.find("value-row__value").expect("accrued value");
        let value = &row[start..];
        let value = &value[value.find('>').expect("tag end") + 1..];
        &value[..value.find('<').expect("closing tag")]
    }

    #[test]
    fn unmount_removes_block_listener() {
        let chain = Rc::new(FixedChain::default());
        let dom = mount(chain.clone());
        assert_eq!(chain.listener_count(ChainEvent::Block), 1);

        drop(dom);
        assert_eq!(chain.listener_count(ChainEvent::Block), 0);
    }

    #[test]
    fn rows_show_placeholders_before_lookup() {
        let dom = mount(Rc::new(FixedChain::default()));
        let html = dioxus_ssr::render(&dom);

        for label in [
            "Deposit Lp Staked",
            "Dai Unlocked From Lp",
            "Debase Unlocked From Lp",
            "Deposit Maturation Time",
            "Mph88 Reward Earned",
            "Debase Accrued",
        ] {
            assert!(html.contains(label), "missing row {label}");
        }
        assert!(html.contains(">-<"));
        assert!(html.contains("Look up deposit"));
        assert!(!html.contains("Retry"));
    }

    #[tokio::test]
    async fn block_event_rereads_both_polled_values() {
        let chain = Rc::new(FixedChain::answering(2));
        let mut dom = mount(chain.clone());
        settle(&mut dom).await;
        assert_eq!(chain.calls.get(), 2);
        assert_eq!(accrued_cell(&dioxus_ssr::render(&dom)), "4");

        dom.in_runtime(|| chain.emit(ChainEvent::Block, 2));
        settle(&mut dom).await;
        assert_eq!(chain.calls.get(), 4);
        assert_eq!(accrued_cell(&dioxus_ssr::render(&dom)), "4");
    }

    #[tokio::test]
    async fn failed_polls_are_reported_beside_the_rows() {
        let chain = Rc::new(FixedChain::default());
        let mut dom = mount(chain.clone());
        settle(&mut dom).await;

        let html = dioxus_ssr::render(&dom);
        assert_eq!(accrued_cell(&html), "0");
        assert!(html.contains("Accrued value may be out of date"));
        assert!(html.contains("execution reverted"));
    }

    #[test]
    fn maturation_renders_as_utc_date() {
        assert_eq!(maturation_display(1_700_000_000), "2023-11-14 22:13 UTC");
        assert_eq!(maturation_display(0), "1970-01-01 00:00 UTC");
    }
}
