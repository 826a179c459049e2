use api::Address;
use api::deposit::find_deposit;
use api::deposit::DepositRecord;
use api::DashboardError;
use dioxus::prelude::*;

use crate::app_state::AppState;
use crate::hooks::use_chain_checker::use_chain_checker;
use crate::hooks::use_chain_checker::ChainChecker;

/// The on-demand deposit lookup of one panel.
///
/// Once a record has been loaded it is only ever replaced by a newer one; a
/// failed lookup leaves it in place and reports the error beside it.
#[derive(Clone, Copy)]
pub struct DepositLookup {
    pool: Address,
    deposit_id: u64,
    record: Signal<Option<DepositRecord>>,
    in_flight: Signal<bool>,
    error: Signal<Option<DashboardError>>,
    checker: ChainChecker,
}

impl DepositLookup {
    pub fn record(&self) -> Option<DepositRecord> {
        self.record.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.in_flight.read()
    }

    pub fn error(&self) -> Option<DashboardError> {
        self.error.read().clone()
    }

    /// Reads the deposit and its funding status, unless a lookup is already
    /// running. Must be called from within the owning component, e.g. an
    /// event handler.
    pub fn find(&self) {
        if *self.in_flight.peek() {
            return;
        }

        let app_state = consume_context::<AppState>();
        let mut this = *self;
        this.in_flight.set(true);

        spawn(async move {
            let indexed_pool = app_state.config.indexed_pool_or(this.pool);
            let result = find_deposit(
                &*app_state.chain,
                &*app_state.indexer,
                &this.pool,
                this.deposit_id,
                &indexed_pool,
            )
            .await;

            this.checker.check_result_ref(&result);
            match result {
                Ok(record) => {
                    this.record.set(Some(record));
                    this.error.set(None);
                }
                Err(e) => {
                    dioxus_logger::tracing::warn!(
                        "lookup of deposit {} failed: {}",
                        this.deposit_id,
                        e
                    );
                    this.error.set(Some(e));
                }
            }
            this.in_flight.set(false);
        });
    }
}

pub fn use_deposit_lookup(pool: Address, deposit_id: u64) -> DepositLookup {
    let checker = use_chain_checker();
    let record = use_signal(|| None);
    let in_flight = use_signal(|| false);
    let error = use_signal(|| None);

    DepositLookup {
        pool,
        deposit_id,
        record,
        in_flight,
        error,
        checker,
    }
}
