use api::DashboardError;
use dioxus::prelude::*;

#[derive(Clone, PartialEq, Debug, strum::EnumIs)]
pub enum ChainStatus {
    Connected,
    Disconnected(String),
}

#[derive(Clone, Copy)]
pub struct ChainChecker {
    status: Signal<ChainStatus>,
}

impl ChainChecker {
    /// Inspects a Result from a chain or indexer call.
    /// - If `Ok`: marks the connection as up again (if it was down) and returns the value.
    /// - If `Err`: logs it, marks the connection as down for network errors, and returns None.
    pub fn check<T>(&mut self, result: Result<T, DashboardError>) -> Option<T> {
        match result {
            Ok(val) => {
                self.mark_connected();
                Some(val)
            }
            Err(e) => {
                dioxus_logger::tracing::warn!("{}", e);
                if e.is_network() {
                    self.status.set(ChainStatus::Disconnected(e.to_string()));
                }
                None
            }
        }
    }

    /// Checks a result by reference without consuming it.
    /// Returns `true` if the result is Ok.
    pub fn check_result_ref<T>(&mut self, result: &Result<T, DashboardError>) -> bool {
        match result {
            Ok(_) => {
                self.mark_connected();
                true
            }
            Err(e) => {
                if e.is_network() {
                    self.status.set(ChainStatus::Disconnected(e.to_string()));
                }
                false
            }
        }
    }

    fn mark_connected(&mut self) {
        if self.status.peek().is_disconnected() {
            self.status.set(ChainStatus::Connected);
        }
    }
}

pub fn use_chain_checker() -> ChainChecker {
    let status = use_context::<Signal<ChainStatus>>();
    ChainChecker { status }
}
