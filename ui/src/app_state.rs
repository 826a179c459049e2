use std::ops::Deref;
use std::rc::Rc;

use api::chain::json_rpc::JsonRpcProvider;
use api::chain::ChainConnection;
use api::config::DashboardConfig;
use api::contract_cache::ContractCache;
use api::indexer::DepositIndexer;
use api::indexer::GraphIndexer;

pub struct AppStateData {
    pub config: DashboardConfig,
    pub chain: Rc<dyn ChainConnection>,
    pub indexer: Rc<dyn DepositIndexer>,
    pub cache: ContractCache,
}

/// The stable, non-reactive state shared by every component through context.
#[derive(Clone)]
pub struct AppState(Rc<AppStateData>);

impl Deref for AppState {
    type Target = AppStateData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AppState {
    /// Connects to the node and indexer named in `config`.
    pub fn new(config: DashboardConfig) -> Self {
        let chain = Rc::new(JsonRpcProvider::new(config.rpc_url.clone()));
        let indexer = Rc::new(GraphIndexer::new(config.indexer_url.clone()));
        Self::with_parts(config, chain, indexer)
    }

    pub fn with_parts(
        config: DashboardConfig,
        chain: Rc<dyn ChainConnection>,
        indexer: Rc<dyn DepositIndexer>,
    ) -> Self {
        Self(Rc::new(AppStateData {
            config,
            chain,
            indexer,
            cache: ContractCache::new(),
        }))
    }
}

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
