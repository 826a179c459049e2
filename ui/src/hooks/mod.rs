pub mod use_block_subscription;
pub mod use_block_watcher;
pub mod use_chain_checker;
pub mod use_contract_call;
pub mod use_deposit_lookup;
pub mod use_is_mobile;
