//! Dashboard settings read from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use dioxus_logger::tracing;
use itertools::Itertools;

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
const DEFAULT_INDEXER_URL: &str =
    "https://api.thegraph.com/subgraphs/name/bacon-labs/eighty-eight-mph";
const DEFAULT_REWARD_TEXT: &str = "DEBASE";
const DEFAULT_POLL_SECS: u64 = 12;
const DEFAULT_MOBILE_MAX_WIDTH: u32 = 482;

/// Looks a setting up in the runtime environment first, then in the
/// environment the crate was compiled in. Browser builds have no runtime
/// environment, so they only see the latter.
macro_rules! setting {
    ($name:literal) => {
        lookup($name, option_env!($name))
    };
}

/// Everything the dashboard needs to know about where to read from and what
/// to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// JSON-RPC endpoint of the chain node.
    pub rpc_url: String,
    /// GraphQL endpoint of the deposit indexer.
    pub indexer_url: String,
    /// Address the indexer files deposits under. `None` uses each panel's pool.
    pub indexed_pool: Option<Address>,
    pub pool_address: Address,
    pub reward_token_address: Address,
    pub reward_text: String,
    pub reward_image: String,
    /// Deposits to show, one panel each.
    pub deposit_ids: Vec<u64>,
    /// How often the node is asked for a new block.
    pub poll_interval: Duration,
    /// Viewports at most this wide use the mobile layout.
    pub mobile_max_width_px: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            indexer_url: DEFAULT_INDEXER_URL.to_string(),
            indexed_pool: None,
            pool_address: Address::ZERO,
            reward_token_address: Address::ZERO,
            reward_text: DEFAULT_REWARD_TEXT.to_string(),
            reward_image: String::new(),
            deposit_ids: vec![1],
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            mobile_max_width_px: DEFAULT_MOBILE_MAX_WIDTH,
        }
    }
}

impl DashboardConfig {
    /// Creates a config from environment variables, falling back to the
    /// in-code defaults for anything unset or invalid.
    ///
    /// # Environment Variables
    /// - `DEPOSIT_DASH_RPC_URL`: chain node JSON-RPC url.
    /// - `DEPOSIT_DASH_INDEXER_URL`: indexer GraphQL url.
    /// - `DEPOSIT_DASH_INDEXED_POOL`: address the indexer keys deposits by.
    /// - `DEPOSIT_DASH_POOL_ADDRESS`: pool contract.
    /// - `DEPOSIT_DASH_REWARD_TOKEN_ADDRESS`: reward-tracking token contract.
    /// - `DEPOSIT_DASH_REWARD_TEXT`: token symbol shown next to values.
    /// - `DEPOSIT_DASH_REWARD_IMAGE`: token icon url.
    /// - `DEPOSIT_DASH_DEPOSIT_IDS`: comma separated deposit ids.
    /// - `DEPOSIT_DASH_POLL_SECS`: block poll interval in seconds.
    /// - `DEPOSIT_DASH_MOBILE_MAX_WIDTH`: mobile breakpoint in pixels.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let deposit_ids = setting!("DEPOSIT_DASH_DEPOSIT_IDS")
            .map(|raw| parse_ids(&raw))
            .filter(|ids| !ids.is_empty())
            .unwrap_or(defaults.deposit_ids);

        Self {
            rpc_url: setting!("DEPOSIT_DASH_RPC_URL").unwrap_or(defaults.rpc_url),
            indexer_url: setting!("DEPOSIT_DASH_INDEXER_URL").unwrap_or(defaults.indexer_url),
            indexed_pool: setting!("DEPOSIT_DASH_INDEXED_POOL")
                .and_then(|raw| parse_or_warn("DEPOSIT_DASH_INDEXED_POOL", &raw)),
            pool_address: parsed(
                "DEPOSIT_DASH_POOL_ADDRESS",
                setting!("DEPOSIT_DASH_POOL_ADDRESS"),
                defaults.pool_address,
            ),
            reward_token_address: parsed(
                "DEPOSIT_DASH_REWARD_TOKEN_ADDRESS",
                setting!("DEPOSIT_DASH_REWARD_TOKEN_ADDRESS"),
                defaults.reward_token_address,
            ),
            reward_text: setting!("DEPOSIT_DASH_REWARD_TEXT").unwrap_or(defaults.reward_text),
            reward_image: setting!("DEPOSIT_DASH_REWARD_IMAGE").unwrap_or(defaults.reward_image),
            deposit_ids,
            poll_interval: Duration::from_secs(parsed(
                "DEPOSIT_DASH_POLL_SECS",
                setting!("DEPOSIT_DASH_POLL_SECS"),
                DEFAULT_POLL_SECS,
            ))
            .max(Duration::from_secs(1)),
            mobile_max_width_px: parsed(
                "DEPOSIT_DASH_MOBILE_MAX_WIDTH",
                setting!("DEPOSIT_DASH_MOBILE_MAX_WIDTH"),
                defaults.mobile_max_width_px,
            ),
        }
    }

    /// The address to query the indexer with for deposits of `pool`.
    pub fn indexed_pool_or(&self, pool: Address) -> Address {
        self.indexed_pool.unwrap_or(pool)
    }
}

fn lookup(name: &str, compiled: Option<&'static str>) -> Option<String> {
    env::var(name)
        .ok()
        .or_else(|| compiled.map(str::to_owned))
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

fn parse_or_warn<T>(name: &str, raw: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("ignoring {}={:?}: {}", name, raw, e);
            None
        }
    }
}

fn parsed<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    raw.and_then(|raw| parse_or_warn(name, &raw))
        .unwrap_or(default)
}

/// Each id once, in first-seen order; cards are keyed by id.
fn parse_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| parse_or_warn::<u64>("DEPOSIT_DASH_DEPOSIT_IDS", s))
        .unique()
        .collect()
}
