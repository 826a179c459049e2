//! Deposit records: the on-chain tuple, the indexer's funding status, and
//! the composite record the dashboard displays.

use alloy_primitives::Address;
use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use dioxus_logger::tracing;

use crate::chain::ChainConnection;
use crate::contracts::depositsCall;
use crate::contracts::to_u64;
use crate::error::DashboardError;
use crate::indexer::DepositIndexer;
use crate::indexer::FundingStatus;
use crate::units::DisplayPrecision;
use crate::units::TokenAmount;

/// Shown for the accrued reward until both polled values are known.
pub const ACCRUED_PLACEHOLDER: &str = "0";

/// The fields of the pool's deposit tuple that the dashboard uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnChainDeposit {
    pub owner: Address,
    pub staked_amount: TokenAmount,
    pub unlocked_secondary: TokenAmount,
    pub unlocked_reward: TokenAmount,
    pub indexer_deposit_id: u64,
    pub incentive_reward: TokenAmount,
    pub maturation_timestamp: u64,
    pub withdrawn: bool,
}

impl OnChainDeposit {
    /// Decodes the return data of `deposits(uint256)`.
    pub fn decode(data: &[u8]) -> Result<Self, DashboardError> {
        let ret = depositsCall::abi_decode_returns(data)?;

        Ok(Self {
            owner: ret.owner,
            staked_amount: ret.stakedAmount.into(),
            unlocked_secondary: ret.unlockedSecondary.into(),
            unlocked_reward: ret.unlockedReward.into(),
            indexer_deposit_id: to_u64(ret.indexerDepositId, "indexer deposit id")?,
            incentive_reward: ret.incentiveReward.into(),
            maturation_timestamp: to_u64(ret.maturationTimestamp, "maturation timestamp")?,
            withdrawn: ret.withdrawn,
        })
    }
}

/// A deposit merged with its funding status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositRecord {
    pub owner: Address,
    pub staked_amount: TokenAmount,
    pub unlocked_secondary: TokenAmount,
    pub unlocked_reward: TokenAmount,
    pub indexer_deposit_id: u64,
    pub incentive_reward: TokenAmount,
    /// Unix seconds.
    pub maturation_timestamp: u64,
    pub withdrawn: bool,
    pub active: bool,
    pub funding_id: u64,
}

impl DepositRecord {
    pub fn merge(deposit: OnChainDeposit, funding: FundingStatus) -> Self {
        Self {
            owner: deposit.owner,
            staked_amount: deposit.staked_amount,
            unlocked_secondary: deposit.unlocked_secondary,
            unlocked_reward: deposit.unlocked_reward,
            indexer_deposit_id: deposit.indexer_deposit_id,
            incentive_reward: deposit.incentive_reward,
            maturation_timestamp: deposit.maturation_timestamp,
            withdrawn: deposit.withdrawn,
            active: funding.active,
            funding_id: funding.funding_id,
        }
    }
}

/// Reads deposit `deposit_id` from `pool` and merges in its funding status.
///
/// The indexer is keyed by the deposit's own indexer id and by
/// `indexed_pool`, the address the indexer files the deposits under.
pub async fn find_deposit(
    chain: &dyn ChainConnection,
    indexer: &dyn DepositIndexer,
    pool: &Address,
    deposit_id: u64,
    indexed_pool: &Address,
) -> Result<DepositRecord, DashboardError> {
    let calldata = depositsCall {
        depositId: U256::from(deposit_id),
    }
    .abi_encode();
    let deposit = OnChainDeposit::decode(&chain.call(pool, &calldata).await?)?;

    let funding = indexer
        .funding_status(deposit.indexer_deposit_id, indexed_pool)
        .await?;

    tracing::info!(
        "deposit {} loaded: funding id {}, active {}",
        deposit_id,
        funding.funding_id,
        funding.active
    );
    Ok(DepositRecord::merge(deposit, funding))
}

/// The accrued reward: `earned * total_supply / 10^18`, rounded to the
/// precision's digit count with trailing zeros dropped.
///
/// Returns `ACCRUED_PLACEHOLDER` unless both values are present.
pub fn accrued_reward_display(
    earned: Option<&TokenAmount>,
    total_supply: Option<&TokenAmount>,
    precision: DisplayPrecision,
) -> String {
    match (earned, total_supply) {
        (Some(earned), Some(supply)) => earned.mul_scaled(supply).to_display(precision),
        _ => ACCRUED_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloy_primitives::address;
    use alloy_sol_types::SolValue;

    use super::*;
    use crate::chain::tests::StubChain;
    use crate::indexer::tests::StubIndexer;

    pub(crate) fn pool() -> Address {
        address!("00000000000000000000000000000000000000b0")
    }

    /// Whole tokens given in thousandths, as base units.
    fn tokens(thousandths: u64) -> U256 {
        U256::from(thousandths) * U256::from(10u64).pow(U256::from(15u64))
    }

    pub(crate) fn deposits_calldata(deposit_id: u64) -> Vec<u8> {
        depositsCall {
            depositId: U256::from(deposit_id),
        }
        .abi_encode()
    }

    /// Return data for a deposit with recognisable values in each field.
    pub(crate) fn deposit_tuple() -> Vec<u8> {
        (
            address!("00000000000000000000000000000000000000aa"),
            tokens(100_000),
            tokens(51_500),
            U256::from(11u64),
            tokens(250),
            U256::ZERO,
            U256::from(42u64),
            tokens(3_000),
            U256::ZERO,
            U256::from(1_700_000_000u64),
            true,
        )
            .abi_encode_params()
    }

    #[test]
    fn decodes_the_deposit_tuple() {
        let deposit = OnChainDeposit::decode(&deposit_tuple()).unwrap();
        assert_eq!(deposit.owner, address!("00000000000000000000000000000000000000aa"));
        assert_eq!(deposit.staked_amount.to_string(), "100.0");
        assert_eq!(deposit.unlocked_secondary.to_string(), "51.5");
        assert_eq!(deposit.unlocked_reward.to_string(), "0.25");
        assert_eq!(deposit.indexer_deposit_id, 42);
        assert_eq!(deposit.incentive_reward.to_string(), "3.0");
        assert_eq!(deposit.maturation_timestamp, 1_700_000_000);
        assert!(deposit.withdrawn);
    }

    #[test]
    fn short_tuple_is_rejected() {
        let data = deposit_tuple();
        let err = OnChainDeposit::decode(&data[..32 * 10]).unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn lookup_merges_chain_and_indexer_results() {
        let chain = StubChain::default();
        chain.respond(deposits_calldata(3), deposit_tuple());
        let indexer = StubIndexer(Ok(FundingStatus {
            active: true,
            funding_id: 7,
        }));

        let record = find_deposit(&chain, &indexer, &pool(), 3, &pool())
            .await
            .unwrap();

        assert_eq!(record.funding_id, 7);
        assert!(record.active);
        assert_eq!(record.indexer_deposit_id, 42);
        assert_eq!(record.staked_amount.to_string(), "100.0");
    }

    #[tokio::test]
    async fn lookup_surfaces_typed_failures() {
        let chain = StubChain::default();
        let indexer = StubIndexer(Err(DashboardError::Indexer("down".to_string())));

        let err = find_deposit(&chain, &indexer, &pool(), 3, &pool())
            .await
            .unwrap_err();
        assert!(err.is_contract_read());

        chain.respond(deposits_calldata(3), deposit_tuple());
        let err = find_deposit(&chain, &indexer, &pool(), 3, &pool())
            .await
            .unwrap_err();
        assert_eq!(err, DashboardError::Indexer("down".to_string()));
    }

    #[test]
    fn accrued_needs_both_values() {
        let one = TokenAmount::one();
        let precision = DisplayPrecision::Desktop;
        assert_eq!(accrued_reward_display(None, None, precision), "0");
        assert_eq!(accrued_reward_display(Some(&one), None, precision), "0");
        assert_eq!(accrued_reward_display(None, Some(&one), precision), "0");
    }

    #[test]
    fn accrued_scales_by_precision() {
        let earned = TokenAmount::parse("0.123456789").unwrap();
        let supply = TokenAmount::parse("2").unwrap();

        assert_eq!(
            accrued_reward_display(Some(&earned), Some(&supply), DisplayPrecision::Mobile),
            "0.2469"
        );
        assert_eq!(
            accrued_reward_display(Some(&earned), Some(&supply), DisplayPrecision::Desktop),
            "0.24691358"
        );

        let whole = TokenAmount::parse("1.5").unwrap();
        assert_eq!(
            accrued_reward_display(Some(&whole), Some(&supply), DisplayPrecision::Mobile),
            "3"
        );
    }
}
