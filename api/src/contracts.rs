//! Contract interfaces the dashboard reads from.

use alloy_primitives::U256;
use alloy_sol_types::sol;
use alloy_sol_types::SolValue;

use crate::error::DashboardError;

sol! {
    /// Pool getter returning a deposit by index. Words 3, 5 and 8 are not
    /// displayed.
    function deposits(uint256 depositId) external view returns (
        address owner,
        uint256 stakedAmount,
        uint256 unlockedSecondary,
        uint256 word3,
        uint256 unlockedReward,
        uint256 word5,
        uint256 indexerDepositId,
        uint256 incentiveReward,
        uint256 word8,
        uint256 maturationTimestamp,
        bool withdrawn
    );

    /// Reward earned so far by a pool deposit.
    function earned(uint256 depositId) external view returns (uint256);

    /// Total supply of the reward-tracking token.
    function totalSupply() external view returns (uint256);
}

/// Decodes return data holding a single `uint256`.
pub fn decode_uint(data: &[u8]) -> Result<U256, DashboardError> {
    Ok(U256::abi_decode(data)?)
}

/// Narrows a `uint256` that is known to hold an id or a timestamp.
pub fn to_u64(value: U256, field: &str) -> Result<u64, DashboardError> {
    u64::try_from(value)
        .map_err(|_| DashboardError::Decode(format!("{} does not fit in u64: {}", field, value)))
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolCall;

    use super::*;

    #[test]
    fn selectors_match_the_deployed_getters() {
        assert_eq!(totalSupplyCall::SELECTOR, [0x18, 0x16, 0x0d, 0xdd]);
        assert_eq!(earnedCall::SIGNATURE, "earned(uint256)");
        assert_eq!(depositsCall::SIGNATURE, "deposits(uint256)");
    }

    #[test]
    fn calldata_carries_the_deposit_id() {
        let data = depositsCall {
            depositId: U256::from(7),
        }
        .abi_encode();
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[..4], &depositsCall::SELECTOR);
        assert!(data[4..35].iter().all(|b| *b == 0));
        assert_eq!(data[35], 7);
    }

    #[test]
    fn uint_return_data() {
        assert_eq!(decode_uint(&U256::from(256).abi_encode()).unwrap(), U256::from(256));
        assert!(decode_uint(&[0u8; 16]).unwrap_err().is_decode());
    }

    #[test]
    fn narrowing_rejects_large_words() {
        assert_eq!(to_u64(U256::from(42), "id").unwrap(), 42);
        assert!(to_u64(U256::MAX, "id").unwrap_err().is_decode());
    }
}
