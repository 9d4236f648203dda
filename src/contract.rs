use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use alloy::sol;

sol! {
    #[sol(rpc)]
    contract DailyStreak {
        function checkIn() external;
        function getUserData(address user) external view returns (uint256 lastCheckIn, uint256 streak);
        function getLeaderboard() external view returns (address[] memory users, uint256[] memory streaks);
    }
}

pub type StreakContract = DailyStreak::DailyStreakInstance<DynProvider>;

/// Binds the streak contract at `address` to a signing provider.
pub fn bind(address: Address, provider: DynProvider) -> StreakContract {
    DailyStreak::new(address, provider)
}

// Streaks and timestamps fit comfortably in u64; saturate rather than panic
// on a hostile contract response.
pub(crate) fn as_u64(value: U256) -> u64 {
    value.try_into().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturates_oversized_values() {
        assert_eq!(as_u64(U256::from(42u64)), 42);
        assert_eq!(as_u64(U256::MAX), u64::MAX);
    }
}
