use alloy::primitives::Address;
use anyhow::{Context, Result};

use crate::contract::{StreakContract, as_u64};

pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub address: Address,
    pub streak: u64,
}

/// Fetches the contract's parallel address/streak arrays and zips them into
/// entries, preserving fetch order.
pub async fn fetch(contract: &StreakContract) -> Result<Vec<LeaderboardEntry>> {
    let data = contract
        .getLeaderboard()
        .call()
        .await
        .context("leaderboard read failed")?;
    Ok(data
        .users
        .into_iter()
        .zip(data.streaks)
        .map(|(address, streak)| LeaderboardEntry {
            address,
            streak: as_u64(streak),
        })
        .collect())
}

/// Sorts non-increasing by streak and keeps the top ten. The sort is stable,
/// so equal streaks keep their fetch order; that order is not guaranteed.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.streak.cmp(&a.streak));
    entries.truncate(MAX_ENTRIES);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(byte: u8, streak: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            address: Address::repeat_byte(byte),
            streak,
        }
    }

    #[test]
    fn sorted_non_increasing() {
        let ranked = rank(vec![entry(1, 3), entry(2, 9), entry(3, 7)]);
        let streaks: Vec<u64> = ranked.iter().map(|e| e.streak).collect();
        assert_eq!(streaks, vec![9, 7, 3]);
    }

    #[test]
    fn truncates_to_ten() {
        let entries: Vec<_> = (0..25).map(|i| entry(i, u64::from(i))).collect();
        let ranked = rank(entries);
        assert_eq!(ranked.len(), MAX_ENTRIES);
        assert_eq!(ranked[0].streak, 24);
    }

    #[test]
    fn ties_keep_fetch_order() {
        let ranked = rank(vec![entry(1, 5), entry(2, 5), entry(3, 5)]);
        let order: Vec<Address> = ranked.iter().map(|e| e.address).collect();
        assert_eq!(
            order,
            vec![
                Address::repeat_byte(1),
                Address::repeat_byte(2),
                Address::repeat_byte(3)
            ]
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(rank(Vec::new()).is_empty());
    }
}
