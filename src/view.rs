use alloy::primitives::Address;
use std::fmt::Write;

use crate::leaderboard::LeaderboardEntry;

pub const STATUS_INITIALIZING: &str = "Initializing...";
pub const STATUS_SWITCHING: &str = "Switching to Arc...";
pub const STATUS_READY: &str = "Ready to streak!";
pub const STATUS_MAINTAIN: &str = "Maintain your streak";
pub const STATUS_COOLDOWN: &str = "Cooldown Active";
pub const STATUS_CONFIRMING: &str = "Confirming...";
pub const STATUS_VERIFYING: &str = "Verifying...";
pub const STATUS_UPDATED: &str = "Streak Updated!";
pub const STATUS_TX_FAILED: &str = "Transaction Failed";
pub const STATUS_CONNECT_FAILED: &str = "Connection failed";
pub const INSTALL_HINT: &str = "No wallet key found. Set PRIVATE_KEY in the environment or .env file.";

pub const LABEL_CLAIM: &str = "Claim Daily Check-In";
pub const LABEL_COME_BACK: &str = "Come Back Tomorrow";

pub const EMPTY_STATE: &str = "No streaks yet. Be the first!";
pub const LOAD_FAILED: &str = "Failed to load";

/// First 6 + last 4 characters of the checksummed address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Medals for the podium, numerals below it.
pub fn rank_marker(index: usize) -> String {
    match index {
        0 => "\u{1f947}".to_string(),
        1 => "\u{1f948}".to_string(),
        2 => "\u{1f949}".to_string(),
        _ => (index + 1).to_string(),
    }
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return format!("  {}\n", EMPTY_STATE);
    }
    let mut out = String::new();
    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:<4} {:<16} {}",
            rank_marker(index),
            short_address(&entry.address),
            entry.streak
        );
    }
    out
}

pub fn render_leaderboard_error() -> String {
    format!("  {}\n", LOAD_FAILED)
}
