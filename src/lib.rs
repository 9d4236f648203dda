pub mod checkin;
pub mod config;
pub mod contract;
pub mod cooldown;
pub mod guard;
pub mod leaderboard;
pub mod log;
pub mod session;
pub mod view;
pub mod wallet;
