pub mod leaderboard;
pub mod ledger;
