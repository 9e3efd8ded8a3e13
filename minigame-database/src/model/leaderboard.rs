use serde::{Deserialize, Serialize};

/// Maximum number of entries shown on a leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

/// Positional tag attached to a leaderboard entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankMarker {
    First,
    Second,
    Third,
    Listed,
}

impl RankMarker {
    /// Marker for a 1-based rank.
    pub const fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Self::First,
            2 => Self::Second,
            3 => Self::Third,
            _ => Self::Listed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub user_id: u64,
    pub coins: u64,
    pub marker: RankMarker,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ranking {
    /// No non-bot member was left to rank.
    NoActiveMembers,
    Ranked(Vec<RankedEntry>),
}

impl Ranking {
    pub fn entries(&self) -> &[RankedEntry] {
        match self {
            Self::NoActiveMembers => &[],
            Self::Ranked(entries) => entries.as_slice(),
        }
    }
}
