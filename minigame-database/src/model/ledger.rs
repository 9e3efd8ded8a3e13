use serde::{Deserialize, Serialize};

/// A chat user as seen by the ledger.
///
/// The bot flag is fixed at construction; every ledger operation consults it
/// instead of inspecting the platform user again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserIdentity {
    user_id: u64,
    is_bot: bool,
}

impl UserIdentity {
    pub const fn new(user_id: u64, is_bot: bool) -> Self {
        Self { user_id, is_bot }
    }

    pub const fn human(user_id: u64) -> Self {
        Self::new(user_id, false)
    }

    pub const fn bot(user_id: u64) -> Self {
        Self::new(user_id, true)
    }

    pub const fn user_id(&self) -> u64 {
        self.user_id
    }

    pub const fn is_bot(&self) -> bool {
        self.is_bot
    }
}

/// Persisted usage and balance for one user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: u64,
    pub command_count: u64,
    pub coin_balance: u64,
}

impl UserRecord {
    /// The record a user has before anything was ever written for them.
    pub const fn empty(user_id: u64) -> Self {
        Self {
            user_id,
            command_count: 0,
            coin_balance: 0,
        }
    }
}
