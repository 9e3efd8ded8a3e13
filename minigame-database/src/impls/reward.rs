use std::ops::RangeInclusive;

use rand::Rng;
use tracing::info;

use crate::database::Database;
use crate::impls::ledger::grant_coins;
use crate::model::ledger::UserIdentity;

/// Inclusive bounds of a mystery box reward.
pub const MYSTERY_REWARD_RANGE: RangeInclusive<u64> = 1..=50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MysteryReward {
    pub amount: u64,
    pub new_balance: u64,
}

pub fn draw_reward<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(MYSTERY_REWARD_RANGE)
}

/// Open a mystery box for the user.
///
/// Rate limiting is the caller's job; this grants on every call. Bots get
/// `None` and no reward is drawn.
pub async fn grant_mystery_reward(
    db: &Database,
    identity: &UserIdentity,
) -> anyhow::Result<Option<MysteryReward>> {
    if identity.is_bot() {
        return Ok(None);
    }

    let amount = draw_reward(&mut rand::thread_rng());
    grant_drawn_reward(db, identity, amount).await.map(Some)
}

async fn grant_drawn_reward(
    db: &Database,
    identity: &UserIdentity,
    amount: u64,
) -> anyhow::Result<MysteryReward> {
    let new_balance = grant_coins(db, identity, amount).await?;
    info!(
        user_id = identity.user_id(),
        amount, new_balance, "mystery box opened"
    );

    Ok(MysteryReward {
        amount,
        new_balance,
    })
}
