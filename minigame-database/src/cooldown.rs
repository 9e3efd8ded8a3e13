use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::warn;

use crate::cache::CacheService;
use crate::model::ledger::UserIdentity;

pub const DEFAULT_GIFT_COOLDOWN: Duration = Duration::from_secs(3600);

/// Rewards that are rate limited per user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RewardKind {
    MysteryBox,
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MysteryBox => f.write_str("mystery_box"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownCheck {
    /// The window was free and is now armed for this user.
    Ready,
    Active { remaining_secs: u64 },
}

/// Per-user gate allowing one use of a reward per window.
///
/// Windows are tracked in process memory and reset on restart, unless the
/// cache is backed by Redis, in which case they live in Redis.
#[derive(Clone, Debug)]
pub struct CooldownGate {
    kind: RewardKind,
    window: Duration,
    armed_at: Arc<Mutex<HashMap<u64, u64>>>,
    cache: CacheService,
}

impl CooldownGate {
    pub fn new(kind: RewardKind, window: Duration, cache: CacheService) -> Self {
        Self {
            kind,
            window,
            armed_at: Arc::default(),
            cache,
        }
    }

    pub fn in_memory(kind: RewardKind, window: Duration) -> Self {
        Self::new(kind, window, CacheService::disabled("minigame:memory"))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm the window for `identity` unless it is still running.
    pub async fn try_acquire(&self, identity: &UserIdentity, now_unix_secs: u64) -> CooldownCheck {
        if self.cache.is_redis_enabled() {
            let key = self.cache_key(identity);
            match self.cache.claim_window(&key, self.window).await {
                Ok(None) => return CooldownCheck::Ready,
                Ok(Some(remaining_secs)) => return CooldownCheck::Active { remaining_secs },
                Err(e) => warn!(
                    ?e,
                    cache_key = %key,
                    "cooldown claim failed; falling back to in-process cooldowns"
                ),
            }
        }

        let window_secs = self.window.as_secs();
        let mut armed_at = self.armed_at.lock().await;

        // Expired windows carry no information; drop them so the map stays bounded.
        armed_at.retain(|_, since| now_unix_secs.saturating_sub(*since) < window_secs);

        if let Some(&since) = armed_at.get(&identity.user_id()) {
            let elapsed = now_unix_secs.saturating_sub(since);
            if elapsed < window_secs {
                return CooldownCheck::Active {
                    remaining_secs: window_secs - elapsed,
                };
            }
        }

        armed_at.insert(identity.user_id(), now_unix_secs);
        CooldownCheck::Ready
    }

    /// Disarm the window, e.g. when the guarded operation failed.
    pub async fn release(&self, identity: &UserIdentity) {
        self.armed_at.lock().await.remove(&identity.user_id());

        if self.cache.is_redis_enabled() {
            let key = self.cache_key(identity);
            if let Err(e) = self.cache.del(&key).await {
                warn!(?e, cache_key = %key, "failed to release cooldown");
            }
        }
    }

    #[cfg(test)]
    async fn tracked_users(&self) -> usize {
        self.armed_at.lock().await.len()
    }

    fn cache_key(&self, identity: &UserIdentity) -> String {
        self.cache
            .key(format!("cooldown:{}:{}", self.kind, identity.user_id()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{CooldownCheck, CooldownGate, DEFAULT_GIFT_COOLDOWN, RewardKind};
    use crate::database::Database;
    use crate::impls::ledger::get_coin_balance;
    use crate::impls::reward::grant_mystery_reward;
    use crate::model::ledger::UserIdentity;

    const START: u64 = 1_700_000_000;

    fn gate() -> CooldownGate {
        CooldownGate::in_memory(RewardKind::MysteryBox, DEFAULT_GIFT_COOLDOWN)
    }

    #[tokio::test]
    async fn second_use_within_window_is_rejected() {
        let gate = gate();
        let user = UserIdentity::human(1);

        assert_eq!(gate.try_acquire(&user, START).await, CooldownCheck::Ready);
        assert_eq!(
            gate.try_acquire(&user, START + 1).await,
            CooldownCheck::Active {
                remaining_secs: 3599
            }
        );
        assert_eq!(
            gate.try_acquire(&user, START + 3599).await,
            CooldownCheck::Active { remaining_secs: 1 }
        );
    }

    #[tokio::test]
    async fn window_reopens_after_expiry() {
        let gate = gate();
        let user = UserIdentity::human(2);

        assert_eq!(gate.try_acquire(&user, START).await, CooldownCheck::Ready);
        assert_eq!(gate.try_acquire(&user, START + 3600).await, CooldownCheck::Ready);
        assert!(matches!(
            gate.try_acquire(&user, START + 3601).await,
            CooldownCheck::Active { .. }
        ));
    }

    #[tokio::test]
    async fn users_are_gated_independently() {
        let gate = gate();

        assert_eq!(
            gate.try_acquire(&UserIdentity::human(3), START).await,
            CooldownCheck::Ready
        );
        assert_eq!(
            gate.try_acquire(&UserIdentity::human(4), START).await,
            CooldownCheck::Ready
        );
    }

    #[tokio::test]
    async fn release_reopens_the_window() {
        let gate = CooldownGate::in_memory(RewardKind::MysteryBox, Duration::from_secs(60));
        let user = UserIdentity::human(5);

        assert_eq!(gate.try_acquire(&user, START).await, CooldownCheck::Ready);
        gate.release(&user).await;
        assert_eq!(gate.try_acquire(&user, START + 1).await, CooldownCheck::Ready);
    }

    #[tokio::test]
    async fn rejected_gift_leaves_balance_untouched() {
        let db = Database::in_memory();
        let gate = gate();
        let user = UserIdentity::human(6);

        assert_eq!(gate.try_acquire(&user, START).await, CooldownCheck::Ready);
        let first = grant_mystery_reward(&db, &user).await.unwrap().unwrap();

        let check = gate.try_acquire(&user, START + 1800).await;
        assert!(matches!(check, CooldownCheck::Active { .. }));
        assert_eq!(get_coin_balance(&db, &user).await.unwrap(), first.amount);

        assert_eq!(gate.try_acquire(&user, START + 3600).await, CooldownCheck::Ready);
        let second = grant_mystery_reward(&db, &user).await.unwrap().unwrap();
        assert_eq!(
            get_coin_balance(&db, &user).await.unwrap(),
            first.amount + second.amount
        );
    }

    #[tokio::test]
    async fn expired_windows_are_forgotten() {
        let gate = gate();

        for user_id in 10..20 {
            gate.try_acquire(&UserIdentity::human(user_id), START).await;
        }
        assert_eq!(gate.tracked_users().await, 10);

        gate.try_acquire(&UserIdentity::human(99), START + 3600)
            .await;
        assert_eq!(gate.tracked_users().await, 1);
    }
}
