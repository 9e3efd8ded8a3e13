use std::cmp::Reverse;
use std::collections::BTreeSet;

use tracing::debug;

use crate::database::Database;
use crate::impls::ledger::get_coin_balance;
use crate::model::leaderboard::{LEADERBOARD_SIZE, RankMarker, RankedEntry, Ranking};
use crate::model::ledger::UserIdentity;

/// Rank the non-bot members by coin balance.
///
/// Reads every member's balance from the ledger on each call. Equal balances
/// are ordered by ascending user id. A member listed twice is read once.
pub async fn rank_members(db: &Database, members: &[UserIdentity]) -> anyhow::Result<Ranking> {
    let user_ids: BTreeSet<u64> = members
        .iter()
        .filter(|member| !member.is_bot())
        .map(UserIdentity::user_id)
        .collect();

    let mut balances = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        let coins = get_coin_balance(db, &UserIdentity::human(user_id)).await?;
        balances.push((user_id, coins));
    }

    Ok(rank_balances(balances))
}

/// Same as [`rank_members`], but reuses a ranking computed for the guild
/// within the cache TTL when a shared cache is configured.
pub async fn rank_members_cached(
    db: &Database,
    guild_id: u64,
    members: &[UserIdentity],
) -> anyhow::Result<Ranking> {
    let cache = db.cache();
    let key = leaderboard_cache_key(db, guild_id);

    cache
        .get_or_load_json(&key, cache.leaderboard_ttl(), || async {
            debug!(guild_id, members = members.len(), "computing leaderboard");
            rank_members(db, members).await
        })
        .await
}

pub fn leaderboard_cache_key(db: &Database, guild_id: u64) -> String {
    db.cache().key(format!("leaderboard:{guild_id}"))
}

fn rank_balances(mut balances: Vec<(u64, u64)>) -> Ranking {
    balances.sort_unstable_by_key(|&(user_id, coins)| (Reverse(coins), user_id));
    balances.truncate(LEADERBOARD_SIZE);

    if balances.is_empty() {
        return Ranking::NoActiveMembers;
    }

    let entries = balances
        .into_iter()
        .enumerate()
        .map(|(index, (user_id, coins))| {
            let rank = index + 1;
            RankedEntry {
                rank,
                user_id,
                coins,
                marker: RankMarker::for_rank(rank),
            }
        })
        .collect();

    Ranking::Ranked(entries)
}

#[cfg(test)]
mod tests {
    use super::{rank_balances, rank_members, rank_members_cached};
    use crate::database::Database;
    use crate::impls::ledger::grant_coins;
    use crate::model::leaderboard::{RankMarker, Ranking};
    use crate::model::ledger::UserIdentity;

    async fn seed(db: &Database, user_id: u64, coins: u64) -> UserIdentity {
        let user = UserIdentity::human(user_id);
        if coins > 0 {
            grant_coins(db, &user, coins).await.unwrap();
        }
        user
    }

    fn ranked_ids(ranking: &Ranking) -> Vec<u64> {
        ranking.entries().iter().map(|entry| entry.user_id).collect()
    }

    #[tokio::test]
    async fn equal_balances_fall_back_to_user_id_order() {
        let db = Database::in_memory();
        let c = seed(&db, 3, 10).await;
        let b = seed(&db, 2, 30).await;
        let a = seed(&db, 1, 30).await;

        let ranking = rank_members(&db, &[c, b, a]).await.unwrap();

        assert_eq!(ranked_ids(&ranking), vec![1, 2, 3]);
        let coins: Vec<u64> = ranking.entries().iter().map(|entry| entry.coins).collect();
        assert_eq!(coins, vec![30, 30, 10]);
    }

    #[tokio::test]
    async fn bots_are_never_ranked() {
        let db = Database::in_memory();
        let human = seed(&db, 20, 5).await;
        grant_coins(&db, &UserIdentity::human(21), 500).await.unwrap();

        let ranking = rank_members(&db, &[UserIdentity::bot(21), human])
            .await
            .unwrap();

        assert_eq!(ranked_ids(&ranking), vec![20]);
    }

    #[tokio::test]
    async fn only_bots_yields_no_active_members() {
        let db = Database::in_memory();

        let ranking = rank_members(&db, &[UserIdentity::bot(1), UserIdentity::bot(2)])
            .await
            .unwrap();
        assert_eq!(ranking, Ranking::NoActiveMembers);

        let empty = rank_members(&db, &[]).await.unwrap();
        assert_eq!(empty, Ranking::NoActiveMembers);
    }

    #[tokio::test]
    async fn members_without_records_rank_with_zero() {
        let db = Database::in_memory();
        let rich = seed(&db, 9, 4).await;

        let ranking = rank_members(&db, &[UserIdentity::human(8), rich])
            .await
            .unwrap();

        assert_eq!(ranked_ids(&ranking), vec![9, 8]);
        assert_eq!(ranking.entries()[1].coins, 0);
    }

    #[tokio::test]
    async fn keeps_top_ten_sorted_descending() {
        let db = Database::in_memory();
        let mut members = Vec::new();
        for user_id in 1..=15 {
            members.push(seed(&db, user_id, user_id * 3).await);
        }
        members.push(UserIdentity::bot(99));

        let ranking = rank_members(&db, &members).await.unwrap();
        let entries = ranking.entries();

        assert_eq!(entries.len(), 10);
        assert!(entries.windows(2).all(|pair| pair[0].coins >= pair[1].coins));
        assert_eq!(entries[0].user_id, 15);
        assert_eq!(entries[9].user_id, 6);
        assert!(entries.iter().all(|entry| entry.user_id != 99));
    }

    #[tokio::test]
    async fn ranks_and_markers_follow_position() {
        let db = Database::in_memory();
        let mut members = Vec::new();
        for user_id in 1..=5 {
            members.push(seed(&db, user_id, 100 - user_id).await);
        }

        let ranking = rank_members(&db, &members).await.unwrap();
        let markers: Vec<RankMarker> = ranking.entries().iter().map(|entry| entry.marker).collect();
        let ranks: Vec<usize> = ranking.entries().iter().map(|entry| entry.rank).collect();

        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            markers,
            vec![
                RankMarker::First,
                RankMarker::Second,
                RankMarker::Third,
                RankMarker::Listed,
                RankMarker::Listed,
            ]
        );
    }

    #[tokio::test]
    async fn ranking_is_independent_of_member_order() {
        let db = Database::in_memory();
        let mut members = Vec::new();
        for user_id in [40, 10, 30, 20, 50] {
            members.push(seed(&db, user_id, 7).await);
        }

        let forward = rank_members(&db, &members).await.unwrap();
        members.reverse();
        let backward = rank_members(&db, &members).await.unwrap();

        assert_eq!(forward, backward);
        assert_eq!(ranked_ids(&forward), vec![10, 20, 30, 40, 50]);
    }

    #[tokio::test]
    async fn disabled_cache_reflects_new_balances_immediately() {
        let db = Database::in_memory();
        let a = seed(&db, 1, 10).await;
        let b = seed(&db, 2, 5).await;

        let before = rank_members_cached(&db, 77, &[a, b]).await.unwrap();
        assert_eq!(ranked_ids(&before), vec![1, 2]);

        grant_coins(&db, &b, 20).await.unwrap();
        let after = rank_members_cached(&db, 77, &[a, b]).await.unwrap();
        assert_eq!(ranked_ids(&after), vec![2, 1]);
    }

    #[tokio::test]
    async fn duplicate_members_are_listed_once() {
        let db = Database::in_memory();
        let a = seed(&db, 4, 10).await;
        let b = seed(&db, 2, 1).await;

        let ranking = rank_members(&db, &[a, b, a, a]).await.unwrap();

        assert_eq!(ranked_ids(&ranking), vec![4, 2]);
    }

    #[test]
    fn ties_sort_by_user_id_regardless_of_input_order() {
        let ranking = rank_balances(vec![(9, 5), (3, 5), (6, 8)]);
        assert_eq!(ranked_ids(&ranking), vec![6, 3, 9]);
    }
}
