use anyhow::Context as _;
use tracing::debug;

use crate::database::Database;
use crate::model::ledger::{UserIdentity, UserRecord};

/// Look up the stored record, keeping "never written" distinct from zero.
pub async fn load_record(
    db: &Database,
    identity: &UserIdentity,
) -> anyhow::Result<Option<UserRecord>> {
    if identity.is_bot() {
        return Ok(None);
    }

    db.ledger().get(identity.user_id()).await
}

/// Count one command invocation for the user.
///
/// Reads the whole record and writes it back. A concurrent mutation for the
/// same user between the read and the write is overwritten.
pub async fn record_command(db: &Database, identity: &UserIdentity) -> anyhow::Result<()> {
    if identity.is_bot() {
        return Ok(());
    }

    let current = load_record(db, identity)
        .await?
        .unwrap_or_else(|| UserRecord::empty(identity.user_id()));

    let updated = UserRecord {
        command_count: current
            .command_count
            .checked_add(1)
            .context("command_count overflow")?,
        ..current
    };

    db.ledger().put(&updated).await?;
    debug!(
        user_id = identity.user_id(),
        command_count = updated.command_count,
        "recorded command"
    );

    Ok(())
}

/// Add `amount` coins to the user's balance and return the new balance.
///
/// Same read-modify-write cycle as [`record_command`]. Bots are ignored and
/// report a balance of zero.
pub async fn grant_coins(
    db: &Database,
    identity: &UserIdentity,
    amount: u64,
) -> anyhow::Result<u64> {
    anyhow::ensure!(amount > 0, "coin grant amount must be positive");

    if identity.is_bot() {
        return Ok(0);
    }

    let current = load_record(db, identity)
        .await?
        .unwrap_or_else(|| UserRecord::empty(identity.user_id()));

    let updated = UserRecord {
        coin_balance: current
            .coin_balance
            .checked_add(amount)
            .context("coin balance overflow")?,
        ..current
    };

    db.ledger().put(&updated).await?;
    debug!(
        user_id = identity.user_id(),
        amount,
        coin_balance = updated.coin_balance,
        "granted coins"
    );

    Ok(updated.coin_balance)
}

pub async fn get_command_count(db: &Database, identity: &UserIdentity) -> anyhow::Result<u64> {
    Ok(load_record(db, identity)
        .await?
        .map_or(0, |record| record.command_count))
}

pub async fn get_coin_balance(db: &Database, identity: &UserIdentity) -> anyhow::Result<u64> {
    Ok(load_record(db, identity)
        .await?
        .map_or(0, |record| record.coin_balance))
}

#[cfg(test)]
mod tests {
    use super::{get_coin_balance, get_command_count, grant_coins, load_record, record_command};
    use crate::database::Database;
    use crate::model::ledger::{UserIdentity, UserRecord};

    #[tokio::test]
    async fn unknown_user_has_zero_count_and_balance() {
        let db = Database::in_memory();
        let user = UserIdentity::human(1);

        assert_eq!(load_record(&db, &user).await.unwrap(), None);
        assert_eq!(get_command_count(&db, &user).await.unwrap(), 0);
        assert_eq!(get_coin_balance(&db, &user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn record_command_increments_count_only() {
        let db = Database::in_memory();
        let user = UserIdentity::human(2);
        grant_coins(&db, &user, 12).await.unwrap();

        record_command(&db, &user).await.unwrap();

        assert_eq!(get_command_count(&db, &user).await.unwrap(), 1);
        assert_eq!(get_coin_balance(&db, &user).await.unwrap(), 12);

        record_command(&db, &user).await.unwrap();
        assert_eq!(get_command_count(&db, &user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn grant_coins_adds_exact_amount_and_keeps_count() {
        let db = Database::in_memory();
        let user = UserIdentity::human(3);
        record_command(&db, &user).await.unwrap();

        for amount in [1, 17, 50] {
            let before = get_coin_balance(&db, &user).await.unwrap();
            let after = grant_coins(&db, &user, amount).await.unwrap();
            assert_eq!(after, before + amount);
            assert_eq!(get_coin_balance(&db, &user).await.unwrap(), after);
        }

        assert_eq!(get_command_count(&db, &user).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn zero_grant_is_rejected_without_writing() {
        let db = Database::in_memory();
        let user = UserIdentity::human(4);

        assert!(grant_coins(&db, &user, 0).await.is_err());
        assert_eq!(load_record(&db, &user).await.unwrap(), None);
    }

    #[tokio::test]
    async fn bots_never_touch_the_ledger() {
        let db = Database::in_memory();
        let bot = UserIdentity::bot(5);

        record_command(&db, &bot).await.unwrap();
        assert_eq!(grant_coins(&db, &bot, 10).await.unwrap(), 0);

        assert_eq!(db.ledger().get(5).await.unwrap(), None);
        assert_eq!(get_command_count(&db, &bot).await.unwrap(), 0);
        assert_eq!(get_coin_balance(&db, &bot).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn bot_flag_hides_an_existing_human_record() {
        let db = Database::in_memory();
        grant_coins(&db, &UserIdentity::human(6), 8).await.unwrap();

        assert_eq!(get_coin_balance(&db, &UserIdentity::bot(6)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_grant_and_count_keep_at_least_one_effect() {
        let db = Database::in_memory();
        let user = UserIdentity::human(7);

        let (granted, counted) =
            tokio::join!(grant_coins(&db, &user, 5), record_command(&db, &user));
        granted.unwrap();
        counted.unwrap();

        let balance = get_coin_balance(&db, &user).await.unwrap();
        let count = get_command_count(&db, &user).await.unwrap();
        assert!(balance == 5 || count == 1, "both updates were lost");
        assert!(balance <= 5 && count <= 1);
    }

    #[tokio::test]
    async fn balance_overflow_errs_and_keeps_the_record() {
        let db = Database::in_memory();
        let user = UserIdentity::human(8);
        let full = UserRecord {
            user_id: 8,
            command_count: 3,
            coin_balance: u64::MAX,
        };
        db.ledger().put(&full).await.unwrap();

        assert!(grant_coins(&db, &user, 1).await.is_err());
        assert_eq!(db.ledger().get(8).await.unwrap(), Some(full));
    }

    #[tokio::test]
    async fn command_count_overflow_errs_and_keeps_the_record() {
        let db = Database::in_memory();
        let user = UserIdentity::human(9);
        let full = UserRecord {
            user_id: 9,
            command_count: u64::MAX,
            coin_balance: 14,
        };
        db.ledger().put(&full).await.unwrap();

        assert!(record_command(&db, &user).await.is_err());
        assert_eq!(db.ledger().get(9).await.unwrap(), Some(full));
    }
}
