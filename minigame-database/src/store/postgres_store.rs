use anyhow::Context as _;
use sqlx::PgPool;

use crate::model::ledger::UserRecord;

#[derive(sqlx::FromRow)]
struct UserLedgerRow {
    command_count: i64,
    coins: i64,
}

#[derive(Clone, Debug)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: u64) -> anyhow::Result<Option<UserRecord>> {
        let row: Option<UserLedgerRow> = sqlx::query_as(
            "SELECT command_count, coins
             FROM user_ledger
             WHERE user_id = $1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to read ledger record for user {user_id}"))?;

        row.map(|row| to_user_record(user_id, row)).transpose()
    }

    pub async fn put(&self, record: &UserRecord) -> anyhow::Result<()> {
        let row = to_row(record)?;

        sqlx::query(
            "INSERT INTO user_ledger (user_id, command_count, coins)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE
             SET command_count = EXCLUDED.command_count, coins = EXCLUDED.coins",
        )
        .bind(record.user_id.to_string())
        .bind(row.command_count)
        .bind(row.coins)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write ledger record for user {}", record.user_id))?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn to_row(record: &UserRecord) -> anyhow::Result<UserLedgerRow> {
    Ok(UserLedgerRow {
        command_count: i64::try_from(record.command_count)
            .context("command_count out of i64 range")?,
        coins: i64::try_from(record.coin_balance).context("coins out of i64 range")?,
    })
}

fn to_user_record(user_id: u64, row: UserLedgerRow) -> anyhow::Result<UserRecord> {
    Ok(UserRecord {
        user_id,
        command_count: u64::try_from(row.command_count)
            .context("command_count row out of u64 range")?,
        coin_balance: u64::try_from(row.coins).context("coins row out of u64 range")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{UserLedgerRow, to_row, to_user_record};
    use crate::model::ledger::UserRecord;

    #[test]
    fn negative_columns_are_rejected() {
        let coins = UserLedgerRow {
            command_count: 2,
            coins: -1,
        };
        assert!(to_user_record(1, coins).is_err());

        let count = UserLedgerRow {
            command_count: -5,
            coins: 0,
        };
        assert!(to_user_record(1, count).is_err());
    }

    #[test]
    fn values_beyond_bigint_are_rejected() {
        let record = UserRecord {
            user_id: 1,
            command_count: 0,
            coin_balance: u64::MAX,
        };
        assert!(to_row(&record).is_err());

        let record = UserRecord {
            user_id: 1,
            command_count: i64::MAX as u64 + 1,
            coin_balance: 0,
        };
        assert!(to_row(&record).is_err());
    }

    #[test]
    fn valid_records_survive_the_row_conversion() {
        let record = UserRecord {
            user_id: 345_678_901_234_567_890,
            command_count: 17,
            coin_balance: i64::MAX as u64,
        };

        let row = to_row(&record).unwrap();
        assert_eq!(row.command_count, 17);
        assert_eq!(row.coins, i64::MAX);
        assert_eq!(to_user_record(record.user_id, row).unwrap(), record);
    }
}
