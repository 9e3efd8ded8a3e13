mod memory_store;
mod postgres_store;

use sqlx::PgPool;

use crate::model::ledger::UserRecord;

use memory_store::MemoryLedgerStore;
use postgres_store::PostgresLedgerStore;

#[derive(Clone, Debug)]
enum LedgerBackend {
    Memory(MemoryLedgerStore),
    Postgres(PostgresLedgerStore),
}

/// Durable storage holding one record per user.
///
/// `put` overwrites the whole record; nothing coordinates a `get` with the
/// `put` that follows it, so the last writer wins.
#[derive(Clone, Debug)]
pub struct LedgerStore {
    backend: LedgerBackend,
}

impl LedgerStore {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            backend: LedgerBackend::Postgres(PostgresLedgerStore::new(pool)),
        }
    }

    /// Process-local store. Contents are lost on restart.
    pub fn memory() -> Self {
        Self {
            backend: LedgerBackend::Memory(MemoryLedgerStore::default()),
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, LedgerBackend::Postgres(_))
    }

    pub async fn get(&self, user_id: u64) -> anyhow::Result<Option<UserRecord>> {
        match &self.backend {
            LedgerBackend::Memory(store) => store.get(user_id).await,
            LedgerBackend::Postgres(store) => store.get(user_id).await,
        }
    }

    pub async fn put(&self, record: &UserRecord) -> anyhow::Result<()> {
        match &self.backend {
            LedgerBackend::Memory(store) => store.put(record).await,
            LedgerBackend::Postgres(store) => store.put(record).await,
        }
    }

    pub async fn close(&self) {
        if let LedgerBackend::Postgres(store) = &self.backend {
            store.close().await;
        }
    }
}
