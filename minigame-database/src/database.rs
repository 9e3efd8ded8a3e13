use sqlx::{PgPool, migrate::Migrator};

use crate::cache::CacheService;
use crate::store::LedgerStore;

/// Compile-time discovered SQLx migrations for the `minigame-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared ledger handle built once at start-up and passed across crates.
#[derive(Clone, Debug)]
pub struct Database {
    ledger: LedgerStore,
    cache: CacheService,
}

impl Database {
    /// Create a database handle backed by Postgres with caching disabled.
    pub fn new(pool: PgPool) -> Self {
        Self::with_cache(LedgerStore::postgres(pool), CacheService::disabled("minigame:prod"))
    }

    /// Create a database handle from a ledger store and cache service.
    pub fn with_cache(ledger: LedgerStore, cache: CacheService) -> Self {
        Self { ledger, cache }
    }

    /// Create a process-local database handle with caching disabled.
    pub fn in_memory() -> Self {
        Self::with_cache(LedgerStore::memory(), CacheService::disabled("minigame:memory"))
    }

    /// Expose the ledger store for query modules.
    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Expose the cache service for query modules.
    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// Release pooled connections. Call once the bot has stopped.
    pub async fn close(&self) {
        self.ledger.close().await;
    }
}
