pub mod cache;
pub mod cooldown;
pub mod database;
pub mod impls;
pub mod model;
pub mod store;

pub use cache::CacheService;
pub use cooldown::{CooldownCheck, CooldownGate};
pub use database::{Database, MIGRATOR};
pub use model::ledger::{UserIdentity, UserRecord};
pub use store::LedgerStore;
