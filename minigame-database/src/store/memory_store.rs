use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::ledger::UserRecord;

#[derive(Clone, Debug, Default)]
pub struct MemoryLedgerStore {
    records: Arc<RwLock<HashMap<u64, UserRecord>>>,
}

impl MemoryLedgerStore {
    pub async fn get(&self, user_id: u64) -> anyhow::Result<Option<UserRecord>> {
        Ok(self.records.read().await.get(&user_id).copied())
    }

    pub async fn put(&self, record: &UserRecord) -> anyhow::Result<()> {
        self.records.write().await.insert(record.user_id, *record);
        Ok(())
    }
}
