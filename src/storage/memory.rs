use async_trait::async_trait;
use std::error::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::contact::ContactRecord;
use super::ContactStore;

/// Process-local store for local runs and tests. Records are never evicted,
/// so it is not meant for long-running deployments.
#[derive(Default)]
pub struct MemoryContactStore {
    records: Mutex<Vec<(String, ContactRecord)>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<(String, ContactRecord)> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn insert(
        &self,
        record: &ContactRecord
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let id = Uuid::new_v4().to_string();
        self.records.lock().await.push((id.clone(), record.clone()));
        Ok(Some(id))
    }
}
