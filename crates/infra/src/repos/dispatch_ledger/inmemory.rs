use super::IDispatchLedgerRepo;
use crate::repos::shared::repo::DeleteResult;
use std::collections::HashSet;
use std::sync::Mutex;
use subtrack_domain::{DispatchKey, DispatchRecord, ID};

pub struct InMemoryDispatchLedgerRepo {
    records: Mutex<Vec<DispatchRecord>>,
}

impl InMemoryDispatchLedgerRepo {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IDispatchLedgerRepo for InMemoryDispatchLedgerRepo {
    async fn record(&self, record: &DispatchRecord) -> anyhow::Result<()> {
        let mut records = self.records.lock().unwrap();
        if records.iter().all(|r| r.key != record.key) {
            records.push(record.clone());
        }
        Ok(())
    }

    async fn find_for_entities(&self, entity_ids: &[ID]) -> HashSet<DispatchKey> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .filter(|r| entity_ids.contains(&r.key.entity_id))
            .map(|r| r.key.clone())
            .collect()
    }

    async fn delete_for_entity(&self, entity_id: &ID) -> anyhow::Result<DeleteResult> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.key.entity_id != *entity_id);
        Ok(DeleteResult {
            deleted_count: (before - records.len()) as i64,
        })
    }
}
