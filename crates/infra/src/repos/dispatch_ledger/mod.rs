mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
pub use inmemory::InMemoryDispatchLedgerRepo;
pub use postgres::PostgresDispatchLedgerRepo;
use std::collections::HashSet;
use subtrack_domain::{DispatchKey, DispatchRecord, ID};

#[async_trait::async_trait]
pub trait IDispatchLedgerRepo: Send + Sync {
    /// Records a delivered reminder. Recording the same key twice is a
    /// no-op so that overlapping job runs can safely retry.
    async fn record(&self, record: &DispatchRecord) -> anyhow::Result<()>;
    async fn find_for_entities(&self, entity_ids: &[ID]) -> HashSet<DispatchKey>;
    /// Removes ledger rows when the owning entity is deleted
    async fn delete_for_entity(&self, entity_id: &ID) -> anyhow::Result<DeleteResult>;
}
