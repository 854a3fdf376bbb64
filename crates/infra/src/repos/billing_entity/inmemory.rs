use super::IBillingEntityRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use subtrack_domain::{BillingEntity, ID};

pub struct InMemoryBillingEntityRepo {
    entities: Mutex<Vec<BillingEntity>>,
}

impl InMemoryBillingEntityRepo {
    pub fn new() -> Self {
        Self {
            entities: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IBillingEntityRepo for InMemoryBillingEntityRepo {
    async fn insert(&self, entity: &BillingEntity) -> anyhow::Result<()> {
        insert(entity, &self.entities);
        Ok(())
    }

    async fn save(&self, entity: &BillingEntity) -> anyhow::Result<()> {
        save(entity, &self.entities);
        Ok(())
    }

    async fn delete(&self, entity_id: &ID) -> Option<BillingEntity> {
        delete(entity_id, &self.entities)
    }

    async fn find(&self, entity_id: &ID) -> Option<BillingEntity> {
        find(entity_id, &self.entities)
    }

    async fn find_with_upcoming(&self) -> Vec<BillingEntity> {
        let mut entities = find_by(&self.entities, |e| e.next_occurrence.is_some());
        entities.sort_by_key(|e| e.next_occurrence);
        entities
    }
}
