mod inmemory;
mod postgres;

pub use inmemory::InMemoryBillingEntityRepo;
pub use postgres::PostgresBillingEntityRepo;
use subtrack_domain::{BillingEntity, ID};

#[async_trait::async_trait]
pub trait IBillingEntityRepo: Send + Sync {
    async fn insert(&self, entity: &BillingEntity) -> anyhow::Result<()>;
    async fn save(&self, entity: &BillingEntity) -> anyhow::Result<()>;
    async fn delete(&self, entity_id: &ID) -> Option<BillingEntity>;
    async fn find(&self, entity_id: &ID) -> Option<BillingEntity>;
    /// All entities that have a next occurrence set, across all users
    async fn find_with_upcoming(&self) -> Vec<BillingEntity>;
}

#[cfg(test)]
mod tests {
    use crate::setup_context_inmemory;
    use subtrack_domain::{BillingEntity, ID};

    #[tokio::test]
    async fn test_billing_entity_crud() {
        let ctx = setup_context_inmemory();

        let user_id = ID::default();
        let mut entity = BillingEntity::new(&user_id, "Netflix");
        ctx.repos
            .billing_entities
            .insert(&entity)
            .await
            .expect("To insert billing entity");

        // No occurrence yet, so not upcoming
        assert!(ctx.repos.billing_entities.find_with_upcoming().await.is_empty());

        entity.next_occurrence = Some("2024-06-10".parse().unwrap());
        ctx.repos
            .billing_entities
            .save(&entity)
            .await
            .expect("To save billing entity");

        let found = ctx
            .repos
            .billing_entities
            .find(&entity.id)
            .await
            .expect("To find billing entity");
        assert_eq!(found, entity);
        assert_eq!(
            ctx.repos.billing_entities.find_with_upcoming().await,
            vec![entity.clone()]
        );

        let deleted = ctx.repos.billing_entities.delete(&entity.id).await;
        assert_eq!(deleted, Some(entity.clone()));
        assert!(ctx.repos.billing_entities.find(&entity.id).await.is_none());
    }
}
