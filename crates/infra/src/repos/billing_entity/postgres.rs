use super::IBillingEntityRepo;
use chrono::NaiveDate;
use sqlx::{types::Uuid, FromRow, PgPool};
use subtrack_domain::{BillingEntity, ID};
use tracing::error;

pub struct PostgresBillingEntityRepo {
    pool: PgPool,
}

impl PostgresBillingEntityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BillingEntityRaw {
    entity_uid: Uuid,
    user_uid: Uuid,
    display_name: String,
    next_occurrence: Option<NaiveDate>,
}

impl From<BillingEntityRaw> for BillingEntity {
    fn from(e: BillingEntityRaw) -> Self {
        Self {
            id: e.entity_uid.into(),
            user_id: e.user_uid.into(),
            display_name: e.display_name,
            next_occurrence: e.next_occurrence,
        }
    }
}

#[async_trait::async_trait]
impl IBillingEntityRepo for PostgresBillingEntityRepo {
    async fn insert(&self, entity: &BillingEntity) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO billing_entities(entity_uid, user_uid, display_name, next_occurrence)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(entity.id.inner_ref())
        .bind(entity.user_id.inner_ref())
        .bind(&entity.display_name)
        .bind(entity.next_occurrence)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, entity: &BillingEntity) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE billing_entities
            SET user_uid = $2,
            display_name = $3,
            next_occurrence = $4
            WHERE entity_uid = $1
            "#,
        )
        .bind(entity.id.inner_ref())
        .bind(entity.user_id.inner_ref())
        .bind(&entity.display_name)
        .bind(entity.next_occurrence)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, entity_id: &ID) -> Option<BillingEntity> {
        match sqlx::query_as::<_, BillingEntityRaw>(
            r#"
            DELETE FROM billing_entities AS b
            WHERE b.entity_uid = $1
            RETURNING *
            "#,
        )
        .bind(entity_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        {
            Ok(raw) => Some(raw.into()),
            Err(_) => None,
        }
    }

    async fn find(&self, entity_id: &ID) -> Option<BillingEntity> {
        match sqlx::query_as::<_, BillingEntityRaw>(
            r#"
            SELECT * FROM billing_entities AS b
            WHERE b.entity_uid = $1
            "#,
        )
        .bind(entity_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(raw) => raw.map(|raw| raw.into()),
            Err(e) => {
                error!("Find billing entity query failed: {:?}", e);
                None
            }
        }
    }

    async fn find_with_upcoming(&self) -> Vec<BillingEntity> {
        match sqlx::query_as::<_, BillingEntityRaw>(
            r#"
            SELECT * FROM billing_entities AS b
            WHERE b.next_occurrence IS NOT NULL
            ORDER BY b.next_occurrence
            "#,
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(rows) => rows.into_iter().map(|raw| raw.into()).collect(),
            Err(e) => {
                error!("Find upcoming billing entities query failed: {:?}", e);
                Vec::new()
            }
        }
    }
}
