use super::IDispatchLedgerRepo;
use crate::repos::shared::repo::DeleteResult;
use chrono::NaiveDate;
use sqlx::{types::Uuid, FromRow, PgPool};
use std::collections::HashSet;
use subtrack_domain::{DispatchKey, DispatchRecord, ID};
use tracing::error;

pub struct PostgresDispatchLedgerRepo {
    pool: PgPool,
}

impl PostgresDispatchLedgerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DispatchKeyRaw {
    entity_uid: Uuid,
    occurrence: NaiveDate,
    lead_days: i32,
}

impl From<DispatchKeyRaw> for DispatchKey {
    fn from(raw: DispatchKeyRaw) -> Self {
        Self {
            entity_id: raw.entity_uid.into(),
            occurrence: raw.occurrence,
            lead_days: raw.lead_days as u32,
        }
    }
}

#[async_trait::async_trait]
impl IDispatchLedgerRepo for PostgresDispatchLedgerRepo {
    async fn record(&self, record: &DispatchRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO dispatch_ledger(entity_uid, occurrence, lead_days, dispatched_at)
            VALUES($1, $2, $3, $4)
            ON CONFLICT (entity_uid, occurrence, lead_days) DO NOTHING
            "#,
        )
        .bind(record.key.entity_id.inner_ref())
        .bind(record.key.occurrence)
        .bind(record.key.lead_days as i32)
        .bind(record.dispatched_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_for_entities(&self, entity_ids: &[ID]) -> HashSet<DispatchKey> {
        let ids = entity_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        match sqlx::query_as::<_, DispatchKeyRaw>(
            r#"
            SELECT l.entity_uid, l.occurrence, l.lead_days FROM dispatch_ledger AS l
            WHERE l.entity_uid = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        {
            Ok(rows) => rows.into_iter().map(|raw| raw.into()).collect(),
            Err(e) => {
                error!("Find dispatch ledger rows query failed: {:?}", e);
                HashSet::new()
            }
        }
    }

    async fn delete_for_entity(&self, entity_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM dispatch_ledger AS l
            WHERE l.entity_uid = $1
            "#,
        )
        .bind(entity_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
