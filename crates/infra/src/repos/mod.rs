mod billing_entity;
mod dispatch_ledger;
mod reminder_settings;
mod shared;

pub use billing_entity::IBillingEntityRepo;
use billing_entity::{InMemoryBillingEntityRepo, PostgresBillingEntityRepo};
pub use dispatch_ledger::IDispatchLedgerRepo;
use dispatch_ledger::{InMemoryDispatchLedgerRepo, PostgresDispatchLedgerRepo};
pub use reminder_settings::IReminderSettingsRepo;
use reminder_settings::{InMemoryReminderSettingsRepo, PostgresReminderSettingsRepo};
pub use shared::repo::DeleteResult;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub billing_entities: Arc<dyn IBillingEntityRepo>,
    pub reminder_settings: Arc<dyn IReminderSettingsRepo>,
    pub dispatch_ledger: Arc<dyn IDispatchLedgerRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            billing_entities: Arc::new(PostgresBillingEntityRepo::new(pool.clone())),
            reminder_settings: Arc::new(PostgresReminderSettingsRepo::new(pool.clone())),
            dispatch_ledger: Arc::new(PostgresDispatchLedgerRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            billing_entities: Arc::new(InMemoryBillingEntityRepo::new()),
            reminder_settings: Arc::new(InMemoryReminderSettingsRepo::new()),
            dispatch_ledger: Arc::new(InMemoryDispatchLedgerRepo::new()),
        }
    }
}
