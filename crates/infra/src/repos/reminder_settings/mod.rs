mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderSettingsRepo;
pub use postgres::PostgresReminderSettingsRepo;
use subtrack_domain::{ReminderSettings, ID};

#[async_trait::async_trait]
pub trait IReminderSettingsRepo: Send + Sync {
    async fn insert(&self, settings: &ReminderSettings) -> anyhow::Result<()>;
    async fn save(&self, settings: &ReminderSettings) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<ReminderSettings>;
}
