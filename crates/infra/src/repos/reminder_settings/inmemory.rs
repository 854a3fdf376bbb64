use super::IReminderSettingsRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use subtrack_domain::{ReminderSettings, ID};

pub struct InMemoryReminderSettingsRepo {
    settings: Mutex<Vec<ReminderSettings>>,
}

impl InMemoryReminderSettingsRepo {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderSettingsRepo for InMemoryReminderSettingsRepo {
    async fn insert(&self, settings: &ReminderSettings) -> anyhow::Result<()> {
        insert(settings, &self.settings);
        Ok(())
    }

    async fn save(&self, settings: &ReminderSettings) -> anyhow::Result<()> {
        save(settings, &self.settings);
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<ReminderSettings> {
        find(user_id, &self.settings)
    }
}
