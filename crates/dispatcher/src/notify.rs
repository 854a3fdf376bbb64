use crate::get_due_reminders::UserDueReminders;
use chrono::{DateTime, Utc};
use serde::Serialize;
use subtrack_infra::Config;
use tracing::info;

pub const WEBHOOK_KEY_HEADER: &str = "subtrack-webhook-key";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub entity_id: String,
    pub display_name: String,
    pub occurrence: String,
    pub lead_days: u32,
    pub scheduled_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

/// Payload delivered to the configured webhook, one request per user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRemindersDTO {
    pub user_id: String,
    pub reminders: Vec<ReminderDTO>,
}

impl UserRemindersDTO {
    pub fn new(user_reminders: &UserDueReminders) -> Self {
        Self {
            user_id: user_reminders.user_id.as_string(),
            reminders: user_reminders
                .reminders
                .iter()
                .map(|due| ReminderDTO {
                    entity_id: due.event.entity_id.as_string(),
                    display_name: due.event.display_name.clone(),
                    occurrence: due.event.occurrence.to_string(),
                    lead_days: due.event.lead_days,
                    scheduled_at: due.event.scheduled_at,
                    title: due.message.title.clone(),
                    body: due.message.body.clone(),
                })
                .collect(),
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, payload: &UserRemindersDTO) -> anyhow::Result<()>;
}

/// Pushes due reminders to the surrounding application over a webhook.
/// That application owns the actual email / push delivery.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
    signing_key: String,
}

impl WebhookNotifier {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.webhook_url.clone(),
            signing_key: config.webhook_signing_key.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, payload: &UserRemindersDTO) -> anyhow::Result<()> {
        let url = match &self.url {
            Some(url) => url,
            None => {
                info!(
                    "No webhook configured. Due reminders for user {}: {:?}",
                    payload.user_id, payload.reminders
                );
                return Ok(());
            }
        };

        self.client
            .post(url)
            .header(WEBHOOK_KEY_HEADER, &self.signing_key)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
