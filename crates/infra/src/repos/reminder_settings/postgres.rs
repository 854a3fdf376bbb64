use super::IReminderSettingsRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use subtrack_domain::{ReminderSettings, ID};
use tracing::{error, warn};

pub struct PostgresReminderSettingsRepo {
    pool: PgPool,
}

impl PostgresReminderSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Lead days, time of day and timezone are stored as text. Values that no
/// longer parse (e.g. a timezone identifier retired from the tz database)
/// degrade to the domain fallbacks instead of failing the read.
#[derive(Debug, FromRow)]
struct ReminderSettingsRaw {
    user_uid: Uuid,
    enabled: bool,
    lead_days: String,
    time_of_day: String,
    timezone: String,
}

impl From<ReminderSettingsRaw> for ReminderSettings {
    fn from(raw: ReminderSettingsRaw) -> Self {
        let mut settings = ReminderSettings::new(&raw.user_uid.into());
        settings.enabled = raw.enabled;
        if !settings.set_lead_days(&raw.lead_days) {
            warn!(
                "Stored lead days: {} did not parse in full, keeping {:?}",
                raw.lead_days, settings.lead_days
            );
        }
        if !settings.set_time_of_day(&raw.time_of_day) {
            warn!(
                "Stored time of day: {} is not valid, falling back to {}",
                raw.time_of_day, settings.time_of_day
            );
        }
        if !settings.set_timezone(&raw.timezone) {
            warn!(
                "Stored timezone: {} is not valid, falling back to {}",
                raw.timezone, settings.timezone
            );
        }
        settings
    }
}

fn lead_days_to_string(settings: &ReminderSettings) -> String {
    settings
        .lead_days
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait::async_trait]
impl IReminderSettingsRepo for PostgresReminderSettingsRepo {
    async fn insert(&self, settings: &ReminderSettings) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminder_settings(user_uid, enabled, lead_days, time_of_day, timezone)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(settings.user_id.inner_ref())
        .bind(settings.enabled)
        .bind(lead_days_to_string(settings))
        .bind(settings.time_of_day.format("%H:%M").to_string())
        .bind(settings.timezone.name())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, settings: &ReminderSettings) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_settings
            SET enabled = $2,
            lead_days = $3,
            time_of_day = $4,
            timezone = $5
            WHERE user_uid = $1
            "#,
        )
        .bind(settings.user_id.inner_ref())
        .bind(settings.enabled)
        .bind(lead_days_to_string(settings))
        .bind(settings.time_of_day.format("%H:%M").to_string())
        .bind(settings.timezone.name())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<ReminderSettings> {
        match sqlx::query_as::<_, ReminderSettingsRaw>(
            r#"
            SELECT * FROM reminder_settings AS s
            WHERE s.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(raw) => raw.map(|raw| raw.into()),
            Err(e) => {
                error!("Find reminder settings query failed: {:?}", e);
                None
            }
        }
    }
}
