use crate::shared::usecase::UseCase;
use chrono::Duration;
use std::collections::HashMap;
use subtrack_domain::{
    compute_due_reminders, BillingEntity, ReminderEvent, ReminderMessage, ID,
};
use subtrack_infra::Context;

/// Computes every reminder whose fire instant falls within the upcoming
/// dispatch window (or was missed entirely), grouped by the user that
/// should receive them.
#[derive(Debug)]
pub struct GetDueRemindersUseCase {
    /// Width of the half-open due window in seconds
    pub window_secs: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DueReminder {
    pub event: ReminderEvent,
    pub message: ReminderMessage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDueReminders {
    pub user_id: ID,
    pub reminders: Vec<DueReminder>,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait]
impl UseCase for GetDueRemindersUseCase {
    type Response = Vec<UserDueReminders>;

    type Errors = UseCaseErrors;

    /// This runs once per dispatch interval
    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.now();
        let window = Duration::seconds(self.window_secs);

        let upcoming = ctx.repos.billing_entities.find_with_upcoming().await;

        let mut entities_by_user: HashMap<ID, Vec<BillingEntity>> = HashMap::new();
        for entity in upcoming {
            entities_by_user
                .entry(entity.user_id.clone())
                .or_insert_with(Vec::new)
                .push(entity);
        }

        let mut user_reminders = Vec::new();
        for (user_id, entities) in entities_by_user {
            // Disabled or missing settings mean nothing to do for this user
            let settings = match ctx.repos.reminder_settings.find(&user_id).await {
                Some(settings) if settings.enabled => settings,
                _ => continue,
            };

            let entity_ids = entities.iter().map(|e| e.id.clone()).collect::<Vec<_>>();
            let dispatched = ctx.repos.dispatch_ledger.find_for_entities(&entity_ids).await;

            let events = compute_due_reminders(&entities, &settings, &dispatched, now, window);
            if events.is_empty() {
                continue;
            }

            let reminders = events
                .into_iter()
                .map(|event| DueReminder {
                    message: ReminderMessage::new(&event),
                    event,
                })
                .collect();
            user_reminders.push(UserDueReminders { user_id, reminders });
        }

        // HashMap iteration order is not deterministic, the output should be
        user_reminders.sort_by(|u1, u2| u1.user_id.cmp(&u2.user_id));
        Ok(user_reminders)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::{DateTime, Utc};
    use std::sync::Arc;
    use subtrack_domain::{ReminderSettings, DispatchKey, DispatchRecord};
    use subtrack_infra::{setup_context_inmemory, ISys};

    struct StaticTimeSys(DateTime<Utc>);
    impl ISys for StaticTimeSys {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn instant(timestr: &str) -> DateTime<Utc> {
        timestr.parse().expect("Valid instant")
    }

    async fn insert_user_with_subscription(ctx: &Context) -> (ID, BillingEntity) {
        let user_id = ID::default();
        let mut settings = ReminderSettings::new(&user_id);
        settings.enabled = true;
        settings.lead_days = vec![7, 3, 1, 0];
        ctx.repos
            .reminder_settings
            .insert(&settings)
            .await
            .expect("To insert settings");

        let mut entity = BillingEntity::new(&user_id, "Netflix");
        entity.next_occurrence = Some("2024-06-10".parse().unwrap());
        ctx.repos
            .billing_entities
            .insert(&entity)
            .await
            .expect("To insert billing entity");

        (user_id, entity)
    }

    #[tokio::test]
    async fn finds_due_reminders_for_enabled_users() {
        let mut ctx = setup_context_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(instant("2024-06-03T09:00:00Z")));

        let (user_id, entity) = insert_user_with_subscription(&ctx).await;

        let usecase = GetDueRemindersUseCase { window_secs: 300 };
        let res = execute(usecase, &ctx).await.expect("To execute usecase");
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].user_id, user_id);
        assert_eq!(res[0].reminders.len(), 1);

        let due = &res[0].reminders[0];
        assert_eq!(due.event.entity_id, entity.id);
        assert_eq!(due.event.lead_days, 7);
        assert_eq!(due.message.body, "Netflix renews in 7 days (2024-06-10)");
    }

    #[tokio::test]
    async fn skips_users_without_settings() {
        let mut ctx = setup_context_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(instant("2024-06-03T09:00:00Z")));

        let mut entity = BillingEntity::new(&ID::default(), "Netflix");
        entity.next_occurrence = Some("2024-06-10".parse().unwrap());
        ctx.repos
            .billing_entities
            .insert(&entity)
            .await
            .expect("To insert billing entity");

        let usecase = GetDueRemindersUseCase { window_secs: 300 };
        let res = execute(usecase, &ctx).await.expect("To execute usecase");
        assert!(res.is_empty());
    }

    #[tokio::test]
    async fn skips_reminders_already_in_the_ledger() {
        let mut ctx = setup_context_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(instant("2024-06-03T09:00:00Z")));

        let (_, entity) = insert_user_with_subscription(&ctx).await;
        ctx.repos
            .dispatch_ledger
            .record(&DispatchRecord {
                key: DispatchKey {
                    entity_id: entity.id.clone(),
                    occurrence: "2024-06-10".parse().unwrap(),
                    lead_days: 7,
                },
                dispatched_at: instant("2024-06-03T09:00:00Z"),
            })
            .await
            .expect("To record dispatch");

        let usecase = GetDueRemindersUseCase { window_secs: 300 };
        let res = execute(usecase, &ctx).await.expect("To execute usecase");
        assert!(res.is_empty());
    }
}
