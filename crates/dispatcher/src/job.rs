use crate::get_due_reminders::{GetDueRemindersUseCase, UserDueReminders};
use crate::notify::{Notifier, UserRemindersDTO};
use crate::record_dispatch::RecordDispatchUseCase;
use crate::shared::usecase::execute;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use subtrack_infra::Context;
use tracing::{error, info};

/// Seconds until the next full minute. Reminder instants have minute
/// granularity, so runs are aligned to the top of the minute.
pub fn secs_until_next_minute(now_ts_millis: i64) -> u64 {
    60 - ((now_ts_millis / 1000) % 60) as u64
}

/// Runs the reminder dispatch loop forever. Every tick computes the due
/// reminders and fans them out; each invocation is bounded, so a slow tick
/// never piles up state beyond possibly duplicated sends, which the ledger
/// upsert absorbs.
pub async fn run_dispatch_job(ctx: Context, notifier: Arc<dyn Notifier>) {
    let now = ctx.sys.now().timestamp_millis();
    tokio::time::sleep(Duration::from_secs(secs_until_next_minute(now))).await;

    let mut interval =
        tokio::time::interval(Duration::from_secs(ctx.config.dispatch_interval_secs));
    loop {
        interval.tick().await;
        let context = ctx.clone();
        let notifier = notifier.clone();
        tokio::spawn(dispatch_due_reminders(context, notifier));
    }
}

/// One dispatch pass: compute due reminders, deliver them per user, and
/// record delivered ones in the ledger. Users are handled independently;
/// one failing delivery does not hold back the others.
pub async fn dispatch_due_reminders(ctx: Context, notifier: Arc<dyn Notifier>) {
    let usecase = GetDueRemindersUseCase {
        window_secs: ctx.config.dispatch_interval_secs as i64,
    };
    let user_reminders = match execute(usecase, &ctx).await {
        Ok(res) => res,
        Err(_) => return,
    };
    if user_reminders.is_empty() {
        return;
    }
    info!(
        "Dispatching reminders for {} user(s) at {}",
        user_reminders.len(),
        ctx.sys.now()
    );

    let deliveries = user_reminders
        .into_iter()
        .map(|user| deliver_for_user(&ctx, notifier.clone(), user));
    join_all(deliveries).await;
}

async fn deliver_for_user(ctx: &Context, notifier: Arc<dyn Notifier>, user: UserDueReminders) {
    let payload = UserRemindersDTO::new(&user);
    match notifier.notify(&payload).await {
        Ok(_) => {
            let delivered = user.reminders.into_iter().map(|due| due.event).collect();
            let usecase = RecordDispatchUseCase { delivered };
            if let Err(e) = execute(usecase, ctx).await {
                error!(
                    "Failed to record dispatched reminders for user {}: {:?}",
                    user.user_id, e
                );
            }
        }
        Err(e) => {
            // Stays out of the ledger, so the next run retries it
            error!(
                "Error delivering reminders to webhook for user {}: {:?}",
                user.user_id, e
            );
        }
    }
}
