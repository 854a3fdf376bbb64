mod get_due_reminders;
mod job;
mod notify;
mod record_dispatch;
mod shared;

pub use get_due_reminders::{DueReminder, GetDueRemindersUseCase, UserDueReminders};
use job::run_dispatch_job;
pub use job::dispatch_due_reminders;
pub use notify::{Notifier, ReminderDTO, UserRemindersDTO, WebhookNotifier};
pub use record_dispatch::RecordDispatchUseCase;
pub use shared::usecase::{execute, UseCase};
use std::sync::Arc;
use subtrack_infra::Context;

pub struct Application {
    context: Context,
}

impl Application {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    /// Runs the dispatch job until the process is stopped
    pub async fn start(self) {
        let notifier = Arc::new(WebhookNotifier::new(&self.context.config));
        run_dispatch_job(self.context, notifier).await
    }
}
