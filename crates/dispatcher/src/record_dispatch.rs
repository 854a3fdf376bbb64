use crate::shared::usecase::UseCase;
use subtrack_domain::{DispatchRecord, ReminderEvent};
use subtrack_infra::Context;

/// Marks delivered reminders in the dispatch ledger. Run by the dispatch
/// job after a successful delivery; a reminder that never reaches this
/// point is picked up again by the next run.
#[derive(Debug)]
pub struct RecordDispatchUseCase {
    pub delivered: Vec<ReminderEvent>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait]
impl UseCase for RecordDispatchUseCase {
    type Response = usize;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Errors> {
        let dispatched_at = ctx.sys.now();
        for event in &self.delivered {
            let record = DispatchRecord {
                key: event.dispatch_key(),
                dispatched_at,
            };
            ctx.repos
                .dispatch_ledger
                .record(&record)
                .await
                .map_err(|_| UseCaseErrors::StorageError)?;
        }
        Ok(self.delivered.len())
    }
}
