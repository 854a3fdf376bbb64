use crate::shared::entity::ID;
use chrono::{DateTime, NaiveDate, Utc};

/// A `ReminderEvent` is a single due notification for a `BillingEntity`,
/// produced by the scheduler and handed to the dispatch layer. It is never
/// persisted itself; only its `DispatchKey` ends up in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEvent {
    pub entity_id: ID,
    pub display_name: String,
    /// The billing occurrence this reminder leads up to
    pub occurrence: NaiveDate,
    /// How many days before `occurrence` this reminder fires
    pub lead_days: u32,
    /// Absolute UTC instant at which this reminder should be delivered
    pub scheduled_at: DateTime<Utc>,
    /// True when `scheduled_at` falls within the current dispatch window,
    /// or has already passed without ever being dispatched
    pub due_now: bool,
}

impl ReminderEvent {
    pub fn dispatch_key(&self) -> DispatchKey {
        DispatchKey {
            entity_id: self.entity_id.clone(),
            occurrence: self.occurrence,
            lead_days: self.lead_days,
        }
    }
}

/// Identifies one occurrence/lead-day combination. A key that has been
/// recorded in the dispatch ledger fires at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    pub entity_id: ID,
    pub occurrence: NaiveDate,
    pub lead_days: u32,
}

/// One row of the dispatch ledger, written after a successful delivery
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    pub key: DispatchKey,
    pub dispatched_at: DateTime<Utc>,
}
