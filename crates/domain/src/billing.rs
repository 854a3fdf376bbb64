use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;

/// A `BillingEntity` represents one recurring obligation, e.g. a
/// subscription. It carries at most one future billing date at a time;
/// `next_occurrence` is advanced by the surrounding application after
/// each billing cycle and is never mutated here.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingEntity {
    pub id: ID,
    /// The user that owns this obligation and should receive reminders for it
    pub user_id: ID,
    /// Used when rendering reminder messages
    pub display_name: String,
    /// The next calendar date this entity bills. Entities without one are
    /// skipped by the scheduler.
    pub next_occurrence: Option<NaiveDate>,
}

impl BillingEntity {
    pub fn new(user_id: &ID, display_name: &str) -> Self {
        Self {
            id: Default::default(),
            user_id: user_id.clone(),
            display_name: display_name.to_string(),
            next_occurrence: None,
        }
    }
}

impl Entity for BillingEntity {
    fn id(&self) -> &ID {
        &self.id
    }
}
