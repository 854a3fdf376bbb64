mod billing;
mod message;
mod reminder;
mod scheduler;
mod settings;
mod shared;

pub use billing::BillingEntity;
pub use message::ReminderMessage;
pub use reminder::{DispatchKey, DispatchRecord, ReminderEvent};
pub use scheduler::{compute_due_reminders, resolve_local};
pub use settings::{parse_lead_days, parse_time_of_day, ReminderSettings};
pub use shared::entity::{Entity, ID};
