use crate::reminder::ReminderEvent;

/// Rendered notification text for a `ReminderEvent`. Presentation beyond
/// title and body (email templates, push payload shapes) belongs to the
/// webhook consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderMessage {
    pub title: String,
    pub body: String,
}

impl ReminderMessage {
    pub fn new(event: &ReminderEvent) -> Self {
        let title = format!("Upcoming renewal: {}", event.display_name);
        let body = match event.lead_days {
            0 => format!("{} renews TODAY ({})", event.display_name, event.occurrence),
            1 => format!(
                "{} renews in 1 day ({})",
                event.display_name, event.occurrence
            ),
            days => format!(
                "{} renews in {} days ({})",
                event.display_name, days, event.occurrence
            ),
        };
        Self { title, body }
    }
}
