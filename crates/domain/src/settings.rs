use crate::shared::entity::{Entity, ID};
use chrono::NaiveTime;
use chrono_tz::{Tz, UTC};
use itertools::Itertools;

const FALLBACK_TIME_OF_DAY_HOUR: u32 = 9;

fn fallback_time_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(FALLBACK_TIME_OF_DAY_HOUR, 0, 0).unwrap_or_default()
}

/// Parses a wall-clock time given in 24-hour `HH:MM` form
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let parts = value.trim().split(':').collect::<Vec<_>>();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parses a comma-delimited lead-day list, e.g. `"7,3,1,0"`. Entries that
/// are not non-negative integers are discarded and duplicates removed,
/// keeping the original order of first appearance.
pub fn parse_lead_days(value: &str) -> Vec<u32> {
    value
        .split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .unique()
        .collect()
}

/// Per-user reminder preferences. There is exactly one value per user.
///
/// A lead-day value of `n` means "fire a reminder `n` days before the
/// billing occurrence". `0` gives a same-day reminder and is honored only
/// when explicitly configured.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderSettings {
    pub user_id: ID,
    /// When false no reminders are produced for this user at all
    pub enabled: bool,
    pub lead_days: Vec<u32>,
    /// Wall-clock time at which reminders fire, interpreted in `timezone`
    pub time_of_day: NaiveTime,
    pub timezone: Tz,
}

impl ReminderSettings {
    pub fn new(user_id: &ID) -> Self {
        Self {
            user_id: user_id.clone(),
            enabled: false,
            lead_days: Vec::new(),
            time_of_day: fallback_time_of_day(),
            timezone: UTC,
        }
    }

    pub fn set_timezone(&mut self, timezone: &str) -> bool {
        match timezone.parse::<Tz>() {
            Ok(tzid) => {
                self.timezone = tzid;
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_time_of_day(&mut self, time_of_day: &str) -> bool {
        match parse_time_of_day(time_of_day) {
            Some(time) => {
                self.time_of_day = time;
                true
            }
            None => false,
        }
    }

    pub fn set_lead_days(&mut self, lead_days: &str) -> bool {
        let parsed = parse_lead_days(lead_days);
        let complete = parsed.len() == lead_days.split(',').filter(|p| !p.trim().is_empty()).count();
        self.lead_days = parsed;
        complete
    }

    /// Lead days with duplicates removed, in configured order
    pub fn normalized_lead_days(&self) -> Vec<u32> {
        self.lead_days.iter().copied().unique().collect()
    }
}

impl Entity for ReminderSettings {
    fn id(&self) -> &ID {
        &self.user_id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn settings() -> ReminderSettings {
        ReminderSettings::new(&Default::default())
    }

    #[test]
    fn it_parses_valid_time_of_day() {
        assert_eq!(
            parse_time_of_day("09:00"),
            NaiveTime::from_hms_opt(9, 0, 0)
        );
        assert_eq!(
            parse_time_of_day("23:59"),
            NaiveTime::from_hms_opt(23, 59, 0)
        );
        assert_eq!(parse_time_of_day("0:5"), NaiveTime::from_hms_opt(0, 5, 0));
    }

    #[test]
    fn it_rejects_invalid_time_of_day() {
        for invalid in &["", "9", "24:00", "12:60", "twelve:30", "12:30:00", "-1:00"] {
            assert_eq!(parse_time_of_day(invalid), None);
        }
    }

    #[test]
    fn it_parses_lead_day_lists() {
        assert_eq!(parse_lead_days("7,3,1,0"), vec![7, 3, 1, 0]);
        assert_eq!(parse_lead_days("7, 3 ,1"), vec![7, 3, 1]);
        assert_eq!(parse_lead_days("7,7,3,3"), vec![7, 3]);
        assert_eq!(parse_lead_days("7,-3,x,1"), vec![7, 1]);
        assert_eq!(parse_lead_days(""), Vec::<u32>::new());
    }

    #[test]
    fn timezone_setter_keeps_old_value_on_parse_failure() {
        let mut settings = settings();
        assert!(settings.set_timezone("Europe/Oslo"));
        assert!(!settings.set_timezone("Not/AZone"));
        assert_eq!(settings.timezone, chrono_tz::Europe::Oslo);
    }

    #[test]
    fn time_of_day_setter_keeps_old_value_on_parse_failure() {
        let mut settings = settings();
        assert!(settings.set_time_of_day("18:30"));
        assert!(!settings.set_time_of_day("25:00"));
        assert_eq!(settings.time_of_day, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
    }

    #[test]
    fn default_time_of_day_is_nine_in_the_morning() {
        assert_eq!(
            settings().time_of_day,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }
}
