use crate::billing::BillingEntity;
use crate::reminder::{DispatchKey, ReminderEvent};
use crate::settings::ReminderSettings;
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;

/// Combines a calendar date with a wall-clock time in the given timezone
/// and resolves the result to an absolute UTC instant.
///
/// Two DST situations need a decision here:
/// - A nonexistent local time (spring-forward gap) is shifted forward in
///   15 minute steps until it lands on a valid instant.
/// - An ambiguous local time (fall-back overlap) resolves to the earlier
///   of the two instants.
///
/// Forward shifting gives up after four hours. That only happens when a
/// region skips (at least) a whole day, e.g. Samoa crossing the date line
/// at the end of 2011; the wall-clock time is then read as UTC so a
/// reminder still fires near the intended date.
pub fn resolve_local(date: NaiveDate, time: NaiveTime, timezone: Tz) -> DateTime<Utc> {
    let mut local = date.and_time(time);
    // Real timezone gaps are at most a few hours wide
    for _ in 0..16 {
        match timezone.from_local_datetime(&local) {
            LocalResult::Single(instant) => return instant.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => local = local + Duration::minutes(15),
        }
    }
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Computes the reminders that are due for dispatch right now.
///
/// For every entity with a `next_occurrence` and every configured lead-day
/// value, the reminder instant is the occurrence date minus that many days,
/// at the user's preferred wall-clock time in the user's timezone. An
/// instant counts as due when it falls within the half-open window
/// `[now, now + window)`, or when it has already passed without its
/// `DispatchKey` ever being recorded in `dispatched` (catch-up after
/// dispatcher downtime). Keys present in `dispatched` are never re-emitted.
///
/// The output is ordered by scheduled instant, tie-broken by entity id, so
/// identical inputs always produce identical output. This function never
/// reads the wall clock; `now` is caller-supplied.
///
/// Panics when `window` is negative, which is a caller bug.
pub fn compute_due_reminders(
    entities: &[BillingEntity],
    settings: &ReminderSettings,
    dispatched: &HashSet<DispatchKey>,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<ReminderEvent> {
    assert!(window >= Duration::zero(), "dispatch window must not be negative");

    if !settings.enabled {
        return Vec::new();
    }

    let lead_days = settings.normalized_lead_days();
    let horizon = now + window;

    let mut events = Vec::new();
    for entity in entities {
        let occurrence = match entity.next_occurrence {
            Some(occurrence) => occurrence,
            None => continue,
        };
        for &lead in &lead_days {
            let reminder_date = occurrence - Duration::days(lead as i64);
            let scheduled_at = resolve_local(reminder_date, settings.time_of_day, settings.timezone);

            let key = DispatchKey {
                entity_id: entity.id.clone(),
                occurrence,
                lead_days: lead,
            };
            if dispatched.contains(&key) {
                continue;
            }

            // Inside [now, horizon), or overdue and never dispatched
            if scheduled_at < horizon {
                events.push(ReminderEvent {
                    entity_id: entity.id.clone(),
                    display_name: entity.display_name.clone(),
                    occurrence,
                    lead_days: lead,
                    scheduled_at,
                    due_now: true,
                });
            }
        }
    }

    events.sort_by(|e1, e2| {
        e1.scheduled_at
            .cmp(&e2.scheduled_at)
            .then_with(|| e1.entity_id.cmp(&e2.entity_id))
    });
    events
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::entity::ID;
    use chrono_tz::UTC;

    fn date(datestr: &str) -> NaiveDate {
        datestr.parse().expect("Valid date")
    }

    fn instant(timestr: &str) -> DateTime<Utc> {
        timestr.parse().expect("Valid instant")
    }

    fn entity(display_name: &str, next_occurrence: &str) -> BillingEntity {
        let mut entity = BillingEntity::new(&Default::default(), display_name);
        entity.next_occurrence = Some(date(next_occurrence));
        entity
    }

    fn settings(lead_days: Vec<u32>) -> ReminderSettings {
        let mut settings = ReminderSettings::new(&Default::default());
        settings.enabled = true;
        settings.lead_days = lead_days;
        settings
    }

    fn five_minutes() -> Duration {
        Duration::minutes(5)
    }

    #[test]
    fn disabled_settings_produce_nothing() {
        let entities = vec![entity("Netflix", "2024-06-10")];
        let mut settings = settings(vec![7, 3, 1, 0]);
        settings.enabled = false;

        let events = compute_due_reminders(
            &entities,
            &settings,
            &HashSet::new(),
            instant("2024-06-03T09:00:00Z"),
            five_minutes(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn entities_without_a_next_occurrence_are_skipped() {
        let mut no_occurrence = entity("Spotify", "2024-06-10");
        no_occurrence.next_occurrence = None;

        let events = compute_due_reminders(
            &[no_occurrence],
            &settings(vec![7, 3, 1, 0]),
            &HashSet::new(),
            instant("2024-06-03T09:00:00Z"),
            five_minutes(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn already_dispatched_triples_are_never_emitted() {
        let entities = vec![entity("Netflix", "2024-06-10")];
        let settings = settings(vec![7]);

        let mut dispatched = HashSet::new();
        dispatched.insert(DispatchKey {
            entity_id: entities[0].id.clone(),
            occurrence: date("2024-06-10"),
            lead_days: 7,
        });

        // Regardless of now: in-window, long overdue, or far in the future
        for now in &[
            "2024-06-03T09:00:00Z",
            "2024-06-05T00:00:00Z",
            "2024-01-01T00:00:00Z",
        ] {
            let events = compute_due_reminders(
                &entities,
                &settings,
                &dispatched,
                instant(now),
                five_minutes(),
            );
            assert!(events.is_empty());
        }
    }

    #[test]
    fn lead_days_cross_month_boundaries() {
        let entities = vec![entity("Gym", "2024-03-02")];

        let events = compute_due_reminders(
            &entities,
            &settings(vec![5]),
            &HashSet::new(),
            instant("2024-02-26T09:00:00Z"),
            five_minutes(),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scheduled_at, instant("2024-02-26T09:00:00Z"));
        assert_eq!(events[0].occurrence, date("2024-03-02"));
    }

    #[test]
    fn lead_days_cross_year_boundaries() {
        let entities = vec![entity("Domain renewal", "2025-01-03")];

        let events = compute_due_reminders(
            &entities,
            &settings(vec![7]),
            &HashSet::new(),
            instant("2024-12-27T09:00:00Z"),
            five_minutes(),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scheduled_at, instant("2024-12-27T09:00:00Z"));
    }

    #[test]
    fn nonexistent_local_time_shifts_forward() {
        // America/New_York springs forward on 2024-03-10: 02:30 does not exist
        let resolved = resolve_local(
            date("2024-03-10"),
            NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
            chrono_tz::America::New_York,
        );
        // First valid instant is 03:00 EDT
        assert_eq!(resolved, instant("2024-03-10T07:00:00Z"));
    }

    #[test]
    fn skipped_calendar_days_fall_back_to_utc_interpretation() {
        // Samoa jumped across the date line at the end of 2011-12-29;
        // 2011-12-30 never existed there, so no amount of forward
        // shifting finds a valid instant
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let resolved = resolve_local(date("2011-12-30"), nine, chrono_tz::Pacific::Apia);
        assert_eq!(resolved, instant("2011-12-30T09:00:00Z"));
    }

    #[test]
    fn ambiguous_local_time_resolves_to_earliest_instant() {
        // America/New_York falls back on 2024-11-03: 01:30 happens twice
        let resolved = resolve_local(
            date("2024-11-03"),
            NaiveTime::from_hms_opt(1, 30, 0).unwrap(),
            chrono_tz::America::New_York,
        );
        // The EDT (UTC-4) occurrence comes first
        assert_eq!(resolved, instant("2024-11-03T05:30:00Z"));
    }

    #[test]
    fn same_wall_clock_time_maps_to_different_offsets_across_dst() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let before = resolve_local(date("2024-03-09"), nine, chrono_tz::America::New_York);
        let after = resolve_local(date("2024-03-11"), nine, chrono_tz::America::New_York);
        assert_eq!(before, instant("2024-03-09T14:00:00Z"));
        assert_eq!(after, instant("2024-03-11T13:00:00Z"));
    }

    #[test]
    fn window_includes_lower_bound_and_excludes_upper_bound() {
        let entities = vec![entity("Netflix", "2024-06-10")];
        let settings = settings(vec![7]);

        // scheduled_at == now
        let events = compute_due_reminders(
            &entities,
            &settings,
            &HashSet::new(),
            instant("2024-06-03T09:00:00Z"),
            five_minutes(),
        );
        assert_eq!(events.len(), 1);
        assert!(events[0].due_now);

        // scheduled_at == now + window
        let events = compute_due_reminders(
            &entities,
            &settings,
            &HashSet::new(),
            instant("2024-06-03T08:55:00Z"),
            five_minutes(),
        );
        assert!(events.is_empty());

        // Just inside the upper bound
        let events = compute_due_reminders(
            &entities,
            &settings,
            &HashSet::new(),
            instant("2024-06-03T08:55:01Z"),
            five_minutes(),
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn overdue_reminders_are_caught_up() {
        let entities = vec![entity("Netflix", "2024-06-10")];
        let settings = settings(vec![7]);

        // Two hours after the scheduled instant, nothing dispatched yet
        let events = compute_due_reminders(
            &entities,
            &settings,
            &HashSet::new(),
            instant("2024-06-03T11:00:00Z"),
            five_minutes(),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scheduled_at, instant("2024-06-03T09:00:00Z"));
        assert!(events[0].due_now);
    }

    #[test]
    fn duplicate_lead_days_fire_once() {
        let entities = vec![entity("Netflix", "2024-06-10")];

        let events = compute_due_reminders(
            &entities,
            &settings(vec![7, 7, 7]),
            &HashSet::new(),
            instant("2024-06-03T09:00:00Z"),
            five_minutes(),
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn lead_day_zero_only_when_explicitly_configured() {
        let entities = vec![entity("Netflix", "2024-06-10")];

        let without_zero = compute_due_reminders(
            &entities,
            &settings(vec![7]),
            &HashSet::new(),
            instant("2024-06-10T09:00:00Z"),
            five_minutes(),
        );
        assert!(without_zero.is_empty());

        let with_zero = compute_due_reminders(
            &entities,
            &settings(vec![7, 0]),
            &HashSet::new(),
            instant("2024-06-10T09:00:00Z"),
            five_minutes(),
        );
        assert_eq!(with_zero.len(), 1);
        assert_eq!(with_zero[0].lead_days, 0);
    }

    #[test]
    fn output_is_deterministic_and_ordered() {
        let mut first = entity("Netflix", "2024-06-10");
        let mut second = entity("Spotify", "2024-06-10");
        // Fixed ids so the tie-break order is known
        first.id = "11111111-1111-1111-1111-111111111111".parse::<ID>().unwrap();
        second.id = "22222222-2222-2222-2222-222222222222".parse::<ID>().unwrap();
        let entities = vec![second, first];
        let settings = settings(vec![7, 3]);
        let now = instant("2024-06-07T09:00:00Z");

        // Catch-up makes both lead-7 instants due alongside both lead-3 ones
        let events =
            compute_due_reminders(&entities, &settings, &HashSet::new(), now, five_minutes());
        assert_eq!(events.len(), 4);
        let schedule = events
            .iter()
            .map(|e| (e.scheduled_at, e.entity_id.clone()))
            .collect::<Vec<_>>();
        let mut sorted = schedule.clone();
        sorted.sort();
        assert_eq!(schedule, sorted);

        let rerun =
            compute_due_reminders(&entities, &settings, &HashSet::new(), now, five_minutes());
        assert_eq!(events, rerun);
    }

    #[test]
    fn full_scenario_emits_exactly_the_lead_seven_reminder() {
        let entities = vec![entity("sub1", "2024-06-10")];
        let mut settings = settings(vec![7, 3, 1, 0]);
        settings.timezone = UTC;
        settings.time_of_day = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

        let events = compute_due_reminders(
            &entities,
            &settings,
            &HashSet::new(),
            instant("2024-06-03T09:00:00Z"),
            five_minutes(),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity_id, entities[0].id);
        assert_eq!(events[0].lead_days, 7);
        assert_eq!(events[0].scheduled_at, instant("2024-06-03T09:00:00Z"));
    }

    #[test]
    #[should_panic]
    fn negative_window_is_a_caller_bug() {
        compute_due_reminders(
            &[],
            &settings(vec![7]),
            &HashSet::new(),
            instant("2024-06-03T09:00:00Z"),
            Duration::minutes(-5),
        );
    }
}
