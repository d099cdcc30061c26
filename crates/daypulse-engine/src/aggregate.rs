use daypulse_types::{
    ActionKind, DailyReport, EventRecord, FunnelRates, parse_event_time, round_to_tenth,
};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::identity::resolve_user_key;
use crate::rates::percentage;
use crate::state::UserState;
use crate::taxonomy::{ReportConfig, Taxonomy};

/// The single-pass reduction over one day's event batch.
///
/// Feed every record through `observe`, then call `finish` once. Both are
/// total: a record with a bad timestamp or no session id still counts
/// toward `event_count`, the raw tally and its action bucket - absence of
/// one field never drops an event from the rest of the pipeline.
pub struct Aggregator {
    taxonomy: Taxonomy,
    screen_property: String,
    screen_property_fallback: String,

    users: HashMap<String, UserState>,
    buckets: HashMap<ActionKind, HashSet<String>>,
    all_active: HashSet<String>,
    raw_event_tally: BTreeMap<String, u64>,
    event_count: u64,
}

impl Aggregator {
    pub fn new(config: &ReportConfig) -> Self {
        Aggregator {
            taxonomy: Taxonomy::from_config(config),
            screen_property: config.screen_property.clone(),
            screen_property_fallback: config.screen_property_fallback.clone(),
            users: HashMap::new(),
            buckets: HashMap::new(),
            all_active: HashSet::new(),
            raw_event_tally: BTreeMap::new(),
            event_count: 0,
        }
    }

    /// Fold one event into the running state.
    pub fn observe(&mut self, event: &EventRecord) {
        let user_key = resolve_user_key(event).to_string();

        self.event_count += 1;
        *self
            .raw_event_tally
            .entry(event.event_type.clone())
            .or_insert(0) += 1;
        self.all_active.insert(user_key.clone());

        let state = self.users.entry(user_key.clone()).or_default();
        state.event_count += 1;

        let at = parse_event_time(&event.event_time);

        // Session window tracking needs both a session id and a parsable
        // timestamp; everything else in this pass proceeds without them.
        if let Some(session_id) = event.session_id.as_deref()
            && let Some(at) = at
        {
            state.record_session(session_id, at);
        }

        let Some(kind) = self.taxonomy.classify(&event.event_type) else {
            return;
        };

        if kind == ActionKind::ScreenViewed {
            let screen = event
                .property_str(&self.screen_property)
                .or_else(|| event.property_str(&self.screen_property_fallback));
            if let Some(screen) = screen {
                state.record_screen(screen, at);
            }
        }

        state.apply(kind);
        self.buckets.entry(kind).or_default().insert(user_key);
    }

    /// Derive rates and assemble the report. Consumes the accumulator;
    /// per-user state does not survive the run.
    pub fn finish(self, date: &str) -> DailyReport {
        let mut unique_actors = BTreeMap::new();
        for kind in ActionKind::ALL {
            let count = self.buckets.get(&kind).map_or(0, HashSet::len);
            unique_actors.insert(kind, count);
        }

        let signup_started = unique_actors[&ActionKind::SignupStarted];
        let signup_completed = unique_actors[&ActionKind::SignupCompleted];
        let card_success = unique_actors[&ActionKind::CardLinkSuccess];
        let card_failure = unique_actors[&ActionKind::CardLinkFailure];
        let bank_success = unique_actors[&ActionKind::BankLinkSuccess];
        let bank_failure = unique_actors[&ActionKind::BankLinkFailure];

        let rates = FunnelRates {
            signup_completion: percentage(signup_completed, signup_started),
            card_link_success: percentage(card_success, card_success + card_failure),
            bank_link_success: percentage(bank_success, bank_success + bank_failure),
            onboarding_completion: percentage(
                unique_actors[&ActionKind::OnboardingCompleted],
                signup_completed,
            ),
            autopay_adoption: percentage(
                unique_actors[&ActionKind::AutopayEnabled],
                signup_completed,
            ),
        };

        let avg_session_mins = if self.all_active.is_empty() {
            0.0
        } else {
            let total: f64 = self.users.values().map(UserState::time_spent_mins).sum();
            round_to_tenth(total / self.all_active.len() as f64)
        };

        // Deterministic cohort order: sort by user key, not map order.
        let mut new_signups: Vec<_> = self
            .users
            .iter()
            .filter(|(_, state)| state.signed_up)
            .map(|(key, state)| state.to_cohort_member(key))
            .collect();
        new_signups.sort_by(|a, b| a.user_key.cmp(&b.user_key));

        DailyReport {
            date: date.to_string(),
            total_active_users: self.all_active.len(),
            new_signup_count: new_signups.len(),
            card_linked_count: card_success,
            bank_linked_count: bank_success,
            avg_session_mins,
            unique_actors,
            rates,
            raw_event_tally: self.raw_event_tally,
            event_count: self.event_count,
            new_signups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::NO_RATE;

    fn observe_all(events: &[EventRecord]) -> DailyReport {
        let config = ReportConfig::default();
        let mut aggregator = Aggregator::new(&config);
        for event in events {
            aggregator.observe(event);
        }
        aggregator.finish("2025-03-15")
    }

    fn event(user_id: &str, event_type: &str, event_time: &str) -> EventRecord {
        EventRecord {
            user_id: Some(user_id.to_string()),
            event_type: event_type.to_string(),
            event_time: event_time.to_string(),
            ..EventRecord::default()
        }
    }

    #[test]
    fn test_empty_batch_yields_all_zero_report() {
        let report = observe_all(&[]);
        assert_eq!(report.total_active_users, 0);
        assert_eq!(report.event_count, 0);
        assert_eq!(report.avg_session_mins, 0.0);
        assert_eq!(report.new_signups.len(), 0);
        assert_eq!(report.rates.signup_completion, NO_RATE);
        assert_eq!(report.rates.card_link_success, NO_RATE);
        // Fixed key set even when empty.
        assert_eq!(report.unique_actors.len(), ActionKind::ALL.len());
    }

    #[test]
    fn test_signup_card_and_screen_scenario() {
        let mut screen_event = event(
            "u1",
            "common_screen_view_tracker",
            "2025-03-15 10:06:00",
        );
        screen_event.session_id = Some("s1".to_string());
        screen_event.event_properties = Some(
            serde_json::from_str(r#"{"screen_name":"home"}"#).unwrap(),
        );
        let mut card_event = event("u1", "add_card_successful", "2025-03-15 10:05:00");
        card_event.session_id = Some("s1".to_string());

        let report = observe_all(&[
            event("u1", "signup_completed", "2025-03-15 10:00:00"),
            card_event,
            screen_event,
        ]);

        assert_eq!(report.unique_actors[&ActionKind::SignupCompleted], 1);
        assert_eq!(report.unique_actors[&ActionKind::CardLinkSuccess], 1);
        assert_eq!(report.new_signups.len(), 1);

        let member = &report.new_signups[0];
        assert_eq!(member.user_key, "u1");
        assert!(member.card_linked);
        assert_eq!(member.cards_count, 1);
        assert_eq!(member.screens, vec!["home"]);
        assert_eq!(member.session_count, 1);
        assert_eq!(member.time_spent_mins, 1.0);
    }

    #[test]
    fn test_duplicate_events_do_not_double_unique_counts() {
        let e = event("u1", "signup_completed", "2025-03-15 10:00:00");
        let report = observe_all(&[e.clone(), e]);

        assert_eq!(report.event_count, 2);
        assert_eq!(report.raw_event_tally["signup_completed"], 2);
        assert_eq!(report.unique_actors[&ActionKind::SignupCompleted], 1);
        assert_eq!(report.total_active_users, 1);
        assert_eq!(report.new_signups.len(), 1);
    }

    #[test]
    fn test_unrecognized_event_type_counts_only_as_active() {
        let report = observe_all(&[event("u1", "debug_ping", "2025-03-15 10:00:00")]);
        assert_eq!(report.total_active_users, 1);
        assert_eq!(report.event_count, 1);
        assert_eq!(report.raw_event_tally["debug_ping"], 1);
        for kind in ActionKind::ALL {
            assert_eq!(report.unique_actors[&kind], 0, "{kind} should be empty");
        }
    }

    #[test]
    fn test_bad_timestamp_still_classifies() {
        let mut e = event("u1", "add_bank_successful", "garbage");
        e.session_id = Some("s1".to_string());
        let report = observe_all(&[e]);

        assert_eq!(report.unique_actors[&ActionKind::BankLinkSuccess], 1);
        assert_eq!(report.event_count, 1);
        // No window was opened, so no time was spent.
        assert_eq!(report.avg_session_mins, 0.0);
    }

    #[test]
    fn test_missing_session_id_still_classifies() {
        let report = observe_all(&[event("u1", "add_card_successful", "2025-03-15 10:00:00")]);
        assert_eq!(report.unique_actors[&ActionKind::CardLinkSuccess], 1);
        assert_eq!(report.card_linked_count, 1);
    }

    #[test]
    fn test_rate_derivation() {
        let report = observe_all(&[
            event("u1", "signup_started", "2025-03-15 09:00:00"),
            event("u2", "signup_started", "2025-03-15 09:01:00"),
            event("u3", "signup_started", "2025-03-15 09:02:00"),
            event("u1", "signup_completed", "2025-03-15 09:10:00"),
            event("u2", "signup_completed", "2025-03-15 09:12:00"),
            event("u1", "add_card_successful", "2025-03-15 09:20:00"),
            event("u2", "add_card_failed", "2025-03-15 09:21:00"),
        ]);

        assert_eq!(report.rates.signup_completion, "67%");
        assert_eq!(report.rates.card_link_success, "50%");
        assert_eq!(report.rates.bank_link_success, NO_RATE);
        assert_eq!(report.rates.onboarding_completion, "0%");
    }

    #[test]
    fn test_anonymous_events_share_one_bucket() {
        let mut a = event("", "app_open", "2025-03-15 10:00:00");
        a.user_id = None;
        let b = a.clone();
        let report = observe_all(&[a, b]);
        assert_eq!(report.total_active_users, 1);
    }

    #[test]
    fn test_cohort_sorted_by_user_key() {
        let report = observe_all(&[
            event("zed", "signup_completed", "2025-03-15 10:00:00"),
            event("amy", "signup_completed", "2025-03-15 10:01:00"),
            event("mia", "signup_completed", "2025-03-15 10:02:00"),
        ]);
        let keys: Vec<_> = report.new_signups.iter().map(|m| m.user_key.as_str()).collect();
        assert_eq!(keys, vec!["amy", "mia", "zed"]);
    }
}
