use chrono::NaiveDateTime;
use daypulse_types::{ActionKind, CohortMember};
use std::collections::{HashMap, HashSet};

use crate::session::{SessionWindow, total_time_spent_mins};

/// Distinct screens shown when projecting a user's engagement detail.
pub const SCREEN_DISPLAY_CAP: usize = 20;

/// Screens shown per user in the cohort breakdown (the email table width).
pub const COHORT_SCREEN_CAP: usize = 12;

/// Per-user mutable record built action-by-action across the pass.
/// Fixed shape, default-constructed on first reference; flags only ever
/// flip false -> true and counters only increment, so replaying a batch in
/// any order converges on the same state. Discarded at the end of the run.
#[derive(Debug, Clone, Default)]
pub struct UserState {
    pub signup_started: bool,
    pub signed_up: bool,
    pub signup_failed: bool,
    pub onboarded: bool,
    pub card_linked: bool,
    pub card_link_failed: bool,
    pub bank_linked: bool,
    pub bank_link_failed: bool,
    pub autopay_enabled: bool,
    pub income_added: bool,
    pub churned: bool,
    pub fraud_blocked: bool,
    pub used_credgpt: bool,
    pub used_spinwheel: bool,
    pub claimed_reward: bool,

    pub cards_count: u32,
    pub banks_count: u32,
    pub bill_payments_made: u32,
    pub event_count: u64,

    /// Distinct screen name -> earliest event time it was seen at. Display
    /// order derives from the carried time, not from input order, so a
    /// permuted batch projects the same list.
    screens: HashMap<String, Option<NaiveDateTime>>,

    pub session_ids: HashSet<String>,
    pub windows: HashMap<String, SessionWindow>,
}

impl UserState {
    /// Apply one classified action. Each event lands here at most once with
    /// at most one kind, so counters move by at most one per event.
    pub fn apply(&mut self, kind: ActionKind) {
        match kind {
            ActionKind::SignupStarted => self.signup_started = true,
            ActionKind::SignupCompleted => self.signed_up = true,
            ActionKind::SignupFailed => self.signup_failed = true,
            ActionKind::OnboardingCompleted => self.onboarded = true,
            ActionKind::CardLinkSuccess => {
                self.card_linked = true;
                self.cards_count += 1;
            }
            ActionKind::CardLinkFailure => self.card_link_failed = true,
            ActionKind::BankLinkSuccess => {
                self.bank_linked = true;
                self.banks_count += 1;
            }
            ActionKind::BankLinkFailure => self.bank_link_failed = true,
            ActionKind::AutopayEnabled => self.autopay_enabled = true,
            ActionKind::IncomeAdded => self.income_added = true,
            ActionKind::BillPaymentMade => self.bill_payments_made += 1,
            ActionKind::Churned => self.churned = true,
            ActionKind::FraudBlocked => self.fraud_blocked = true,
            ActionKind::CredgptUsed => self.used_credgpt = true,
            ActionKind::SpinwheelUsed => self.used_spinwheel = true,
            ActionKind::RewardClaimed => self.claimed_reward = true,
            // Screen identity is recorded separately via record_screen.
            ActionKind::ScreenViewed => {}
        }
    }

    /// Record a screen view, keeping the earliest time each distinct screen
    /// was seen. A screen seen only on untimed events sorts after the timed
    /// ones.
    pub fn record_screen(&mut self, screen: &str, at: Option<NaiveDateTime>) {
        self.screens
            .entry(screen.to_string())
            .and_modify(|earliest| {
                if let Some(at) = at
                    && earliest.map_or(true, |current| at < current)
                {
                    *earliest = Some(at);
                }
            })
            .or_insert(at);
    }

    /// Widen the (user, session) window. Only called when the event carried
    /// both a session id and a parsable timestamp.
    pub fn record_session(&mut self, session_id: &str, at: NaiveDateTime) {
        self.session_ids.insert(session_id.to_string());
        self.windows
            .entry(session_id.to_string())
            .and_modify(|window| window.widen(at))
            .or_insert_with(|| SessionWindow::new(at));
    }

    pub fn distinct_screens(&self) -> usize {
        self.screens.len()
    }

    /// Distinct screens in first-seen event-time order, capped. Untimed
    /// screens follow the timed ones; name breaks ties so the projection is
    /// deterministic.
    pub fn display_screens(&self, cap: usize) -> Vec<String> {
        let mut entries: Vec<_> = self.screens.iter().collect();
        entries.sort_by(|(name_a, at_a), (name_b, at_b)| {
            at_a.is_none()
                .cmp(&at_b.is_none())
                .then(at_a.cmp(at_b))
                .then(name_a.cmp(name_b))
        });
        entries.into_iter().take(cap).map(|(name, _)| name.clone()).collect()
    }

    pub fn time_spent_mins(&self) -> f64 {
        total_time_spent_mins(&self.windows)
    }

    /// Project to the cohort record shape, truncating displayed screens to
    /// the cohort cap.
    pub fn to_cohort_member(&self, user_key: &str) -> CohortMember {
        CohortMember {
            user_key: user_key.to_string(),
            card_linked: self.card_linked,
            bank_linked: self.bank_linked,
            onboarded: self.onboarded,
            autopay_enabled: self.autopay_enabled,
            income_added: self.income_added,
            churned: self.churned,
            fraud_blocked: self.fraud_blocked,
            used_credgpt: self.used_credgpt,
            used_spinwheel: self.used_spinwheel,
            claimed_reward: self.claimed_reward,
            cards_count: self.cards_count,
            banks_count: self.banks_count,
            bill_payments_made: self.bill_payments_made,
            screens: self.display_screens(COHORT_SCREEN_CAP),
            distinct_screens: self.distinct_screens(),
            time_spent_mins: self.time_spent_mins(),
            session_count: self.session_ids.len(),
            event_count: self.event_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daypulse_types::parse_event_time;

    fn at(raw: &str) -> Option<NaiveDateTime> {
        Some(parse_event_time(raw).unwrap())
    }

    #[test]
    fn test_flags_are_monotone_and_idempotent() {
        let mut state = UserState::default();
        state.apply(ActionKind::SignupCompleted);
        state.apply(ActionKind::SignupCompleted);
        assert!(state.signed_up);
        assert_eq!(state.cards_count, 0);
    }

    #[test]
    fn test_counters_increment_per_event() {
        let mut state = UserState::default();
        state.apply(ActionKind::CardLinkSuccess);
        state.apply(ActionKind::CardLinkSuccess);
        state.apply(ActionKind::BillPaymentMade);
        assert_eq!(state.cards_count, 2);
        assert!(state.card_linked);
        assert_eq!(state.bill_payments_made, 1);
        assert_eq!(state.banks_count, 0);
    }

    #[test]
    fn test_screens_dedupe_and_order_by_event_time() {
        let mut state = UserState::default();
        // Arrives out of input order; display follows event time.
        state.record_screen("rewards", at("2025-03-15 10:05:00"));
        state.record_screen("home", at("2025-03-15 10:00:00"));
        state.record_screen("rewards", at("2025-03-15 10:09:00"));
        state.record_screen("cards", at("2025-03-15 10:02:00"));

        assert_eq!(
            state.display_screens(SCREEN_DISPLAY_CAP),
            vec!["home", "cards", "rewards"]
        );
        assert_eq!(state.distinct_screens(), 3);
    }

    #[test]
    fn test_duplicate_screen_keeps_earliest_time() {
        let mut state = UserState::default();
        state.record_screen("home", at("2025-03-15 10:08:00"));
        state.record_screen("cards", at("2025-03-15 10:06:00"));
        // A later-arriving but earlier-timed view moves "home" to the front.
        state.record_screen("home", at("2025-03-15 10:01:00"));

        assert_eq!(state.display_screens(10), vec!["home", "cards"]);
    }

    #[test]
    fn test_untimed_screens_sort_last() {
        let mut state = UserState::default();
        state.record_screen("mystery", None);
        state.record_screen("home", at("2025-03-15 10:00:00"));

        assert_eq!(state.display_screens(10), vec!["home", "mystery"]);
    }

    #[test]
    fn test_screens_past_cap_still_counted() {
        let mut state = UserState::default();
        for i in 0..(SCREEN_DISPLAY_CAP + 5) {
            let ts = at(&format!("2025-03-15 10:{:02}:00", i % 60));
            state.record_screen(&format!("screen_{i:02}"), ts);
        }
        assert_eq!(state.display_screens(SCREEN_DISPLAY_CAP).len(), SCREEN_DISPLAY_CAP);
        assert_eq!(state.distinct_screens(), SCREEN_DISPLAY_CAP + 5);
    }

    #[test]
    fn test_cohort_projection_truncates_screens() {
        let mut state = UserState::default();
        state.apply(ActionKind::SignupCompleted);
        for i in 0..SCREEN_DISPLAY_CAP {
            state.record_screen(&format!("screen_{i:02}"), at(&format!("2025-03-15 10:00:{i:02}")));
        }
        state.record_session("s1", parse_event_time("2025-03-15 10:00:00").unwrap());
        state.record_session("s1", parse_event_time("2025-03-15 10:02:00").unwrap());

        let member = state.to_cohort_member("u1");
        assert_eq!(member.screens.len(), COHORT_SCREEN_CAP);
        assert_eq!(member.screens[0], "screen_00");
        assert_eq!(member.distinct_screens, SCREEN_DISPLAY_CAP);
        assert_eq!(member.session_count, 1);
        assert_eq!(member.time_spent_mins, 2.0);
    }
}
