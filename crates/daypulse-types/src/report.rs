use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::ActionKind;

/// The structured output of one day's reduction. Immutable snapshot with a
/// fixed, fully-populated key set: an empty input batch yields zeroes and
/// empty collections here, never missing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    /// Reporting day, `YYYY-MM-DD`.
    pub date: String,

    /// Distinct user keys that produced at least one event.
    pub total_active_users: usize,

    /// Convenience scalars the email template reads directly.
    pub new_signup_count: usize,
    pub card_linked_count: usize,
    pub bank_linked_count: usize,

    /// Mean per-user time spent in minutes across all active users, one
    /// decimal place, 0.0 for an empty day.
    pub avg_session_mins: f64,

    /// Unique-user count per canonical action kind. Every kind is present,
    /// zero-valued when nobody performed it.
    pub unique_actors: BTreeMap<ActionKind, usize>,

    /// Derived funnel/conversion rates.
    pub rates: FunnelRates,

    /// Raw event-type occurrence tally (events, not unique users),
    /// including types the taxonomy does not recognize.
    pub raw_event_tally: BTreeMap<String, u64>,

    /// Total events observed, duplicates and all.
    pub event_count: u64,

    /// Users who completed signup this day, sorted by user key ascending.
    pub new_signups: Vec<CohortMember>,
}

/// Percentage strings derived from pairs of unique-user counts.
/// `"—"` wherever the denominator was zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelRates {
    /// SignupCompleted / SignupStarted.
    pub signup_completion: String,
    /// CardLinkSuccess / (CardLinkSuccess + CardLinkFailure).
    pub card_link_success: String,
    /// BankLinkSuccess / (BankLinkSuccess + BankLinkFailure).
    pub bank_link_success: String,
    /// OnboardingCompleted / SignupCompleted.
    pub onboarding_completion: String,
    /// AutopayEnabled / SignupCompleted.
    pub autopay_adoption: String,
}

/// One new-signup user's engagement detail, projected from the per-user
/// accumulator at the end of the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortMember {
    pub user_key: String,
    pub card_linked: bool,
    pub bank_linked: bool,
    pub onboarded: bool,
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
    /// First-seen screen names, truncated to the cohort display cap.
    pub screens: Vec<String>,
    /// Distinct screens seen, including any past the display cap.
    pub distinct_screens: usize,
    pub time_spent_mins: f64,
    pub session_count: usize,
    pub event_count: u64,
}

/// Narrative sections produced by the downstream analyzer. Kept next to the
/// report types because both the analyzer and the mailer speak this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub executive_summary: String,
    pub highlights: String,
    pub watch_list: String,
    pub full_text: String,
}

impl Analysis {
    /// Placeholder used when the analyzer API fails; the report email still
    /// goes out with the raw numbers.
    pub fn unavailable() -> Self {
        Analysis {
            executive_summary: "Analysis unavailable — narrative generation failed. See logs."
                .to_string(),
            highlights: String::new(),
            watch_list: String::new(),
            full_text: String::new(),
        }
    }
}
