use daypulse_types::ActionKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Configuration consumed by the aggregator: the action taxonomy plus the
/// screen-property lookup. Injected at construction - the engine never
/// reads ambient state - and swappable without touching aggregation logic.
///
/// Taxonomy keys are the snake_case kind names (`ActionKind::as_str`) so
/// the table reads naturally in TOML; entries under unknown names are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Canonical action kind name -> accepted raw event-type strings.
    pub taxonomy: BTreeMap<String, Vec<String>>,

    /// Primary event property holding the screen identifier.
    pub screen_property: String,

    /// Fallback property, tried when the primary is absent or empty.
    pub screen_property_fallback: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            taxonomy: default_taxonomy(),
            screen_property: "screen_name".to_string(),
            screen_property_fallback: "screen".to_string(),
        }
    }
}

impl ReportConfig {
    /// The raw event-type strings configured for one kind.
    pub fn raw_names(&self, kind: ActionKind) -> &[String] {
        self.taxonomy
            .get(kind.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace one kind's accepted raw strings.
    pub fn set_raw_names(&mut self, kind: ActionKind, raw_names: Vec<String>) {
        self.taxonomy.insert(kind.as_str().to_string(), raw_names);
    }
}

/// The stock taxonomy for the app's event names. Several raw names fold
/// into one kind where client versions diverged (e.g. both the started and
/// ended events of a CredGPT session mean "used CredGPT today").
fn default_taxonomy() -> BTreeMap<String, Vec<String>> {
    let table: [(ActionKind, &[&str]); 17] = [
        (ActionKind::SignupStarted, &["signup_started", "sign_up_initiated"]),
        (ActionKind::SignupCompleted, &["signup_completed", "sign_up_successful"]),
        (ActionKind::SignupFailed, &["signup_failed", "sign_up_error"]),
        (ActionKind::OnboardingCompleted, &["onboarding_completed"]),
        (ActionKind::CardLinkSuccess, &["add_card_successful", "card_linked"]),
        (ActionKind::CardLinkFailure, &["add_card_failed", "card_link_error"]),
        (ActionKind::BankLinkSuccess, &["add_bank_successful", "bank_account_linked"]),
        (ActionKind::BankLinkFailure, &["add_bank_failed", "bank_link_error"]),
        (ActionKind::AutopayEnabled, &["autopay_setup_successful"]),
        (ActionKind::IncomeAdded, &["income_source_added"]),
        (ActionKind::BillPaymentMade, &["bill_payment_successful"]),
        (ActionKind::Churned, &["account_deleted", "subscription_cancelled"]),
        (ActionKind::FraudBlocked, &["fraud_check_blocked"]),
        (ActionKind::CredgptUsed, &["credgpt_session_started", "credgpt_session_ended"]),
        (ActionKind::SpinwheelUsed, &["spinwheel_spun"]),
        (ActionKind::RewardClaimed, &["reward_claimed"]),
        (ActionKind::ScreenViewed, &["common_screen_view_tracker", "screen_view"]),
    ];

    table
        .into_iter()
        .map(|(kind, raws)| {
            (
                kind.as_str().to_string(),
                raws.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect()
}

/// Flattened raw-string -> kind lookup, built once from the config table.
/// Exact, case-sensitive match; at most one kind per raw string. When a raw
/// string is listed under more than one kind, the kind earliest in
/// `ActionKind::ALL` wins, so each event increments at most one counter set.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    lookup: HashMap<String, ActionKind>,
}

impl Taxonomy {
    pub fn from_config(config: &ReportConfig) -> Self {
        let mut lookup = HashMap::new();
        for kind in ActionKind::ALL {
            for raw in config.raw_names(kind) {
                lookup.entry(raw.clone()).or_insert(kind);
            }
        }
        Taxonomy { lookup }
    }

    /// Map a raw event-type string to its canonical kind. `None` means the
    /// event still counts toward `all_active` and the raw tally, just not
    /// toward any specific bucket.
    pub fn classify(&self, raw_event_type: &str) -> Option<ActionKind> {
        self.lookup.get(raw_event_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_classifies_synonyms() {
        let taxonomy = Taxonomy::from_config(&ReportConfig::default());
        assert_eq!(
            taxonomy.classify("add_card_successful"),
            Some(ActionKind::CardLinkSuccess)
        );
        assert_eq!(taxonomy.classify("card_linked"), Some(ActionKind::CardLinkSuccess));
        assert_eq!(
            taxonomy.classify("credgpt_session_started"),
            Some(ActionKind::CredgptUsed)
        );
        assert_eq!(
            taxonomy.classify("credgpt_session_ended"),
            Some(ActionKind::CredgptUsed)
        );
    }

    #[test]
    fn test_default_table_covers_every_kind() {
        let config = ReportConfig::default();
        for kind in ActionKind::ALL {
            assert!(
                !config.raw_names(kind).is_empty(),
                "{kind} has no raw event names"
            );
        }
    }

    #[test]
    fn test_match_is_exact_and_case_sensitive() {
        let taxonomy = Taxonomy::from_config(&ReportConfig::default());
        assert_eq!(taxonomy.classify("Signup_Completed"), None);
        assert_eq!(taxonomy.classify("signup_completed "), None);
        assert_eq!(taxonomy.classify("totally_unknown"), None);
    }

    #[test]
    fn test_duplicate_raw_name_resolves_to_earliest_kind() {
        let mut config = ReportConfig::default();
        let mut churned = config.raw_names(ActionKind::Churned).to_vec();
        churned.push("signup_completed".to_string());
        config.set_raw_names(ActionKind::Churned, churned);

        let taxonomy = Taxonomy::from_config(&config);
        // SignupCompleted precedes Churned in ActionKind::ALL.
        assert_eq!(
            taxonomy.classify("signup_completed"),
            Some(ActionKind::SignupCompleted)
        );
    }

    #[test]
    fn test_config_overrides_replace_the_table() {
        let mut config = ReportConfig::default();
        config.set_raw_names(
            ActionKind::SignupCompleted,
            vec!["registration_done".to_string()],
        );

        let taxonomy = Taxonomy::from_config(&config);
        assert_eq!(
            taxonomy.classify("registration_done"),
            Some(ActionKind::SignupCompleted)
        );
        assert_eq!(taxonomy.classify("signup_completed"), None);
    }

    #[test]
    fn test_unknown_taxonomy_keys_are_ignored() {
        let mut config = ReportConfig::default();
        config
            .taxonomy
            .insert("not_a_kind".to_string(), vec!["mystery_event".to_string()]);

        let taxonomy = Taxonomy::from_config(&config);
        assert_eq!(taxonomy.classify("mystery_event"), None);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = ReportConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ReportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.screen_property, "screen_name");
        assert_eq!(
            back.raw_names(ActionKind::ScreenViewed),
            ["common_screen_view_tracker", "screen_view"]
        );
    }
}
