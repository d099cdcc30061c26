use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical action kinds - the normalized business events the report is
/// built from. One or more raw event-type strings map onto each kind via the
/// configured taxonomy; the engine never looks at raw strings beyond that
/// mapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SignupStarted,
    SignupCompleted,
    SignupFailed,
    OnboardingCompleted,
    CardLinkSuccess,
    CardLinkFailure,
    BankLinkSuccess,
    BankLinkFailure,
    AutopayEnabled,
    IncomeAdded,
    BillPaymentMade,
    Churned,
    FraudBlocked,
    CredgptUsed,
    SpinwheelUsed,
    RewardClaimed,
    ScreenViewed,
}

impl ActionKind {
    /// Every kind, in declaration order. Declaration order is the
    /// tie-breaker when a raw event-type string is listed under more than
    /// one kind: the earliest kind wins.
    pub const ALL: [ActionKind; 17] = [
        ActionKind::SignupStarted,
        ActionKind::SignupCompleted,
        ActionKind::SignupFailed,
        ActionKind::OnboardingCompleted,
        ActionKind::CardLinkSuccess,
        ActionKind::CardLinkFailure,
        ActionKind::BankLinkSuccess,
        ActionKind::BankLinkFailure,
        ActionKind::AutopayEnabled,
        ActionKind::IncomeAdded,
        ActionKind::BillPaymentMade,
        ActionKind::Churned,
        ActionKind::FraudBlocked,
        ActionKind::CredgptUsed,
        ActionKind::SpinwheelUsed,
        ActionKind::RewardClaimed,
        ActionKind::ScreenViewed,
    ];

    /// The snake_case name used in config files and report keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SignupStarted => "signup_started",
            ActionKind::SignupCompleted => "signup_completed",
            ActionKind::SignupFailed => "signup_failed",
            ActionKind::OnboardingCompleted => "onboarding_completed",
            ActionKind::CardLinkSuccess => "card_link_success",
            ActionKind::CardLinkFailure => "card_link_failure",
            ActionKind::BankLinkSuccess => "bank_link_success",
            ActionKind::BankLinkFailure => "bank_link_failure",
            ActionKind::AutopayEnabled => "autopay_enabled",
            ActionKind::IncomeAdded => "income_added",
            ActionKind::BillPaymentMade => "bill_payment_made",
            ActionKind::Churned => "churned",
            ActionKind::FraudBlocked => "fraud_blocked",
            ActionKind::CredgptUsed => "credgpt_used",
            ActionKind::SpinwheelUsed => "spinwheel_used",
            ActionKind::RewardClaimed => "reward_claimed",
            ActionKind::ScreenViewed => "screen_viewed",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ActionKind::CardLinkSuccess).unwrap();
        assert_eq!(json, r#""card_link_success""#);

        let kind: ActionKind = serde_json::from_str(r#""screen_viewed""#).unwrap();
        assert_eq!(kind, ActionKind::ScreenViewed);
    }

    #[test]
    fn test_all_covers_every_kind_once() {
        let mut seen = std::collections::HashSet::new();
        for kind in ActionKind::ALL {
            assert!(seen.insert(kind), "duplicate in ALL: {kind}");
        }
        assert_eq!(seen.len(), 17);
    }

    #[test]
    fn test_display_matches_serde_name() {
        for kind in ActionKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
