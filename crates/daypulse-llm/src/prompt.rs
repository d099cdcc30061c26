use chrono::NaiveDate;
use daypulse_types::DailyReport;
use serde_json::json;

/// Cohort members included in the prompt. The founders' email carries the
/// full breakdown; the model only needs enough users for context without
/// blowing the token budget.
const COHORT_PROMPT_CAP: usize = 50;

/// Build the analyst prompt from the report. The data block is compact
/// JSON; the instructions pin the three section headings the section
/// parser splits on.
pub fn build_prompt(report: &DailyReport, date: NaiveDate) -> String {
    let date_str = date.format("%A, %B %d, %Y").to_string();

    let signup_details: Vec<_> = report
        .new_signups
        .iter()
        .take(COHORT_PROMPT_CAP)
        .map(|member| {
            json!({
                "user_id": member.user_key,
                "card_linked": member.card_linked,
                "bank_linked": member.bank_linked,
                "cards_count": member.cards_count,
                "banks_count": member.banks_count,
                "screens_visited": member.screens,
                "time_spent_mins": member.time_spent_mins,
                "sessions": member.session_count,
            })
        })
        .collect();

    let data_summary = json!({
        "date": date_str,
        "summary_metrics": {
            "daily_active_users": report.total_active_users,
            "new_signups": report.new_signup_count,
            "users_who_linked_card": report.card_linked_count,
            "users_who_linked_bank": report.bank_linked_count,
            "avg_session_duration_mins": report.avg_session_mins,
            "signup_completion_rate": report.rates.signup_completion,
            "card_link_success_rate": report.rates.card_link_success,
            "bank_link_success_rate": report.rates.bank_link_success,
        },
        "new_signup_details": signup_details,
    });

    format!(
        r#"You are a senior product analyst at a consumer fintech company.
You are writing a daily report email for the founders. Your tone should be clear, direct, and data-driven — like a smart colleague briefing them before their morning coffee.

Here is yesterday's data ({date_str}):

{data}

Write three sections:

---

**EXECUTIVE SUMMARY**
2-3 paragraphs. Cover what happened yesterday at a high level. Highlight what was good, what was concerning, and one key question the data raises. Be specific with numbers.

---

**KEY HIGHLIGHTS**
3-5 bullet points. Each one should be a concrete, actionable observation from the data. For example: which users completed the full onboarding funnel (signup + card + bank), any drop-off patterns you see, average engagement depth, etc.

---

**WATCH LIST**
2-3 items that need attention or follow-up. These are things that could become problems or opportunities. Be brief and specific.

---

Rules:
- Use actual numbers from the data, not vague language.
- Don't pad. If something isn't notable, skip it.
- Never say "it's important to note" or "it's worth mentioning".
- Write in second person ("you had X signups") not third person.
"#,
        date_str = date_str,
        data = serde_json::to_string_pretty(&data_summary).unwrap_or_default(),
    )
}
