use chrono::NaiveDate;
use daypulse_types::{Analysis, CohortMember, DailyReport};
use std::fmt::Write;

pub fn subject_line(date: NaiveDate) -> String {
    format!("Daily Report — {}", date.format("%b %d, %Y"))
}

/// Escape text destined for HTML. Everything user-controlled (user keys,
/// screen names, model output) goes through here.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Markdown-lite to HTML: paragraphs and `-`/`*` bullet lists, nothing
/// more. The analyzer is prompted toward plain prose and bullets; anything
/// fancier renders literally (escaped).
fn markdown_to_html(text: &str) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            if !in_list {
                html.push_str("<ul>");
                in_list = true;
            }
            let _ = write!(html, "<li>{}</li>", escape(item));
        } else {
            if in_list {
                html.push_str("</ul>");
                in_list = false;
            }
            if !trimmed.is_empty() {
                let _ = write!(html, "<p>{}</p>", escape(trimmed));
            }
        }
    }
    if in_list {
        html.push_str("</ul>");
    }
    html
}

fn metric_card(label: &str, value: &str, color: &str) -> String {
    format!(
        r#"<div style="flex:1;min-width:140px;background:#ffffff;border-radius:12px;padding:20px;border:1px solid #e2e8f0;border-top:3px solid {color};">
  <div style="font-size:28px;font-weight:800;color:#1e293b;line-height:1;">{value}</div>
  <div style="font-size:12px;color:#94a3b8;margin-top:6px;font-weight:500;">{label}</div>
</div>"#,
    )
}

fn linked_badge(linked: bool) -> &'static str {
    if linked {
        r#"<span style="background:#d1fae5;color:#065f46;padding:2px 8px;border-radius:12px;font-size:12px;">&#10003; Linked</span>"#
    } else {
        r#"<span style="background:#fee2e2;color:#991b1b;padding:2px 8px;border-radius:12px;font-size:12px;">&#10007; None</span>"#
    }
}

fn cohort_row(member: &CohortMember) -> String {
    let screens = if member.screens.is_empty() {
        "—".to_string()
    } else {
        escape(&member.screens.join(", "))
    };
    format!(
        r#"<tr style="border-bottom:1px solid #f1f5f9;">
  <td style="padding:10px 12px;font-size:13px;font-family:monospace;color:#475569;">{user}</td>
  <td style="padding:10px 12px;text-align:center;">{card}</td>
  <td style="padding:10px 12px;text-align:center;">{bank}</td>
  <td style="padding:10px 12px;font-size:12px;color:#64748b;">{cards}</td>
  <td style="padding:10px 12px;font-size:12px;color:#64748b;">{banks}</td>
  <td style="padding:10px 12px;font-size:12px;color:#64748b;max-width:220px;overflow:hidden;">{screens}</td>
  <td style="padding:10px 12px;font-size:12px;color:#64748b;">{mins} min</td>
  <td style="padding:10px 12px;font-size:12px;color:#64748b;">{sessions}</td>
</tr>"#,
        user = escape(&member.user_key),
        card = linked_badge(member.card_linked),
        bank = linked_badge(member.bank_linked),
        cards = member.cards_count,
        banks = member.banks_count,
        screens = screens,
        mins = member.time_spent_mins,
        sessions = member.session_count,
    )
}

/// The full inline-styled HTML email.
pub fn render_html(report: &DailyReport, analysis: &Analysis, date: NaiveDate) -> String {
    let date_str = date.format("%A, %B %d, %Y").to_string();

    let cards = [
        metric_card("New Signups", &report.new_signup_count.to_string(), "#6366f1"),
        metric_card("Daily Active Users", &report.total_active_users.to_string(), "#0ea5e9"),
        metric_card("Cards Linked", &report.card_linked_count.to_string(), "#10b981"),
        metric_card("Banks Linked", &report.bank_linked_count.to_string(), "#f59e0b"),
        metric_card("Avg Session", &format!("{} min", report.avg_session_mins), "#8b5cf6"),
    ]
    .join("\n");

    let table_rows = if report.new_signups.is_empty() {
        r#"<tr><td colspan="8" style="padding:20px;text-align:center;color:#94a3b8;">No new signups yesterday.</td></tr>"#.to_string()
    } else {
        report
            .new_signups
            .iter()
            .map(cohort_row)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let th = |label: &str, align: &str| {
        format!(
            r#"<th style="padding:10px 12px;text-align:{align};font-size:11px;font-weight:600;color:#64748b;text-transform:uppercase;letter-spacing:0.05em;">{label}</th>"#
        )
    };
    let header_row = [
        th("User ID", "left"),
        th("Card", "center"),
        th("Bank", "center"),
        th("# Cards", "left"),
        th("# Banks", "left"),
        th("Screens Visited", "left"),
        th("Time Spent", "left"),
        th("Sessions", "left"),
    ]
    .join("");

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1"></head>
<body style="margin:0;padding:0;background:#f8fafc;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;">
  <div style="max-width:860px;margin:0 auto;padding:32px 16px;">

    <div style="background:linear-gradient(135deg,#1e293b 0%,#334155 100%);border-radius:16px;padding:32px 36px;margin-bottom:24px;">
      <div style="color:#94a3b8;font-size:13px;font-weight:500;letter-spacing:0.05em;text-transform:uppercase;margin-bottom:8px;">Daily Intelligence Report</div>
      <div style="color:#f1f5f9;font-size:24px;font-weight:700;">{date_str}</div>
    </div>

    <div style="display:flex;gap:16px;margin-bottom:24px;flex-wrap:wrap;">
{cards}
    </div>

    <div style="background:#ffffff;border-radius:12px;padding:28px 32px;margin-bottom:20px;border:1px solid #e2e8f0;">
      <div style="font-size:11px;font-weight:700;letter-spacing:0.08em;text-transform:uppercase;color:#94a3b8;margin-bottom:16px;">Executive Summary</div>
      <div style="color:#1e293b;font-size:15px;line-height:1.75;">{exec}</div>
    </div>

    <div style="display:flex;gap:16px;margin-bottom:24px;flex-wrap:wrap;">
      <div style="flex:1;min-width:280px;background:#ffffff;border-radius:12px;padding:24px 28px;border:1px solid #e2e8f0;">
        <div style="font-size:11px;font-weight:700;letter-spacing:0.08em;text-transform:uppercase;color:#94a3b8;margin-bottom:14px;">Key Highlights</div>
        <div style="color:#1e293b;font-size:14px;line-height:1.7;">{highlights}</div>
      </div>
      <div style="flex:1;min-width:280px;background:#fff7ed;border-radius:12px;padding:24px 28px;border:1px solid #fed7aa;">
        <div style="font-size:11px;font-weight:700;letter-spacing:0.08em;text-transform:uppercase;color:#c2410c;margin-bottom:14px;">Watch List</div>
        <div style="color:#431407;font-size:14px;line-height:1.7;">{watch_list}</div>
      </div>
    </div>

    <div style="background:#ffffff;border-radius:12px;border:1px solid #e2e8f0;margin-bottom:24px;overflow:hidden;">
      <div style="padding:20px 28px;border-bottom:1px solid #f1f5f9;">
        <div style="font-size:11px;font-weight:700;letter-spacing:0.08em;text-transform:uppercase;color:#94a3b8;margin-bottom:4px;">New User Breakdown</div>
        <div style="font-size:22px;font-weight:700;color:#1e293b;">{signups} new signups yesterday</div>
      </div>
      <div style="overflow-x:auto;">
        <table style="width:100%;border-collapse:collapse;">
          <thead><tr style="background:#f8fafc;">{header_row}</tr></thead>
          <tbody>
{table_rows}
          </tbody>
        </table>
      </div>
    </div>

    <div style="text-align:center;color:#94a3b8;font-size:12px;padding:16px;">
      Automated Daily Report · Data from Amplitude
    </div>

  </div>
</body>
</html>"#,
        date_str = escape(&date_str),
        cards = cards,
        exec = markdown_to_html(&analysis.executive_summary),
        highlights = markdown_to_html(&analysis.highlights),
        watch_list = markdown_to_html(&analysis.watch_list),
        signups = report.new_signup_count,
        header_row = header_row,
        table_rows = table_rows,
    )
}

/// Plain-text fallback body.
pub fn render_plain(report: &DailyReport, analysis: &Analysis, date: NaiveDate) -> String {
    format!(
        "Daily Report — {date}\n\n\
         METRICS\n\
         New Signups: {signups}\n\
         Daily Active Users: {dau}\n\
         Cards Linked: {cards}\n\
         Banks Linked: {banks}\n\
         Avg Session: {avg} min\n\
         Signup Completion: {signup_rate}\n\
         Card Link Success: {card_rate}\n\
         Bank Link Success: {bank_rate}\n\n\
         --- EXECUTIVE SUMMARY ---\n{exec}\n\n\
         --- KEY HIGHLIGHTS ---\n{highlights}\n\n\
         --- WATCH LIST ---\n{watch}\n",
        date = date.format("%b %d, %Y"),
        signups = report.new_signup_count,
        dau = report.total_active_users,
        cards = report.card_linked_count,
        banks = report.bank_linked_count,
        avg = report.avg_session_mins,
        signup_rate = report.rates.signup_completion,
        card_rate = report.rates.card_link_success,
        bank_rate = report.rates.bank_link_success,
        exec = analysis.executive_summary,
        highlights = analysis.highlights,
        watch = analysis.watch_list,
    )
}
