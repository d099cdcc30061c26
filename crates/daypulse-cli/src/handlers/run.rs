use anyhow::{Context, Result};
use chrono::NaiveDate;
use daypulse_amplitude::{ExportClient, ExportConfig};
use daypulse_engine::reduce_events;
use daypulse_llm::{AnalyzerClient, AnalyzerConfig};
use daypulse_mailer::{Mailer, MailerConfig, render_html, render_plain, subject_line};
use daypulse_types::{Analysis, DailyReport};

use crate::config::Config;
use crate::console;

/// The full daily pipeline: fetch -> reduce -> narrate -> deliver.
///
/// An empty export day still produces and delivers an all-zero report - the
/// founders should hear about a quiet day too. A failed narrative degrades
/// to a placeholder; a failed fetch or delivery aborts the run.
pub async fn execute(config: &Config, date: NaiveDate, dry_run: bool) -> Result<()> {
    let date_str = date.format("%Y-%m-%d").to_string();
    console::step(&format!("Daily report for {date_str}"));

    console::step("[1/3] Fetching events from Amplitude");
    let events = fetch_events(config, date).await?;
    console::detail(&format!("{} events fetched", events.len()));
    if events.is_empty() {
        console::warn("no events found for that day — sending an all-zero report");
    }

    let report = reduce_events(&config.report, &date_str, &events);
    console::detail(&format!("active users:  {}", report.total_active_users));
    console::detail(&format!("new signups:   {}", report.new_signup_count));
    console::detail(&format!("cards linked:  {}", report.card_linked_count));
    console::detail(&format!("banks linked:  {}", report.bank_linked_count));

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&report)?);
        println!("{}", render_plain(&report, &Analysis::unavailable(), date));
        console::success("dry run complete, nothing was sent");
        return Ok(());
    }

    console::step("[2/3] Generating narrative");
    let analysis = analyze(config, &report, date).await;

    console::step("[3/3] Delivering email");
    deliver(config, &report, &analysis, date).await?;

    console::success(&format!("report for {date_str} delivered"));
    Ok(())
}

async fn fetch_events(
    config: &Config,
    date: NaiveDate,
) -> Result<Vec<daypulse_types::EventRecord>> {
    let client = ExportClient::new(ExportConfig {
        api_base: config.amplitude.api_base.clone(),
        api_key: std::env::var("AMPLITUDE_API_KEY").unwrap_or_default(),
        secret_key: std::env::var("AMPLITUDE_SECRET_KEY").unwrap_or_default(),
    })
    .context("configuring the Amplitude export client")?;

    client
        .fetch_day(date)
        .await
        .context("fetching the daily export (check AMPLITUDE_API_KEY / AMPLITUDE_SECRET_KEY and that the Export API is enabled)")
}

/// Narrative generation degrades instead of failing: the numbers matter
/// more than the prose.
async fn analyze(config: &Config, report: &DailyReport, date: NaiveDate) -> Analysis {
    let client = AnalyzerClient::new(AnalyzerConfig {
        api_base: config.llm.api_base.clone(),
        api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
        model: config.llm.model.clone(),
    });

    let client = match client {
        Ok(client) => client,
        Err(e) => {
            console::warn(&format!("analyzer unavailable: {e}"));
            return Analysis::unavailable();
        }
    };

    match client.analyze(report, date).await {
        Ok(analysis) => analysis,
        Err(e) => {
            console::warn(&format!("narrative generation failed: {e}"));
            Analysis::unavailable()
        }
    }
}

async fn deliver(
    config: &Config,
    report: &DailyReport,
    analysis: &Analysis,
    date: NaiveDate,
) -> Result<()> {
    let mailer = Mailer::new(MailerConfig {
        api_base: config.email.api_base.clone(),
        api_key: std::env::var("SENDGRID_API_KEY").unwrap_or_default(),
        from_email: config.email.from_email.clone(),
        to_emails: config.email.to_emails.clone(),
    })
    .context("configuring the mailer (check SENDGRID_API_KEY and the [email] config section)")?;

    let subject = subject_line(date);
    let plain = render_plain(report, analysis, date);
    let html = render_html(report, analysis, date);

    mailer
        .send(&subject, &plain, &html)
        .await
        .context("delivering the report email")
}
