use chrono::NaiveDate;
use daypulse_types::{Analysis, DailyReport};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::prompt::build_prompt;
use crate::sections::parse_sections;
use crate::{Error, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u64 = 1500;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

/// Messages API client that narrates a daily report.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    client: reqwest::Client,
    config: AnalyzerConfig,
}

impl AnalyzerClient {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(config.api_key.trim())
                .map_err(|e| Error::InvalidResponse(format!("invalid API key header: {e}")))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(AnalyzerClient { client, config })
    }

    fn messages_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        if base.ends_with("/messages") {
            return base.to_string();
        }
        format!("{base}/messages")
    }

    /// Generate the three-section narrative for one day's report.
    pub async fn analyze(&self, report: &DailyReport, date: NaiveDate) -> Result<Analysis> {
        let prompt = build_prompt(report, date);
        let body = json!({
            "model": self.config.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(self.messages_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        let text = extract_message_text(&raw)?;
        Ok(parse_sections(&text))
    }
}

/// Pull the first text block out of a Messages API response body.
fn extract_message_text(raw: &str) -> Result<String> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::InvalidResponse(format!("response is not JSON: {e}")))?;

    value["content"]
        .as_array()
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|block| block["type"] == "text")
                .and_then(|block| block["text"].as_str())
        })
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidResponse("no text content block in response".to_string()))
}
