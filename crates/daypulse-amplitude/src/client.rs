use chrono::NaiveDate;
use daypulse_types::EventRecord;
use tokio::time::sleep;

use crate::decode::decode_export_archive;
use crate::retry::{MAX_RETRIES, is_retryable_http_error, next_backoff_ms, should_retry_status};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub api_base: String,
    pub api_key: String,
    pub secret_key: String,
}

/// Client for the Amplitude Export API. One call per day of data; the
/// response is a gzipped NDJSON archive covering hours 00-23 UTC.
#[derive(Debug, Clone)]
pub struct ExportClient {
    client: reqwest::Client,
    config: ExportConfig,
}

impl ExportClient {
    pub fn new(config: ExportConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() || config.secret_key.trim().is_empty() {
            return Err(Error::MissingCredentials(
                "export API key and secret key are both required".to_string(),
            ));
        }

        let client = reqwest::Client::builder().build()?;
        Ok(ExportClient { client, config })
    }

    fn export_url(&self) -> String {
        format!("{}/export", self.config.api_base.trim_end_matches('/'))
    }

    /// Download and decode all events for one calendar day (UTC).
    ///
    /// 404 means Amplitude has no archive for that day - a quiet day or a
    /// paused project - and comes back as an empty batch, not an error.
    pub async fn fetch_day(&self, date: NaiveDate) -> Result<Vec<EventRecord>> {
        let url = self.export_url();
        let start = format!("{}T00", date.format("%Y%m%d"));
        let end = format!("{}T23", date.format("%Y%m%d"));

        for attempt in 0..=MAX_RETRIES {
            let response = self
                .client
                .get(&url)
                .basic_auth(&self.config.api_key, Some(&self.config.secret_key))
                .query(&[("start", start.as_str()), ("end", end.as_str())])
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 404 {
                        return Ok(Vec::new());
                    }
                    if status.is_success() {
                        let bytes = response.bytes().await?;
                        return decode_export_archive(&bytes);
                    }

                    if attempt < MAX_RETRIES && should_retry_status(status.as_u16()) {
                        sleep(std::time::Duration::from_millis(next_backoff_ms(attempt))).await;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(error) => {
                    if attempt < MAX_RETRIES && is_retryable_http_error(&error) {
                        sleep(std::time::Duration::from_millis(next_backoff_ms(attempt))).await;
                        continue;
                    }
                    return Err(Error::Http(error));
                }
            }
        }

        unreachable!("retry loop always returns")
    }
}
