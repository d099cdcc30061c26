use serde_json::json;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub api_base: String,
    pub api_key: String,
    pub from_email: String,
    pub to_emails: Vec<String>,
}

/// SendGrid v3 mail client. Delivery failure is fatal to the run - the
/// whole point of the pipeline is that this email arrives.
#[derive(Debug, Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl Mailer {
    pub fn new(config: MailerConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingConfig("SendGrid API key is empty".to_string()));
        }
        if config.from_email.trim().is_empty() {
            return Err(Error::MissingConfig("sender address is empty".to_string()));
        }
        if config.to_emails.iter().all(|e| e.trim().is_empty()) {
            return Err(Error::MissingConfig("no recipient addresses".to_string()));
        }

        let client = reqwest::Client::builder().build()?;
        Ok(Mailer { client, config })
    }

    fn send_url(&self) -> String {
        format!("{}/v3/mail/send", self.config.api_base.trim_end_matches('/'))
    }

    /// Send one report email to every configured recipient.
    pub async fn send(&self, subject: &str, plain_body: &str, html_body: &str) -> Result<()> {
        let to: Vec<_> = self
            .config
            .to_emails
            .iter()
            .filter(|e| !e.trim().is_empty())
            .map(|e| json!({"email": e.trim()}))
            .collect();

        let payload = json!({
            "personalizations": [{"to": to}],
            "from": {"email": self.config.from_email},
            "subject": subject,
            "content": [
                {"type": "text/plain", "value": plain_body},
                {"type": "text/html", "value": html_body},
            ],
        });

        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailerConfig {
        MailerConfig {
            api_base: "https://api.sendgrid.com".to_string(),
            api_key: "key".to_string(),
            from_email: "reports@example.com".to_string(),
            to_emails: vec!["founders@example.com".to_string()],
        }
    }

    #[test]
    fn test_new_rejects_missing_pieces() {
        let mut no_key = config();
        no_key.api_key = String::new();
        assert!(matches!(Mailer::new(no_key), Err(Error::MissingConfig(_))));

        let mut no_recipients = config();
        no_recipients.to_emails = vec!["  ".to_string()];
        assert!(matches!(Mailer::new(no_recipients), Err(Error::MissingConfig(_))));
    }

    #[test]
    fn test_send_url() {
        let mailer = Mailer::new(config()).unwrap();
        assert_eq!(mailer.send_url(), "https://api.sendgrid.com/v3/mail/send");
    }
}
