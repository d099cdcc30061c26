// Final consumer of the pipeline: renders the report + narrative into an
// HTML email (inline styles only - email clients strip stylesheets) with a
// plain-text fallback, and delivers it through the SendGrid v3 mail API.

mod error;
mod render;
mod sendgrid;

pub use error::{Error, Result};
pub use render::{render_html, render_plain, subject_line};
pub use sendgrid::{Mailer, MailerConfig};
