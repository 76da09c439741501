//! Notification Delivery
//!
//! Renders the audit email and hands it to a [`Mailer`]. Provider failures
//! never propagate; they become a failed [`DeliveryOutcome`].

pub mod resend;
pub mod template;

use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::Datelike;
use regex::Regex;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::{EMAIL_FROM, EMAIL_TAG_NAME};
use crate::error::DeliveryError;

pub use resend::ResendMailer;
pub use template::{render_html, render_subject, render_text};

/// Longest tag value the provider accepts
pub const MAX_TAG_LEN: usize = 50;

/// Provider metadata label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailTag {
    /// Tag name
    pub name: String,
    /// Tag value, restricted to `[A-Za-z0-9_-]`
    pub value: String,
}

/// Fully rendered email ready for a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    /// Sender identity
    pub from: String,
    /// Recipients
    pub to: Vec<String>,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
    /// Plain-text body
    pub text: String,
    /// Provider tags
    pub tags: Vec<EmailTag>,
}

/// Audit email inputs
#[derive(Debug, Clone, Copy)]
pub struct AuditEmail<'a> {
    /// Recipient address
    pub recipient: &'a str,
    /// Greeting name
    pub display_name: &'a str,
    /// Normalised website
    pub website: &'a str,
    /// Audit text
    pub audit: &'a str,
    /// Order id as shown to the customer
    pub order_id: &'a str,
}

impl AuditEmail<'_> {
    /// Render the outbound email, stamping the footer with `year`
    pub fn render(&self, year: i32) -> OutboundEmail {
        OutboundEmail {
            from: EMAIL_FROM.to_string(),
            to: vec![self.recipient.to_string()],
            subject: render_subject(self.website),
            html: render_html(self.display_name, self.website, self.audit, self.order_id, year),
            text: render_text(self.website, self.audit, self.order_id),
            tags: vec![EmailTag {
                name: EMAIL_TAG_NAME.to_string(),
                value: sanitize_tag(self.order_id),
            }],
        }
    }
}

/// Provider-assigned message id
pub type MessageId = String;

/// Transactional email backend
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one email, returning the provider's message id
    async fn send(&self, email: &OutboundEmail) -> Result<MessageId, DeliveryError>;
}

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Provider accepted the email
    Delivered {
        /// Provider message id
        message_id: MessageId,
    },
    /// Provider rejected the email or could not be reached
    Failed {
        /// Error message
        error: String,
    },
}

impl DeliveryOutcome {
    /// Whether the email was accepted
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Provider message id on success
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Delivered { message_id } => Some(message_id),
            Self::Failed { .. } => None,
        }
    }

    /// Error message on failure
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Delivered { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

fn illegal_tag_chars() -> &'static Regex {
    static ILLEGAL: OnceLock<Regex> = OnceLock::new();
    ILLEGAL.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid tag pattern"))
}

/// Make an order id safe for use as a tag value.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`, then the result is
/// cut to [`MAX_TAG_LEN`] characters.
pub fn sanitize_tag(order_id: &str) -> String {
    illegal_tag_chars()
        .replace_all(order_id, "_")
        .chars()
        .take(MAX_TAG_LEN)
        .collect()
}

/// Render and send the audit email.
///
/// Never fails; provider errors are logged and reported as
/// [`DeliveryOutcome::Failed`].
#[instrument(skip_all, fields(order_id = %email.order_id, recipient = %email.recipient))]
pub async fn deliver_audit(mailer: &dyn Mailer, email: AuditEmail<'_>) -> DeliveryOutcome {
    info!("Sending audit email");
    let outbound = email.render(chrono::Utc::now().year());

    match mailer.send(&outbound).await {
        Ok(message_id) => {
            info!(message_id = %message_id, "Email delivered");
            DeliveryOutcome::Delivered { message_id }
        }
        Err(e) => {
            error!(error = %e, "Email delivery failed");
            DeliveryOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}
