//! Resend transactional email client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::EMAIL_ENDPOINT;
use crate::delivery::{Mailer, MessageId, OutboundEmail};
use crate::error::DeliveryError;

/// Send-email response body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResendResponse {
    /// Email accepted
    Sent {
        /// Provider message id
        id: String,
    },
    /// Email rejected
    Error {
        /// Error name, e.g. `validation_error`
        #[serde(default)]
        name: Option<String>,
        /// Human-readable message
        message: String,
    },
}

impl ResendResponse {
    /// Convert into the mailer result, `status` being the HTTP status code
    pub fn into_result(self, status: u16) -> Result<MessageId, DeliveryError> {
        match self {
            Self::Sent { id } => Ok(id),
            Self::Error { name, message } => Err(DeliveryError::Provider {
                name: name.unwrap_or_else(|| format!("http_{status}")),
                message,
            }),
        }
    }
}

/// Mailer backed by the Resend HTTP API
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl ResendMailer {
    /// Create a mailer against the production endpoint
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: EMAIL_ENDPOINT.to_string(),
        }
    }

    /// Point the mailer at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<MessageId, DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;
        debug!(status = status.as_u16(), "Email provider responded");

        let parsed: ResendResponse = serde_json::from_str(&body).map_err(|e| {
            DeliveryError::MalformedResponse(format!("status {}: {e}: {body}", status.as_u16()))
        })?;

        match parsed {
            // An id on an error status is still a rejection.
            ResendResponse::Sent { .. } if !status.is_success() => Err(DeliveryError::Provider {
                name: format!("http_{}", status.as_u16()),
                message: body,
            }),
            parsed => parsed.into_result(status.as_u16()),
        }
    }
}
