//! Content Generation
//!
//! Produces the audit report for a website. Generation is total: every
//! provider failure is absorbed here and replaced by [`fallback_audit`], so
//! callers always receive text.
//!
//! # Architecture
//!
//! ```text
//! website ──▶ audit_prompt ──▶ AuditGenerator::generate
//!                                     │
//!                   ┌─────────────────┼──────────────────┐
//!                   ▼                 ▼                  ▼
//!               Model text     Empty response       Fallback text
//!                             (placeholder)      (HTTP/network/schema)
//! ```

pub mod groq;
pub mod prompt;

use async_trait::async_trait;
use serde::Serialize;

pub use groq::GroqGenerator;
pub use prompt::audit_prompt;

/// Text returned when the provider answers without any message content
pub const EMPTY_RESPONSE_PLACEHOLDER: &str = "Audit generation completed.";

/// Where an audit's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSource {
    /// Model output, verbatim
    Model,
    /// Provider succeeded but returned no content
    EmptyResponse,
    /// Provider failed; canned customer-facing text
    Fallback,
}

/// Audit report text plus its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditResult {
    /// Report body
    pub text: String,
    /// Provenance
    pub source: AuditSource,
}

impl AuditResult {
    /// Model-generated audit
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AuditSource::Model,
        }
    }

    /// Placeholder for an empty provider response
    pub fn empty_response() -> Self {
        Self {
            text: EMPTY_RESPONSE_PLACEHOLDER.to_string(),
            source: AuditSource::EmptyResponse,
        }
    }

    /// Fallback audit for `website`
    pub fn fallback(website: &str) -> Self {
        Self {
            text: fallback_audit(website),
            source: AuditSource::Fallback,
        }
    }
}

/// Source of audit reports.
///
/// Implementations must not fail: provider errors are turned into
/// [`AuditResult::fallback`].
#[async_trait]
pub trait AuditGenerator: Send + Sync {
    /// Generate an audit for `website`
    async fn generate(&self, website: &str) -> AuditResult;
}

/// Customer-safe audit sent when generation fails
pub fn fallback_audit(website: &str) -> String {
    format!(
        "**AI-Powered Business Automation Audit for {website}**\n\
\n\
Thank you for choosing Cyrnel Origin. Our system has received your request for {website}.\n\
\n\
Due to high demand on our AI systems, your full customized audit is being finalized by our \
specialists and will be delivered within 24 hours.\n\
\n\
In the meantime, our preliminary analysis suggests significant automation potential in lead \
management and customer onboarding processes.\n\
\n\
-- Cyrnel Origin Automation Team"
    )
}
