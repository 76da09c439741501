//! Sale Audit - Webhook-Driven Automation Audit Delivery
//!
//! This crate receives a sale webhook, asks a language model for an
//! "AI-Powered Business Automation Audit" of the buyer's website, and emails
//! the report to the buyer.
//!
//! # Features
//!
//! - **Request Intake**: Form-encoded webhook parsing into a typed order
//! - **Content Generation**: Chat-completions audit with a customer-safe fallback
//! - **Notification Delivery**: HTML + plain-text email through a transactional provider
//! - **Response Assembly**: JSON summary, `200 OK` once the request is valid
//!
//! # Architecture
//!
//! ```text
//! Sale webhook ──▶ OrderProcessor ──▶ AuditGenerator (LLM)
//!                       │                   │
//!                       │                   ▼
//!                       │              AuditResult
//!                       ▼                   │
//!                 JSON summary ◀── Mailer ◀─┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sale_audit::{AppConfig, GroqGenerator, OrderProcessor, ResendMailer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let http = reqwest::Client::new();
//!     let processor = OrderProcessor::new(
//!         Arc::new(GroqGenerator::new(http.clone(), config.groq_api_key)),
//!         Arc::new(ResendMailer::new(http, config.resend_api_key)),
//!     );
//!
//!     let app = sale_audit::router(Arc::new(processor));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8888").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod delivery;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod intake;
pub mod processor;

// Re-exports for convenience
pub use config::AppConfig;
pub use delivery::{DeliveryOutcome, Mailer, OutboundEmail, ResendMailer};
pub use error::{Error, Result};
pub use generation::{AuditGenerator, AuditResult, AuditSource, GroqGenerator};
pub use intake::{NormalizedOrder, SaleEvent};
pub use processor::{router, OrderProcessor, ProcessSaleResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
