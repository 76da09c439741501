//! Order Processor
//!
//! Runs the whole sale flow for one webhook delivery and assembles the HTTP
//! response.
//!
//! # Architecture
//!
//! ```text
//! Request ──▶ [Method check] ──▶ [Parse form] ──▶ [Normalize order]
//!                  │                  │                  │
//!                  ▼                  ▼                  ▼
//!                 405                400                400
//!
//!         ──▶ [Generate audit] ──▶ [Deliver email] ──▶ 200 + summary
//!                 (total)            (outcome in body)
//! ```
//!
//! Generation and delivery run sequentially, once each. Once intake passes
//! the response is always `200 OK`; delivery failure is reported through
//! `success`/`delivered` in the body.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use chrono::Utc;
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::delivery::{deliver_audit, AuditEmail, DeliveryOutcome, Mailer};
use crate::error::IntakeError;
use crate::generation::{AuditGenerator, AuditSource};
use crate::handlers::health_handler;
use crate::intake::{NormalizedOrder, SaleEvent};

/// Webhook path
pub const PROCESS_SALE_PATH: &str = "/process-sale";

/// Webhook path kept for senders configured against the hosted function URL
pub const LEGACY_PROCESS_SALE_PATH: &str = "/.netlify/functions/process-sale";

/// Message when the audit reached the customer
pub const DELIVERED_MESSAGE: &str = "Audit completed and delivered.";

/// Message when the email could not be sent
pub const DELIVERY_FAILED_MESSAGE: &str = "Audit generated but delivery failed.";

/// Summary of the processed audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Always true: generation falls back rather than failing
    pub generated: bool,
    /// Whether the email was accepted by the provider
    pub delivered: bool,
    /// Order id as shown to the customer
    pub order_id: String,
    /// Normalised website
    pub business_website: String,
}

/// Body of every `200 OK` webhook response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSaleResponse {
    /// Mirrors delivery success
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Audit summary
    pub audit: AuditSummary,
}

impl ProcessSaleResponse {
    /// Assemble the response for a processed order
    pub fn new(order: &NormalizedOrder, outcome: &DeliveryOutcome) -> Self {
        let delivered = outcome.is_success();
        Self {
            success: delivered,
            message: if delivered {
                DELIVERED_MESSAGE
            } else {
                DELIVERY_FAILED_MESSAGE
            }
            .to_string(),
            audit: AuditSummary {
                generated: true,
                delivered,
                order_id: order.order_id.clone(),
                business_website: order.website.clone(),
            },
        }
    }
}

/// Sale webhook orchestrator.
///
/// Holds the two outbound dependencies; nothing else is shared between
/// invocations.
pub struct OrderProcessor {
    generator: Arc<dyn AuditGenerator>,
    mailer: Arc<dyn Mailer>,
}

impl OrderProcessor {
    /// Create a processor from its collaborators
    pub fn new(generator: Arc<dyn AuditGenerator>, mailer: Arc<dyn Mailer>) -> Self {
        Self { generator, mailer }
    }

    /// Validate and normalise an inbound request without calling out
    pub fn intake(method: &Method, body: &[u8]) -> Result<NormalizedOrder, IntakeError> {
        if method != Method::POST {
            return Err(IntakeError::MethodNotAllowed);
        }

        let event = SaleEvent::parse(body)?;
        info!("Webhook parsed successfully");
        NormalizedOrder::from_event(&event, Utc::now())
    }

    /// Generate and deliver the audit for a validated order
    #[instrument(skip_all, fields(order_id = %order.order_id, website = %order.website))]
    pub async fn process(&self, order: &NormalizedOrder) -> ProcessSaleResponse {
        info!(
            product = %order.product_name,
            customer = %order.display_name,
            email = %order.email,
            amount = %order.price,
            "Processing sale"
        );

        let audit = self.generator.generate(&order.website).await;
        if audit.source != AuditSource::Model {
            info!(source = ?audit.source, "Delivering substitute audit text");
        }

        let outcome = deliver_audit(
            self.mailer.as_ref(),
            AuditEmail {
                recipient: &order.email,
                display_name: &order.display_name,
                website: &order.website,
                audit: &audit.text,
                order_id: &order.order_id,
            },
        )
        .await;

        ProcessSaleResponse::new(order, &outcome)
    }

    /// Full request flow: intake, then generation and delivery
    pub async fn handle(&self, method: &Method, body: &[u8]) -> Response {
        match Self::intake(method, body) {
            Ok(order) => (StatusCode::OK, Json(self.process(&order).await)).into_response(),
            Err(e) => {
                tracing::warn!(error = %e, method = %method, "Rejected webhook request");
                e.into_response()
            }
        }
    }
}

/// Sale webhook handler.
///
/// # Route
/// `POST /process-sale`
///
/// # Response
/// - `200 OK` - `ProcessSaleResponse`, whatever the delivery outcome
/// - `400 Bad Request` - undecodable body or missing email
/// - `405 Method Not Allowed` - any method but POST
pub async fn process_sale_handler(
    State(processor): State<Arc<OrderProcessor>>,
    method: Method,
    body: Bytes,
) -> Response {
    processor.handle(&method, &body).await
}

/// Router with the webhook and health endpoints.
///
/// The webhook routes accept every method so that non-POST requests get the
/// JSON 405 body from [`IntakeError::MethodNotAllowed`].
pub fn router(processor: Arc<OrderProcessor>) -> Router {
    Router::new()
        .route(PROCESS_SALE_PATH, any(process_sale_handler))
        .route(LEGACY_PROCESS_SALE_PATH, any(process_sale_handler))
        .route("/health", get(health_handler))
        .with_state(processor)
}
