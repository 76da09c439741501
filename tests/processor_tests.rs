//! Webhook handler tests
//!
//! Drive the router end to end with in-process doubles for the generator and
//! the mailer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use sale_audit::delivery::MessageId;
use sale_audit::error::DeliveryError;
use sale_audit::generation::fallback_audit;
use sale_audit::{
    router, AuditGenerator, AuditResult, Mailer, OrderProcessor, OutboundEmail,
    ProcessSaleResponse,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const SALE_BODY: &str = "email=jane@acme.com&full_name=Jane+Doe&sale_id=S1\
&custom_fields[website]=https://www.acme.com&price=9900";

enum GeneratorMode {
    Report(&'static str),
    Failing,
}

struct StubGenerator {
    mode: GeneratorMode,
    calls: AtomicUsize,
    websites: Mutex<Vec<String>>,
}

impl StubGenerator {
    fn new(mode: GeneratorMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: AtomicUsize::new(0),
            websites: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AuditGenerator for StubGenerator {
    async fn generate(&self, website: &str) -> AuditResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.websites.lock().unwrap().push(website.to_string());
        match self.mode {
            GeneratorMode::Report(text) => AuditResult::model(text),
            GeneratorMode::Failing => AuditResult::fallback(website),
        }
    }
}

struct StubMailer {
    fail: bool,
    sent: Mutex<Vec<OutboundEmail>>,
}

impl StubMailer {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<MessageId, DeliveryError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            Err(DeliveryError::Provider {
                name: "validation_error".to_string(),
                message: "domain not verified".to_string(),
            })
        } else {
            Ok("msg_abc".to_string())
        }
    }
}

fn app(generator: Arc<StubGenerator>, mailer: Arc<StubMailer>) -> axum::Router {
    router(Arc::new(OrderProcessor::new(generator, mailer)))
}

fn form_request(method: Method, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_sale_delivered() {
    let generator = StubGenerator::new(GeneratorMode::Report("Executive summary\nQuick wins"));
    let mailer = StubMailer::new(false);

    let response = app(generator.clone(), mailer.clone())
        .oneshot(form_request(Method::POST, "/process-sale", SALE_BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "success": true,
            "message": "Audit completed and delivered.",
            "audit": {
                "generated": true,
                "delivered": true,
                "order_id": "S1",
                "business_website": "acme.com"
            }
        })
    );

    assert_eq!(*generator.websites.lock().unwrap(), vec!["acme.com".to_string()]);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["jane@acme.com".to_string()]);
    assert!(sent[0].html.contains("Hi <strong>Jane Doe</strong>"));
    assert!(sent[0].html.contains("Executive summary<br>Quick wins"));
    assert!(sent[0].text.contains("Executive summary\nQuick wins"));
    assert_eq!(sent[0].tags[0].value, "S1");
}

#[tokio::test]
async fn test_generation_failure_still_delivers_fallback() {
    let generator = StubGenerator::new(GeneratorMode::Failing);
    let mailer = StubMailer::new(false);

    let response = app(generator, mailer.clone())
        .oneshot(form_request(Method::POST, "/process-sale", SALE_BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ProcessSaleResponse = serde_json::from_value(json_body(response).await).unwrap();
    assert!(body.success);
    assert!(body.audit.generated);

    let sent = mailer.sent();
    assert_eq!(
        sent[0].text,
        format!(
            "CYRNEL ORIGIN AUDIT\n\nFor: acme.com\n\n{}\n\n---\nOrder Reference: S1",
            fallback_audit("acme.com")
        )
    );
}

#[tokio::test]
async fn test_delivery_failure_reported_in_body() {
    let generator = StubGenerator::new(GeneratorMode::Report("Report"));
    let mailer = StubMailer::new(true);

    let response = app(generator, mailer)
        .oneshot(form_request(Method::POST, "/process-sale", SALE_BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "success": false,
            "message": "Audit generated but delivery failed.",
            "audit": {
                "generated": true,
                "delivered": false,
                "order_id": "S1",
                "business_website": "acme.com"
            }
        })
    );
}

#[tokio::test]
async fn test_non_post_is_405_without_outbound_calls() {
    for method in [Method::GET, Method::PUT, Method::PATCH, Method::DELETE] {
        let generator = StubGenerator::new(GeneratorMode::Report("Report"));
        let mailer = StubMailer::new(false);

        let response = app(generator.clone(), mailer.clone())
            .oneshot(form_request(method.clone(), "/process-sale", SALE_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(json_body(response).await, json!({ "error": "Method not allowed" }));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(mailer.sent().is_empty());
    }
}

#[tokio::test]
async fn test_malformed_body_is_400_without_outbound_calls() {
    let generator = StubGenerator::new(GeneratorMode::Report("Report"));
    let mailer = StubMailer::new(false);

    let response = app(generator.clone(), mailer.clone())
        .oneshot(form_request(
            Method::POST,
            "/process-sale",
            b"email=%FF%FE&sale_id=S1".to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Invalid data format" }));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_missing_email_is_400() {
    let generator = StubGenerator::new(GeneratorMode::Report("Report"));
    let mailer = StubMailer::new(false);

    let response = app(generator.clone(), mailer.clone())
        .oneshot(form_request(Method::POST, "/process-sale", "sale_id=S1&email="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Missing customer email" })
    );
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_defaults_without_optional_fields() {
    let generator = StubGenerator::new(GeneratorMode::Report("Report"));
    let mailer = StubMailer::new(false);

    let response = app(generator.clone(), mailer.clone())
        .oneshot(form_request(Method::POST, "/process-sale", "email=sam%40shop.io"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ProcessSaleResponse = serde_json::from_value(json_body(response).await).unwrap();
    assert!(body.audit.order_id.starts_with("ORD-"));
    assert_eq!(body.audit.business_website, "Not provided");
    assert_eq!(
        *generator.websites.lock().unwrap(),
        vec!["Not provided".to_string()]
    );
    assert!(mailer.sent()[0].html.contains("Hi <strong>sam</strong>"));
}

#[tokio::test]
async fn test_tag_is_sanitized_but_body_keeps_order_id() {
    let generator = StubGenerator::new(GeneratorMode::Report("Report"));
    let mailer = StubMailer::new(false);

    let response = app(generator, mailer.clone())
        .oneshot(form_request(
            Method::POST,
            "/process-sale",
            "email=a%40b.com&sale_id=abc%3D%3D123!!",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ProcessSaleResponse = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(body.audit.order_id, "abc==123!!");

    let sent = mailer.sent();
    assert_eq!(sent[0].tags[0].value, "abc__123__");
    assert!(sent[0].text.ends_with("Order Reference: abc==123!!"));
}

#[tokio::test]
async fn test_legacy_path_is_served() {
    let generator = StubGenerator::new(GeneratorMode::Report("Report"));
    let mailer = StubMailer::new(false);

    let response = app(generator, mailer)
        .oneshot(form_request(
            Method::POST,
            "/.netlify/functions/process-sale",
            SALE_BODY,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint() {
    let generator = StubGenerator::new(GeneratorMode::Report("Report"));
    let mailer = StubMailer::new(false);

    let response = app(generator.clone(), mailer)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}
