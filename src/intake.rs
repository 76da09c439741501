//! Request Intake
//!
//! Decodes the form-encoded sale webhook into a typed [`SaleEvent`] and
//! derives the [`NormalizedOrder`] the rest of the flow works from.
//!
//! ```text
//! raw body ──▶ SaleEvent::parse ──▶ NormalizedOrder::from_event
//!                   │                        │
//!                   ▼                        ▼
//!          400 Invalid data format   400 Missing customer email
//! ```

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use percent_encoding::percent_decode;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::IntakeError;

/// Form key carrying the buyer's website as a product custom field
pub const CUSTOM_WEBSITE_KEY: &str = "custom_fields[website]";

/// Plain form key carrying the buyer's website
pub const WEBSITE_KEY: &str = "website";

/// Website placeholder when the buyer gave none
pub const WEBSITE_NOT_PROVIDED: &str = "Not provided";

/// Display name when neither full name nor email local part is usable
pub const DEFAULT_DISPLAY_NAME: &str = "Valued Client";

/// Product name when the webhook carries none
pub const DEFAULT_PRODUCT_NAME: &str = "AI Audit";

/// Sale webhook fields this service consumes.
///
/// Every field is optional at the wire level; [`NormalizedOrder::from_event`]
/// decides which ones are required. Unknown keys are dropped. When a key is
/// repeated the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleEvent {
    /// `email`
    pub email: Option<String>,
    /// `product_name`
    pub product_name: Option<String>,
    /// `price`, integer cents
    pub price: Option<String>,
    /// `sale_id`
    pub sale_id: Option<String>,
    /// `full_name`
    pub full_name: Option<String>,
    /// `custom_fields[website]`
    pub custom_website: Option<String>,
    /// `website`
    pub website: Option<String>,
}

impl SaleEvent {
    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// Fails when the body, or any percent-decoded key or value, is not
    /// valid UTF-8.
    pub fn parse(body: &[u8]) -> Result<Self, IntakeError> {
        let body = std::str::from_utf8(body)
            .map_err(|e| IntakeError::InvalidFormat(format!("body is not UTF-8: {e}")))?;

        let mut event = Self::default();
        for pair in body.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key)?;
            let value = decode_component(value)?;
            event.assign(&key, value);
        }

        Ok(event)
    }

    fn assign(&mut self, key: &str, value: String) {
        let slot = match key {
            "email" => &mut self.email,
            "product_name" => &mut self.product_name,
            "price" => &mut self.price,
            "sale_id" => &mut self.sale_id,
            "full_name" => &mut self.full_name,
            CUSTOM_WEBSITE_KEY => &mut self.custom_website,
            WEBSITE_KEY => &mut self.website,
            _ => {
                debug!(key, "Ignoring unknown sale field");
                return;
            }
        };
        *slot = Some(value);
    }
}

fn decode_component(raw: &str) -> Result<String, IntakeError> {
    let spaced = raw.replace('+', " ");
    percent_decode(spaced.as_bytes())
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| IntakeError::InvalidFormat(format!("field `{raw}` is not UTF-8: {e}")))
}

/// Immutable view of a sale with every default applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedOrder {
    /// Recipient address, non-empty but otherwise unvalidated
    pub email: String,
    /// Greeting name
    pub display_name: String,
    /// Product name, for logging
    pub product_name: String,
    /// Price as a two-decimal string
    pub price: String,
    /// Upstream sale id, or a synthetic `ORD-<millis>` id
    pub order_id: String,
    /// Website with scheme and `www.` stripped; never empty
    pub website: String,
}

impl NormalizedOrder {
    /// Derive the order view from a parsed event.
    ///
    /// `now` seeds the synthetic order id when the event carries no sale id.
    pub fn from_event(event: &SaleEvent, now: DateTime<Utc>) -> Result<Self, IntakeError> {
        let email = non_empty(&event.email)
            .map(str::to_string)
            .ok_or(IntakeError::MissingEmail)?;

        let display_name = non_empty(&event.full_name)
            .map(str::to_string)
            .or_else(|| {
                email
                    .split('@')
                    .next()
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

        let order_id = non_empty(&event.sale_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("ORD-{}", now.timestamp_millis()));

        let website = non_empty(&event.custom_website)
            .or_else(|| non_empty(&event.website))
            .unwrap_or(WEBSITE_NOT_PROVIDED);

        Ok(Self {
            email,
            display_name,
            product_name: non_empty(&event.product_name)
                .unwrap_or(DEFAULT_PRODUCT_NAME)
                .to_string(),
            price: format_price(event.price.as_deref()),
            order_id,
            website: normalize_website(website),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Format integer cents as a two-decimal amount.
///
/// Absent or unparsable input yields `0.00`. A leading integer prefix is
/// accepted, so `"9900abc"` reads as 9900 cents.
pub fn format_price(cents: Option<&str>) -> String {
    let cents = cents
        .map(str::trim)
        .and_then(|raw| {
            let end = raw
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
                .map_or(raw.len(), |(i, _)| i);
            raw[..end].parse::<i64>().ok()
        })
        .unwrap_or(0);

    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn website_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"^(?:https?://)?(?:www\.)?").expect("valid prefix pattern")
    })
}

/// Strip a leading `http://`/`https://` and a leading `www.`.
///
/// Stripping repeats until nothing more matches, so the result is a fixed
/// point and `normalize_website(normalize_website(s)) == normalize_website(s)`
/// holds even for inputs such as `www.www.example.com`. An empty result
/// becomes [`WEBSITE_NOT_PROVIDED`].
pub fn normalize_website(raw: &str) -> String {
    let mut current = raw.trim();
    loop {
        let matched = website_prefix().find(current).map_or(0, |m| m.end());
        if matched == 0 {
            break;
        }
        current = current[matched..].trim_start();
    }

    if current.is_empty() {
        WEBSITE_NOT_PROVIDED.to_string()
    } else {
        current.to_string()
    }
}
