use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::core::normalize::normalize;
use crate::models::Event;

/// Cache slot for the single upstream feed.
const FEED_CACHE_KEY: &str = "events";

/// Errors that can occur when fetching the events feed
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Feed returned error status: {0}")]
    ApiError(String),

    #[error("Invalid feed format: {0}")]
    InvalidResponse(String),
}

/// Events feed client.
///
/// Fetches the raw catalog, coerces each record into a normalized
/// [`Event`], and keeps the result in a single-slot TTL cache so repeated
/// conversations don't hammer the upstream API. The cache lives on the
/// client rather than in module state, so the filtering engine stays
/// stateless and the client testable in isolation.
pub struct CatalogClient {
    client: Client,
    feed_url: String,
    cache: moka::future::Cache<&'static str, Arc<Vec<Event>>>,
}

impl CatalogClient {
    /// Create a new catalog client with the given feed URL, request
    /// timeout, and cache TTL.
    pub fn new(feed_url: String, timeout_secs: u64, cache_ttl_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let cache = moka::future::CacheBuilder::new(1)
            .time_to_live(Duration::from_secs(cache_ttl_secs))
            .build();

        Self {
            client,
            feed_url,
            cache,
        }
    }

    /// Fetch and normalize the event catalog, serving from cache while the
    /// TTL holds.
    pub async fn fetch_events(&self) -> Result<Arc<Vec<Event>>, CatalogError> {
        if let Some(events) = self.cache.get(FEED_CACHE_KEY).await {
            tracing::debug!("Catalog served from cache ({} events)", events.len());
            return Ok(events);
        }

        let response = self.client.get(&self.feed_url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::ApiError(format!(
                "Feed request failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let results = json
            .get("results")
            .and_then(|r| r.as_array())
            .ok_or_else(|| CatalogError::InvalidResponse("Missing results array".into()))?;

        let events: Vec<Event> = results.iter().map(normalize_record).collect();
        tracing::info!("Feed: {} events fetched", events.len());

        let events = Arc::new(events);
        self.cache.insert(FEED_CACHE_KEY, events.clone()).await;
        Ok(events)
    }
}

/// Coerce one raw feed record into a normalized [`Event`].
///
/// Lenient on purpose: a malformed field degrades to its default instead
/// of dropping the record or aborting the batch.
pub fn normalize_record(raw: &Value) -> Event {
    let title = string_field(raw, "title");
    let description = string_field(raw, "description");
    let city = string_field(raw, "city");

    let (date_start, date_end) = extract_dates(raw);
    let category = extract_category(raw);
    let price = extract_price(raw);
    let is_free = extract_is_free(raw, price, &description);
    let venue_name = extract_venue(raw);

    let views = raw.get("views").and_then(|v| v.as_i64()).unwrap_or(0);
    let is_featured = raw
        .get("is_featured")
        .or_else(|| raw.get("featured"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    Event {
        title,
        description,
        city,
        venue_name,
        date_start,
        date_end,
        category,
        price,
        is_free,
        link: raw.get("link").and_then(|v| v.as_str()).map(str::to_string),
        image: raw.get("image").and_then(|v| v.as_str()).map(str::to_string),
        views,
        is_featured,
    }
}

fn string_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Date extraction handles both feed shapes: simple dated entries under
/// `dates`, and recurring ranges under `recurring_dates`.
fn extract_dates(raw: &Value) -> (Option<NaiveDate>, Option<NaiveDate>) {
    if let Some(date) = raw
        .get("dates")
        .and_then(|d| d.as_array())
        .and_then(|a| a.first())
        .and_then(|entry| entry.get("date"))
        .and_then(|v| v.as_str())
        .and_then(parse_feed_date)
    {
        return (Some(date), Some(date));
    }

    let recurring = raw
        .get("recurring_dates")
        .and_then(|d| d.as_array())
        .and_then(|a| a.first());
    if let Some(rec) = recurring {
        let start = rec
            .get("start_date")
            .and_then(|v| v.as_str())
            .and_then(parse_feed_date);
        let end = rec
            .get("end_date")
            .and_then(|v| v.as_str())
            .and_then(parse_feed_date)
            .or(start);
        return (start, end);
    }

    (None, None)
}

/// Accepts RFC 3339 timestamps (with or without `Z`) and plain ISO dates.
fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Category arrives either as an object with a `name` or as a plain string.
fn extract_category(raw: &Value) -> Option<String> {
    match raw.get("category") {
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Price arrives as a number or a numeric string; anything else is 0.
fn extract_price(raw: &Value) -> f64 {
    match raw.get("price") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Free when the flag says so, the price is zero, or the description
/// advertises it.
fn extract_is_free(raw: &Value, price: f64, description: &str) -> bool {
    if raw
        .get("is_free")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
        || price == 0.0
    {
        return true;
    }

    let desc_norm = normalize(description);
    desc_norm.contains("gratuit") || desc_norm.contains("entree libre") || desc_norm.contains("free")
}

/// Venue arrives as an object with a `name` or as a plain string.
fn extract_venue(raw: &Value) -> String {
    match raw.get("venue") {
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}
