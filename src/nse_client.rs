use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;
use tracing::info;

use crate::config;
use crate::holidays::{HolidayEntry, HolidaySet};

/// Read-through source of the current holiday snapshot.
///
/// The calendar core never calls this itself: a snapshot is fetched up
/// front, frozen into a [`HolidaySet`], and injected.
pub trait HolidaySource {
    fn current_holidays(&self) -> impl Future<Output = Result<Vec<HolidayEntry>>> + Send;
}

// -----------------------------------------------
// CLIENT WRAPPER WITH SESSION STATE
// -----------------------------------------------
pub struct NSEClient {
    client: Client,
    warmed_up: Arc<RwLock<bool>>,
}

impl NSEClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            warmed_up: Arc::new(RwLock::new(false)),
        })
    }

    /// Warmup NSE session (only once per client)
    async fn warmup_if_needed(&self) -> Result<()> {
        if *self.warmed_up.read().await {
            return Ok(());
        }

        let mut warmed = self.warmed_up.write().await;
        if !*warmed {
            let _ = self
                .client
                .get(config::NSE_BASE_URL)
                .header("Accept", "text/html")
                .send()
                .await
                .context("Failed to warm up NSE session")?;

            tokio::time::sleep(Duration::from_millis(config::WARMUP_DELAY_MS)).await;
            *warmed = true;
        }

        Ok(())
    }

    /// Generic retry fetch with better error handling
    async fn fetch_json(&self, url: &str) -> Result<String> {
        self.warmup_if_needed().await?;

        let backoff = ExponentialBackoff::from_millis(config::RETRY_BASE_DELAY_MS)
            .factor(config::RETRY_FACTOR)
            .max_delay(Duration::from_secs(config::RETRY_MAX_DELAY_SECS))
            .take(config::RETRY_MAX_ATTEMPTS);

        Retry::spawn(backoff, || async {
            let res = self
                .client
                .get(url)
                .header("Referer", "https://www.nseindia.com/")
                .header("X-Requested-With", "XMLHttpRequest")
                .send()
                .await
                .context("Request send failed")?;

            let status = res.status();

            if status.is_success() {
                let text = res.text().await.context("Failed to read body")?;

                // Validate JSON
                let trimmed = text.trim();
                if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                    let preview: String = text.chars().take(200).collect();
                    anyhow::bail!("Non-JSON response: {}", preview);
                }

                Ok(text)
            } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                // Retry on server errors and rate limits
                anyhow::bail!("Retryable error: {}", status)
            } else {
                // Fail fast on client errors
                let body = res.text().await.unwrap_or_default();
                let preview: String = body.chars().take(200).collect();
                anyhow::bail!("Client error {}: {}", status, preview)
            }
        })
        .await
    }

    /// Fetch the trading-holiday master list for the current year.
    pub async fn fetch_holidays(&self) -> Result<Vec<HolidayEntry>> {
        let text = self.fetch_json(&config::nse_holiday_url()).await?;
        parse_holiday_payload(&text)
    }
}

impl HolidaySource for NSEClient {
    async fn current_holidays(&self) -> Result<Vec<HolidayEntry>> {
        self.fetch_holidays().await
    }
}

/// Pull the trading-segment entries out of the holiday-master payload.
/// The payload is keyed by segment ("CM", "FO", ...); equities and
/// derivatives share the same calendar, so either segment serves.
fn parse_holiday_payload(text: &str) -> Result<Vec<HolidayEntry>> {
    let payload: serde_json::Value =
        serde_json::from_str(text).context("Failed to parse holiday response")?;

    let segment = payload
        .get(config::HOLIDAY_SEGMENT)
        .or_else(|| payload.get(config::HOLIDAY_SEGMENT_FALLBACK))
        .context("No trading segment in holiday response")?;

    serde_json::from_value(segment.clone()).context("Failed to parse holiday entries")
}

// -----------------------------------------------
// YEARLY SNAPSHOT CACHE
// -----------------------------------------------

/// On-disk form of a holiday snapshot. NSE publishes the list per
/// calendar year, so a snapshot is reusable until the year rolls over.
#[derive(Debug, Serialize, Deserialize)]
struct HolidayCacheFile {
    fetched_on: NaiveDate,
    entries: Vec<HolidayEntry>,
}

pub fn load_cached_holidays(path: &Path, today: NaiveDate) -> Option<Vec<HolidayEntry>> {
    let text = std::fs::read_to_string(path).ok()?;
    let cache: HolidayCacheFile = serde_json::from_str(&text).ok()?;

    if cache.fetched_on.year() == today.year() {
        Some(cache.entries)
    } else {
        None
    }
}

pub fn save_holiday_cache(
    path: &Path,
    today: NaiveDate,
    entries: &[HolidayEntry],
) -> Result<()> {
    let cache = HolidayCacheFile {
        fetched_on: today,
        entries: entries.to_vec(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&cache)?)
        .with_context(|| format!("Failed to write holiday cache at {}", path.display()))
}

/// Read-through snapshot load: same-year cache hit or a fresh fetch
/// that repopulates the cache.
pub async fn current_holiday_set<S: HolidaySource>(
    source: &S,
    cache_path: &Path,
    today: NaiveDate,
) -> Result<HolidaySet> {
    if let Some(entries) = load_cached_holidays(cache_path, today) {
        info!(count = entries.len(), "Loaded holiday snapshot from cache");
        return Ok(HolidaySet::from_entries(entries));
    }

    let entries = source.current_holidays().await?;
    info!(count = entries.len(), "Fetched holiday snapshot from NSE");

    if let Err(e) = save_holiday_cache(cache_path, today, &entries) {
        tracing::warn!("Could not persist holiday cache: {e:#}");
    }

    Ok(HolidaySet::from_entries(entries))
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    // Rotating Accept-Language headers (fingerprint avoidance)
    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .context("No accept languages configured")?;
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_str(lang)?);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Ok(Client::builder()
        .default_headers(headers)
        .cookie_store(true) // crucial for NSE
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?)
}
