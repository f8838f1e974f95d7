use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use crate::config::{API, endpoint};
use crate::data::alert::{AlertRequest, AlertResponse};
use crate::data::klines::parse_klines;
use crate::domain::{Candle, PatternFeed};

#[cfg(debug_assertions)]
use crate::config::DF;

// Browser futures are not Send, so the traits drop the bound there.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSendSync for T {}

/// Where the pattern list comes from.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PatternSource: MaybeSendSync {
    async fn fetch_patterns(&self) -> Result<PatternFeed>;
}

/// Relay for trade alerts.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait AlertSender: MaybeSendSync {
    async fn send_alert(&self, request: &AlertRequest) -> Result<AlertResponse>;
}

/// Candles backing the chart.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait KlineSource: MaybeSendSync {
    async fn fetch_candles(&self, symbol: &str) -> Result<Vec<Candle>>;
}

pub fn build_http_client() -> Result<reqwest::Client> {
    let builder = reqwest::Client::builder();

    // No timeouts in the browser; fetch has its own.
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.timeout(std::time::Duration::from_millis(API.client.timeout_ms));

    builder.build().context("Failed to build HTTP client")
}

/// The pattern backend: serves `/api/patterns` and relays `/api/send-alert`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PatternSource for HttpBackend {
    async fn fetch_patterns(&self) -> Result<PatternFeed> {
        let url = endpoint(&self.base_url, API.backend.patterns_path);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("GET {} returned HTTP {}", url, status);
        }

        let feed: PatternFeed = resp
            .json()
            .await
            .with_context(|| format!("Malformed pattern feed from {}", url))?;

        #[cfg(debug_assertions)]
        if DF.log_feed_polls {
            log::info!(
                "Pattern feed: {} patterns, {} total in 24h",
                feed.patterns.len(),
                feed.stats.total_patterns
            );
        }
        Ok(feed)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl AlertSender for HttpBackend {
    async fn send_alert(&self, request: &AlertRequest) -> Result<AlertResponse> {
        let url = endpoint(&self.base_url, API.backend.alert_path);

        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();

        // The relay reports failures as `{success: false, error}` with a 4xx/5xx,
        // so read the body before looking at the status.
        let body = resp.text().await?;
        match serde_json::from_str::<AlertResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => bail!("HTTP {}", status),
            Err(e) => Err(e).context("Malformed alert response"),
        }
    }
}

/// Public Binance REST klines.
#[derive(Clone)]
pub struct BinanceKlines {
    client: reqwest::Client,
    interval: String,
    limit: u32,
}

impl BinanceKlines {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            interval: API.klines.interval.to_string(),
            limit: API.klines.limit,
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl KlineSource for BinanceKlines {
    async fn fetch_candles(&self, symbol: &str) -> Result<Vec<Candle>> {
        let limit = self.limit.to_string();
        let resp = self
            .client
            .get(API.klines.url)
            .query(&[
                ("symbol", symbol),
                ("interval", self.interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Klines request for {} failed", symbol))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Klines for {} returned HTTP {}", symbol, status);
        }

        let rows: serde_json::Value = resp.json().await.context("Klines body was not JSON")?;
        let candles = parse_klines(&rows).with_context(|| format!("{} klines", symbol))?;

        #[cfg(debug_assertions)]
        if DF.log_klines {
            log::info!("Fetched {} {} candles for {}", candles.len(), self.interval, symbol);
        }
        Ok(candles)
    }
}
