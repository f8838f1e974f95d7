use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use poll_promise::Promise;

use crate::config::API;
use crate::data::provider::PatternSource;
use crate::data::task::{spawn_request, take_ready};
use crate::domain::PatternFeed;
use crate::utils::AppInstant;

#[cfg(debug_assertions)]
use crate::config::DF;

/// Fixed-cadence poller for the pattern feed.
///
/// First request goes out on the first `poll`, then one per interval counted
/// from when the previous one was issued. A failed poll is logged and waits
/// for the next tick; there is no retry.
pub struct FeedPoller {
    source: Arc<dyn PatternSource>,
    interval: Duration,
    in_flight: Option<Promise<Result<PatternFeed>>>,
    last_request: Option<AppInstant>,
    last_error: Option<String>,
}

impl FeedPoller {
    pub fn new(source: Arc<dyn PatternSource>) -> Self {
        Self::with_interval(source, API.backend.poll_interval)
    }

    pub fn with_interval(source: Arc<dyn PatternSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            in_flight: None,
            last_request: None,
            last_error: None,
        }
    }

    /// Call once per frame. Returns a feed when a request finished successfully.
    pub fn poll(&mut self) -> Option<PatternFeed> {
        let mut fresh = None;

        if let Some(result) = take_ready(&mut self.in_flight) {
            match result {
                Ok(feed) => {
                    self.last_error = None;
                    fresh = Some(feed);
                }
                Err(e) => {
                    log::error!("Error fetching patterns: {:#}", e);
                    self.last_error = Some(format!("{:#}", e));
                }
            }
        }

        if self.in_flight.is_none() && self.is_due() {
            self.request_now();
        }
        fresh
    }

    /// Skips the wait; ignored if a request is already out.
    pub fn request_now(&mut self) {
        if self.in_flight.is_some() {
            return;
        }

        #[cfg(debug_assertions)]
        if DF.log_feed_polls {
            log::info!("Polling pattern feed");
        }

        let source = Arc::clone(&self.source);
        self.in_flight = Some(spawn_request(async move { source.fetch_patterns().await }));
        self.last_request = Some(AppInstant::now());
    }

    fn is_due(&self) -> bool {
        match self.last_request {
            Some(at) => at.elapsed() >= self.interval,
            None => true,
        }
    }

    /// How long until the next request should go out; drives repaint scheduling.
    pub fn time_until_next(&self) -> Duration {
        match self.last_request {
            Some(at) => self.interval.saturating_sub(at.elapsed()),
            None => Duration::ZERO,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[cfg(all(test, not(target_arch = "wasm32")))]
    fn wait(&self) {
        if let Some(promise) = &self.in_flight {
            promise.block_until_ready();
        }
    }
}
