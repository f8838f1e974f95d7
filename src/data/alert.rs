use std::sync::Arc;

use anyhow::Result;
use poll_promise::Promise;
use serde::{Deserialize, Serialize};

use crate::data::provider::AlertSender;
use crate::data::task::spawn_request;
use crate::domain::PriceLevelSet;

#[cfg(debug_assertions)]
use crate::config::DF;

/// Body of `POST /api/send-alert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    pub symbol: String,
    pub entry: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl AlertRequest {
    pub fn new(symbol: impl Into<String>, levels: &PriceLevelSet) -> Self {
        Self {
            symbol: symbol.into(),
            entry: levels.entry,
            stop_loss: levels.stop_loss,
            take_profit: levels.take_profit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    Sent,
    /// Server or transport message, untouched.
    Failed(String),
}

impl AlertOutcome {
    pub fn from_result(result: Result<AlertResponse>) -> Self {
        match result {
            Ok(AlertResponse { success: true, .. }) => Self::Sent,
            Ok(AlertResponse { error, .. }) => {
                Self::Failed(error.unwrap_or_else(|| "Unknown error".to_string()))
            }
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Sent => "Alert sent successfully".to_string(),
            Self::Failed(err) => format!("Failed to send alert: {}", err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Fire-and-forget alert sending.
///
/// Every request runs to completion on its own; nothing is de-duplicated or
/// cancelled. Whichever request resolves last decides the notification.
pub struct AlertDispatch {
    sender: Arc<dyn AlertSender>,
    in_flight: Vec<Promise<Result<AlertResponse>>>,
    latest: Option<AlertOutcome>,
}

impl AlertDispatch {
    pub fn new(sender: Arc<dyn AlertSender>) -> Self {
        Self {
            sender,
            in_flight: Vec::new(),
            latest: None,
        }
    }

    pub fn send(&mut self, request: AlertRequest) {
        #[cfg(debug_assertions)]
        if DF.log_alerts {
            log::info!("Sending alert: {:?}", request);
        }

        let sender = Arc::clone(&self.sender);
        self.in_flight
            .push(spawn_request(async move { sender.send_alert(&request).await }));
    }

    /// Collects finished requests. Returns the outcome that resolved most recently, if any did.
    pub fn poll(&mut self) -> Option<AlertOutcome> {
        let mut resolved = None;
        let mut still_pending = Vec::with_capacity(self.in_flight.len());

        for promise in self.in_flight.drain(..) {
            match promise.try_take() {
                Ok(result) => {
                    let outcome = AlertOutcome::from_result(result);
                    if let AlertOutcome::Failed(err) = &outcome {
                        log::error!("Alert failed: {}", err);
                    }
                    resolved = Some(outcome);
                }
                Err(pending) => still_pending.push(pending),
            }
        }
        self.in_flight = still_pending;

        if resolved.is_some() {
            self.latest = resolved.clone();
        }
        resolved
    }

    pub fn latest(&self) -> Option<&AlertOutcome> {
        self.latest.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.latest = None;
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    #[cfg(all(test, not(target_arch = "wasm32")))]
    fn wait_all(&self) {
        for promise in &self.in_flight {
            promise.block_until_ready();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        replies: Mutex<Vec<Result<AlertResponse>>>,
        seen: Mutex<Vec<AlertRequest>>,
    }

    #[async_trait]
    impl AlertSender for Scripted {
        async fn send_alert(&self, request: &AlertRequest) -> Result<AlertResponse> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn scripted(replies: Vec<Result<AlertResponse>>) -> Arc<Scripted> {
        Arc::new(Scripted {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn request_uses_camel_case_field_names() {
        let levels = PriceLevelSet::new(Some(100.0), Some(90.0), Some(120.0));
        let json = serde_json::to_value(AlertRequest::new("BTCUSDT", &levels)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "symbol": "BTCUSDT",
                "entry": 100.0,
                "stopLoss": 90.0,
                "takeProfit": 120.0
            })
        );
    }

    #[test]
    fn outcome_keeps_server_message_verbatim() {
        let failed = AlertOutcome::from_result(Ok(AlertResponse {
            success: false,
            error: Some("Telegram bot token missing".into()),
        }));
        assert_eq!(failed, AlertOutcome::Failed("Telegram bot token missing".into()));

        let transport = AlertOutcome::from_result(Err(anyhow::anyhow!("connection refused")));
        assert_eq!(transport, AlertOutcome::Failed("connection refused".into()));

        let ok = AlertOutcome::from_result(Ok(AlertResponse {
            success: true,
            error: None,
        }));
        assert!(ok.is_success());
    }

    #[test]
    fn dispatch_reports_each_completion() {
        let sender = scripted(vec![
            Ok(AlertResponse {
                success: true,
                error: None,
            }),
            Err(anyhow::anyhow!("timed out")),
        ]);
        let mut dispatch = AlertDispatch::new(sender.clone());
        let levels = PriceLevelSet::new(Some(100.0), Some(90.0), Some(120.0));

        dispatch.send(AlertRequest::new("ETHUSDT", &levels));
        dispatch.wait_all();
        assert_eq!(dispatch.poll(), Some(AlertOutcome::Sent));
        assert_eq!(dispatch.pending(), 0);

        dispatch.send(AlertRequest::new("ETHUSDT", &levels));
        dispatch.wait_all();
        assert_eq!(dispatch.poll(), Some(AlertOutcome::Failed("timed out".into())));
        assert_eq!(dispatch.latest(), Some(&AlertOutcome::Failed("timed out".into())));
        assert_eq!(dispatch.poll(), None);

        let seen = sender.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].symbol, "ETHUSDT");
    }

    #[test]
    fn failure_in_sender_is_contained() {
        struct Broken;
        #[async_trait]
        impl AlertSender for Broken {
            async fn send_alert(&self, _: &AlertRequest) -> Result<AlertResponse> {
                bail!("HTTP 500 Internal Server Error")
            }
        }

        let mut dispatch = AlertDispatch::new(Arc::new(Broken));
        dispatch.send(AlertRequest::new("X", &PriceLevelSet::default()));
        dispatch.wait_all();
        assert_eq!(
            dispatch.poll(),
            Some(AlertOutcome::Failed("HTTP 500 Internal Server Error".into()))
        );
    }
}
