use std::time::Duration;

/// Pattern backend: the feed endpoint and the alert relay.
pub struct BackendConfig {
    pub default_base_url: &'static str,
    pub patterns_path: &'static str,
    pub alert_path: &'static str,
    /// Fixed refresh cadence of the pattern feed
    pub poll_interval: Duration,
}

/// Public Binance REST klines used to back the chart.
pub struct KlinesConfig {
    pub url: &'static str,
    pub interval: &'static str,
    pub limit: u32,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
}

pub struct ApiConfig {
    pub backend: BackendConfig,
    pub klines: KlinesConfig,
    pub client: ClientDefaults,
}

pub const API: ApiConfig = ApiConfig {
    backend: BackendConfig {
        default_base_url: "http://127.0.0.1:5000",
        patterns_path: "/api/patterns",
        alert_path: "/api/send-alert",
        poll_interval: Duration::from_secs(60),
    },
    klines: KlinesConfig {
        url: "https://api.binance.com/api/v3/klines",
        interval: "1h",
        limit: 100,
    },
    client: ClientDefaults { timeout_ms: 10_000 },
};

/// Joins a base url and an absolute path without doubling the slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("http://host:5000/", API.backend.patterns_path),
            "http://host:5000/api/patterns"
        );
        assert_eq!(
            endpoint("http://host", API.backend.alert_path),
            "http://host/api/send-alert"
        );
    }
}
