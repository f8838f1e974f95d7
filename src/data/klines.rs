use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use poll_promise::Promise;
use serde_json::Value;

use crate::data::provider::KlineSource;
use crate::data::task::{spawn_request, take_ready};
use crate::domain::Candle;
use crate::utils::TimeUtils;

/// Binance sends prices as strings ("65000.10"); be lenient and accept bare numbers too.
fn price_field(row: &[Value], idx: usize, name: &str) -> Result<f64> {
    let value = row
        .get(idx)
        .ok_or_else(|| anyhow!("missing {}", name))?;
    let price = match value {
        Value::String(s) => s
            .parse::<f64>()
            .with_context(|| format!("{} is not a number: {:?}", name, s))?,
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| anyhow!("{} out of range", name))?,
        other => bail!("{} has unexpected type: {}", name, other),
    };
    if !price.is_finite() {
        bail!("{} is not finite", name);
    }
    Ok(price)
}

/// `[open_time_ms, open, high, low, close, volume, close_time, ...]` into a candle
/// keyed by open time in seconds.
pub fn parse_kline_row(row: &[Value]) -> Result<Candle> {
    if row.len() < 5 {
        bail!("kline row has {} fields, expected at least 5", row.len());
    }
    let open_time_ms = row[0]
        .as_i64()
        .ok_or_else(|| anyhow!("open_time is not an integer"))?;

    Ok(Candle::new(
        open_time_ms / TimeUtils::MS_IN_S,
        price_field(row, 1, "open")?,
        price_field(row, 2, "high")?,
        price_field(row, 3, "low")?,
        price_field(row, 4, "close")?,
    ))
}

/// Whole response body. One bad row fails the batch; the chart keeps its previous candles.
pub fn parse_klines(body: &Value) -> Result<Vec<Candle>> {
    let rows = body
        .as_array()
        .ok_or_else(|| anyhow!("klines body is not an array"))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let fields = row
                .as_array()
                .ok_or_else(|| anyhow!("row {} is not an array", i))?;
            parse_kline_row(fields).with_context(|| format!("row {}", i))
        })
        .collect()
}

/// Loads candles for whichever symbol the chart shows. A newer request
/// supersedes an older one still in flight.
pub struct CandleLoader {
    source: Arc<dyn KlineSource>,
    in_flight: Option<(String, Promise<Result<Vec<Candle>>>)>,
}

impl CandleLoader {
    pub fn new(source: Arc<dyn KlineSource>) -> Self {
        Self {
            source,
            in_flight: None,
        }
    }

    pub fn request(&mut self, symbol: &str) {
        let source = Arc::clone(&self.source);
        let owned = symbol.to_string();
        let promise = spawn_request(async move { source.fetch_candles(&owned).await });
        self.in_flight = Some((symbol.to_string(), promise));
    }

    /// `(symbol, candles)` once the latest request lands. Failures are logged and dropped.
    pub fn poll(&mut self) -> Option<(String, Vec<Candle>)> {
        let (symbol, promise) = self.in_flight.take()?;
        let mut slot = Some(promise);
        let Some(result) = take_ready(&mut slot) else {
            self.in_flight = slot.map(|p| (symbol, p));
            return None;
        };

        match result {
            Ok(candles) => Some((symbol, candles)),
            Err(e) => {
                log::error!("Failed to load candles for {}: {:#}", symbol, e);
                None
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_binance_rows() {
        let body = json!([
            [1700000000000i64, "100.5", "110.0", "99.0", "105.25", "12.3", 1700003599999i64, "0", 10, "0", "0", "0"],
            [1700003600000i64, "105.25", "106.0", "101.0", "102.0", "8.1", 1700007199999i64, "0", 7, "0", "0", "0"]
        ]);
        let candles = parse_klines(&body).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0], Candle::new(1_700_000_000, 100.5, 110.0, 99.0, 105.25));
        assert_eq!(candles[1].open_time, 1_700_003_600);
        assert_eq!(candles[1].close_price, 102.0);
    }

    #[test]
    fn rejects_short_or_garbled_rows() {
        assert!(parse_kline_row(&[json!(1), json!("1.0")]).is_err());

        let err = parse_klines(&json!([[1700000000000i64, "abc", "1", "1", "1"]])).unwrap_err();
        assert!(format!("{:#}", err).contains("open"));

        assert!(parse_klines(&json!({"code": -1121})).is_err());
    }
}
