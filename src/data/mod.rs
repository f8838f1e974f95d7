mod alert;
mod feed;
mod klines;
mod provider;
mod task;

pub use {
    alert::{AlertDispatch, AlertOutcome, AlertRequest, AlertResponse},
    feed::FeedPoller,
    klines::{CandleLoader, parse_kline_row, parse_klines},
    provider::{
        AlertSender, BinanceKlines, HttpBackend, KlineSource, MaybeSendSync, PatternSource,
        build_http_client,
    },
};
