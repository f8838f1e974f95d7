#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod app;
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod levels;
pub mod overlay;
pub mod ui;
pub mod utils;

pub use app::DashboardApp;
pub use chart::{Chart, EntityId, EntityStore, PointerEvent, SubscriptionId};
pub use levels::PriceLevels;
pub use overlay::PatternOverlay;

// CLI argument parsing
use clap::Parser;

use crate::config::API;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base url of the pattern backend (serves /api/patterns and /api/send-alert)
    #[arg(long, default_value_t = API.backend.default_base_url.to_string())]
    pub api_base: String,

    /// Open the chart for this symbol on startup, e.g. BTCUSDT
    #[arg(long)]
    pub symbol: Option<String>,
}

/// Main application entry point - creates the GUI app
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> DashboardApp {
    DashboardApp::new(cc, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_local_backend() {
        let cli = Cli::parse_from(["pattern-scope"]);
        assert_eq!(cli.api_base, API.backend.default_base_url);
        assert_eq!(cli.symbol, None);

        let cli = Cli::parse_from(["pattern-scope", "--api-base", "http://h:1", "--symbol", "ethusdt"]);
        assert_eq!(cli.api_base, "http://h:1");
        assert_eq!(cli.symbol.as_deref(), Some("ethusdt"));
    }
}
