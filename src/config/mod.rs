//! Configuration module for the pattern dashboard.

mod api;
mod debug;

// Can't be private because we don't re-export it
pub mod plot;

// Re-export commonly used items
pub use api::{API, ApiConfig, endpoint};
pub use debug::DF;
pub use plot::PLOT_CONFIG;
