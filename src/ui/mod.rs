mod plot_layers;
mod styles;
mod ui_config;
mod ui_panels;
mod ui_plot_view;
mod ui_render;
mod ui_text;
mod utils;

pub(crate) use ui_panels::LevelsAction;

pub use ui_panels::{PatternFilter, filter_patterns, top_symbols};
pub use ui_plot_view::PlotCanvas;
pub use utils::{format_price, setup_custom_visuals};
