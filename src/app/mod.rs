mod root;
mod state;

pub(crate) use state::PersistedView;

pub use root::DashboardApp;
