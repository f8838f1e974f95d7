use serde::{Deserialize, Serialize};

use crate::ui::PatternFilter;

/// The part of the dashboard that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct PersistedView {
    pub(crate) filter: PatternFilter,
    /// Symbol whose chart was open last.
    pub(crate) symbol: Option<String>,
}
