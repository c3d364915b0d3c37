use serde::{Deserialize, Serialize};

/// Store settings, loaded from `store.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name used in log events (e.g., "showcase").
    pub name: String,
    /// Install a tracing observer when the definition has none.
    pub trace_dispatch: bool,
    /// Log unknown action ids at warn level. Dispatch stays a no-op either way.
    pub warn_unknown_actions: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            trace_dispatch: false,
            warn_unknown_actions: false,
        }
    }
}
