use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForwardingConfig {
    /// How long a forward group may wait for its upstream replies.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Interval of the sweep that fails expired groups.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Upper bound on in-flight upstream sub-queries.
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,

    /// Forward single-question queries byte-for-byte, rewriting only the ID.
    #[serde(default = "default_true")]
    pub passthrough_single: bool,
}

impl ForwardingConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
            max_pending: default_max_pending(),
            passthrough_single: default_true(),
        }
    }
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_sweep_interval_ms() -> u64 {
    250
}

fn default_max_pending() -> usize {
    4096
}

fn default_true() -> bool {
    true
}
