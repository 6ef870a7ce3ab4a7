use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DispatchConfig {
    /// Minimum delay between consecutive submissions within one batch, in
    /// milliseconds
    #[serde(default = "DispatchConfig::default_pacing_interval_ms")]
    pub pacing_interval_ms: u64,

    /// Upper bound for a single transport submission, in seconds
    #[serde(default = "DispatchConfig::default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    /// Upper bound for one recipient store round trip, in seconds
    #[serde(default = "DispatchConfig::default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

impl DispatchConfig {
    #[inline]
    pub const fn default_pacing_interval_ms() -> u64 { 5_000 }

    #[inline]
    pub const fn default_send_timeout_secs() -> u64 { 30 }

    #[inline]
    pub const fn default_store_timeout_secs() -> u64 { 30 }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pacing_interval_ms: Self::default_pacing_interval_ms(),
            send_timeout_secs: Self::default_send_timeout_secs(),
            store_timeout_secs: Self::default_store_timeout_secs(),
        }
    }
}

impl From<DispatchConfig> for classnotify_core::config::DispatchConfig {
    fn from(config: DispatchConfig) -> Self {
        Self {
            pacing_interval: Duration::from_millis(config.pacing_interval_ms),
            send_timeout: Duration::from_secs(config.send_timeout_secs),
            store_timeout: Duration::from_secs(config.store_timeout_secs),
        }
    }
}
