//! Access-control engine configuration.

use serde::{Deserialize, Serialize};

/// Settings for the engine facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Capacity of the permission-change broadcast channel. Slow
    /// subscribers that fall further behind than this lose events.
    #[serde(default = "default_notify_buffer")]
    pub notify_buffer: usize,
    /// Whether declined operations are logged at `debug` level.
    #[serde(default = "default_true")]
    pub log_denials: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            notify_buffer: default_notify_buffer(),
            log_denials: default_true(),
        }
    }
}

fn default_notify_buffer() -> usize {
    256
}

fn default_true() -> bool {
    true
}
