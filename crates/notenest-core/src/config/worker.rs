//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Cron worker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the cron scheduler runs.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Six-field cron expression for the invalid share-link sweep.
    #[serde(default = "default_share_sweep_cron")]
    pub share_sweep_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            share_sweep_cron: default_share_sweep_cron(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_share_sweep_cron() -> String {
    "0 */15 * * * *".to_string()
}
