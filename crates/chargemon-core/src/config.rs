//! Persisted monitor configuration.
//!
//! The config is a small flat record stored as TOML. Loading is tolerant:
//! absent fields take their defaults, and values outside the supported
//! option sets are reset field-by-field rather than rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Supported "plug in" thresholds (percent, while unplugged).
pub const PLUG_PERCENT_CHOICES: [u8; 7] = [40, 45, 50, 55, 60, 65, 70];

/// Supported "unplug" thresholds (percent, while plugged in).
pub const UNPLUG_PERCENT_CHOICES: [u8; 6] = [75, 80, 85, 90, 95, 100];

const DEFAULT_PLUG_PERCENT: u8 = 40;
const DEFAULT_UNPLUG_PERCENT: u8 = 80;

/// Errors for configuration updates and persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Requested plug-in threshold is not in the supported option set.
    #[error("unsupported plug-in threshold: {0}")]
    InvalidPlugPercent(u8),

    /// Requested unplug threshold is not in the supported option set.
    #[error("unsupported unplug threshold: {0}")]
    InvalidUnplugPercent(u8),

    /// The config could not be written to durable storage.
    #[error("failed to persist config: {0}")]
    Persist(String),
}

/// User-adjustable monitor settings.
///
/// `alert_enabled` and `notification_enabled` are independent toggles:
/// either, both, or neither delivery channel may be active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Whether blocking confirmation alerts fire on a threshold crossing.
    pub alert_enabled: bool,

    /// Whether passive desktop notifications fire on a threshold crossing.
    pub notification_enabled: bool,

    /// Percent at or below which, while unplugged, a "plug in" event fires.
    pub plug_percent: u8,

    /// Percent at or above which, while plugged in, an "unplug" event fires.
    pub unplug_percent: u8,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            alert_enabled: true,
            notification_enabled: false,
            plug_percent: DEFAULT_PLUG_PERCENT,
            unplug_percent: DEFAULT_UNPLUG_PERCENT,
        }
    }
}

impl MonitorConfig {
    /// Sets the plug-in threshold, rejecting values outside the option set.
    pub fn set_plug_percent(&mut self, percent: u8) -> Result<(), ConfigError> {
        if !PLUG_PERCENT_CHOICES.contains(&percent) {
            return Err(ConfigError::InvalidPlugPercent(percent));
        }
        self.plug_percent = percent;
        Ok(())
    }

    /// Sets the unplug threshold, rejecting values outside the option set.
    pub fn set_unplug_percent(&mut self, percent: u8) -> Result<(), ConfigError> {
        if !UNPLUG_PERCENT_CHOICES.contains(&percent) {
            return Err(ConfigError::InvalidUnplugPercent(percent));
        }
        self.unplug_percent = percent;
        Ok(())
    }

    /// Flips the alert toggle, returning the new value.
    pub fn toggle_alert(&mut self) -> bool {
        self.alert_enabled = !self.alert_enabled;
        self.alert_enabled
    }

    /// Flips the notification toggle, returning the new value.
    pub fn toggle_notification(&mut self) -> bool {
        self.notification_enabled = !self.notification_enabled;
        self.notification_enabled
    }

    /// Returns a copy with every out-of-set threshold reset to its default.
    ///
    /// Applied after loading from storage so a hand-edited or stale file
    /// degrades per field instead of discarding the whole record.
    pub fn sanitized(mut self) -> Self {
        if !PLUG_PERCENT_CHOICES.contains(&self.plug_percent) {
            warn!(
                plug_percent = self.plug_percent,
                default = DEFAULT_PLUG_PERCENT,
                "Unsupported plug-in threshold in stored config, using default"
            );
            self.plug_percent = DEFAULT_PLUG_PERCENT;
        }
        if !UNPLUG_PERCENT_CHOICES.contains(&self.unplug_percent) {
            warn!(
                unplug_percent = self.unplug_percent,
                default = DEFAULT_UNPLUG_PERCENT,
                "Unsupported unplug threshold in stored config, using default"
            );
            self.unplug_percent = DEFAULT_UNPLUG_PERCENT;
        }
        self
    }
}
