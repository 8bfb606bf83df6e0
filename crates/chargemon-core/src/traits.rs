//! Collaborator contracts consumed by the monitor.
//!
//! The monitor core never talks to the OS directly. Battery sampling,
//! alert delivery, config persistence and the icon slot are all reached
//! through these traits, so the state machine can be exercised against
//! in-memory fakes.

use thiserror::Error;

use crate::config::{ConfigError, MonitorConfig};
use crate::types::{BatterySample, ConfirmChoice, IconState};

/// The battery sensor could not be read (e.g. desktop hardware).
#[derive(Debug, Error)]
#[error("battery sensor unavailable: {0}")]
pub struct SensorError(pub String);

/// Reads the current power-plugged state and charge percent.
pub trait PowerSource {
    /// Takes one reading. Callers degrade a failed reading to
    /// [`BatterySample::default`] rather than aborting the tick.
    fn sample(&mut self) -> Result<BatterySample, SensorError>;
}

/// Delivers alerts to the user.
pub trait AlertSink {
    /// Shows a blocking confirmation dialog and returns the user's choice.
    ///
    /// Blocks the calling thread until dismissed; no other monitor work
    /// proceeds while the dialog is open.
    fn confirm(
        &mut self,
        title: &str,
        message: &str,
        affirmative_label: &str,
        dismiss_label: &str,
    ) -> ConfirmChoice;

    /// Shows a fire-and-forget passive notification.
    fn notify(&mut self, title: &str, subtitle: &str, message: &str);
}

/// Persists the monitor configuration to durable storage.
pub trait ConfigStore {
    /// Loads the stored config. Missing or malformed storage yields
    /// defaults; this never fails.
    fn load(&self) -> MonitorConfig;

    /// Writes the full config. Failure leaves in-memory state authoritative.
    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError>;
}

/// The presentation slot holding the monitor's status icon.
pub trait IconSurface {
    /// Replaces the visible icon.
    fn set_icon(&mut self, state: IconState);
}
