//! Shared value types for the charge monitor.

/// One reading of the host power state.
///
/// `Default` is the safe degraded reading used when no battery can be
/// sampled: on external power is not assumed, charge is reported empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatterySample {
    /// True when external power is connected.
    pub plugged_in: bool,
    /// Charge percent in `[0, 100]`.
    pub percent: u8,
}

impl BatterySample {
    /// Creates a sample from its parts.
    pub fn new(plugged_in: bool, percent: u8) -> Self {
        Self {
            plugged_in,
            percent,
        }
    }
}

/// A threshold crossing detected by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdEvent {
    /// Unplugged and discharged to or below the plug-in threshold.
    PlugIn {
        /// Charge percent at the time of the crossing.
        percent: u8,
    },
    /// Plugged in and charged to or above the unplug threshold.
    Unplug {
        /// Charge percent at the time of the crossing.
        percent: u8,
    },
}

impl ThresholdEvent {
    /// Alert title for this event.
    pub fn title(&self) -> &'static str {
        match self {
            Self::PlugIn { .. } => "Plug in the charger!",
            Self::Unplug { .. } => "Unplug the charger!",
        }
    }

    /// Alert body for this event.
    pub fn message(&self) -> String {
        let percent = match self {
            Self::PlugIn { percent } | Self::Unplug { percent } => percent,
        };
        format!("Battery {} percent charged.", percent)
    }
}

/// Outcome of a blocking confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    /// The user acknowledged the alert.
    Acknowledged,
    /// The user picked the snooze option.
    Snoozed,
}

/// The visible icon slot, derived from `(plugged_in, snoozed)`.
///
/// Purely presentational: written to the icon surface, never read back to
/// decide monitor behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Plugged,
    PluggedSnoozed,
    Unplugged,
    UnpluggedSnoozed,
}

impl IconState {
    /// Computes the icon for the given power and snooze status.
    pub fn for_status(plugged_in: bool, snoozed: bool) -> Self {
        match (plugged_in, snoozed) {
            (true, false) => Self::Plugged,
            (true, true) => Self::PluggedSnoozed,
            (false, false) => Self::Unplugged,
            (false, true) => Self::UnpluggedSnoozed,
        }
    }
}
