//! The charge-state machine.
//!
//! [`ChargeMonitor`] owns the thresholds, the pause flag and the snooze
//! deadline, and decides on each evaluate tick whether a threshold
//! crossing occurred and which alerts to deliver. It is synchronous and
//! side-effect free apart from the [`AlertSink`] calls, so the whole
//! decision surface is unit-testable.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::config::{ConfigError, MonitorConfig};
use crate::traits::AlertSink;
use crate::types::{BatterySample, ConfirmChoice, IconState, ThresholdEvent};

/// Default snooze duration: 15 minutes.
pub const SNOOZE_MINUTES: i64 = 15;

/// Snapshot of the monitor's runtime state, for logging and introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorStatus {
    /// Last sampled power-plugged state.
    pub plugged_in: bool,
    /// Last sampled charge percent.
    pub percent: u8,
    /// Whether evaluation is paused.
    pub paused: bool,
    /// Whether alerts are currently snoozed.
    pub snoozed: bool,
    /// Deadline at which the current snooze ends, if any.
    pub snoozed_until: Option<DateTime<Utc>>,
}

/// Threshold-crossing state machine.
pub struct ChargeMonitor {
    config: MonitorConfig,
    paused: bool,
    snoozed_until: Option<DateTime<Utc>>,
    snooze_duration: Duration,
    last_sample: BatterySample,
}

impl ChargeMonitor {
    /// Creates a monitor with the given configuration.
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            paused: false,
            snoozed_until: None,
            snooze_duration: Duration::minutes(SNOOZE_MINUTES),
            last_sample: BatterySample::default(),
        }
    }

    /// Builder: override the snooze duration.
    pub fn with_snooze_duration(mut self, duration: Duration) -> Self {
        self.snooze_duration = duration;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Replaces the configuration wholesale (config reload).
    ///
    /// Runtime state (pause, snooze, last sample) is preserved.
    pub fn set_config(&mut self, config: MonitorConfig) {
        self.config = config;
    }

    /// Returns the most recent sample seen by [`evaluate`](Self::evaluate).
    pub fn last_sample(&self) -> BatterySample {
        self.last_sample
    }

    /// Evaluates one battery sample against the thresholds.
    ///
    /// Returns the event that fired, if any. While the triggering
    /// condition holds the same event fires again on every call; the
    /// comparisons are non-strict and there is no de-duplication, so the
    /// condition clears only when the power state flips to the opposite
    /// branch. Snooze and pause are the only dampers.
    pub fn evaluate(
        &mut self,
        sample: BatterySample,
        alerts: &mut dyn AlertSink,
    ) -> Option<ThresholdEvent> {
        self.last_sample = sample;

        if self.paused || self.is_snoozed() {
            debug!(
                paused = self.paused,
                snoozed = self.is_snoozed(),
                "Evaluation suppressed"
            );
            return None;
        }

        let event = if sample.plugged_in && sample.percent >= self.config.unplug_percent {
            ThresholdEvent::Unplug {
                percent: sample.percent,
            }
        } else if !sample.plugged_in && sample.percent <= self.config.plug_percent {
            ThresholdEvent::PlugIn {
                percent: sample.percent,
            }
        } else {
            return None;
        };

        self.fire(event, alerts);
        Some(event)
    }

    /// Delivers the event through the enabled channels.
    ///
    /// The blocking confirm always precedes the passive notification, and
    /// the notification fires regardless of the confirm outcome.
    fn fire(&mut self, event: ThresholdEvent, alerts: &mut dyn AlertSink) {
        if self.config.alert_enabled {
            let choice = alerts.confirm(event.title(), &event.message(), "OK", "Snooze");
            if choice == ConfirmChoice::Snoozed {
                self.start_snooze();
            }
        }
        if self.config.notification_enabled {
            alerts.notify(event.title(), "", &event.message());
        }
    }

    /// Returns true while alerts are snoozed.
    pub fn is_snoozed(&self) -> bool {
        match self.snoozed_until {
            Some(until) => Utc::now() < until,
            None => false,
        }
    }

    /// Returns the snooze deadline, if one is set.
    pub fn snoozed_until(&self) -> Option<DateTime<Utc>> {
        self.snoozed_until
    }

    /// Starts (or restarts) the snooze window.
    pub fn start_snooze(&mut self) {
        let until = Utc::now() + self.snooze_duration;
        self.snoozed_until = Some(until);
        info!(until = %until, "Alerts snoozed");
    }

    /// Ends the snooze. Safe to call when not snoozed.
    pub fn stop_snooze(&mut self) {
        if self.snoozed_until.take().is_some() {
            info!("Snooze ended");
        }
    }

    /// Returns true while evaluation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flips the pause flag, returning the new value.
    ///
    /// Resuming does not force an immediate re-evaluation; the next
    /// scheduled tick runs normally.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Sets the plug-in threshold after validating the option set.
    pub fn set_plug_percent(&mut self, percent: u8) -> Result<(), ConfigError> {
        self.config.set_plug_percent(percent)
    }

    /// Sets the unplug threshold after validating the option set.
    pub fn set_unplug_percent(&mut self, percent: u8) -> Result<(), ConfigError> {
        self.config.set_unplug_percent(percent)
    }

    /// Flips the alert toggle, returning the new value.
    pub fn toggle_alert(&mut self) -> bool {
        self.config.toggle_alert()
    }

    /// Flips the notification toggle, returning the new value.
    pub fn toggle_notification(&mut self) -> bool {
        self.config.toggle_notification()
    }

    /// Computes the icon for the given plugged state and the current
    /// snooze status.
    pub fn icon_state(&self, plugged_in: bool) -> IconState {
        IconState::for_status(plugged_in, self.is_snoozed())
    }

    /// Returns a snapshot of the runtime state.
    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            plugged_in: self.last_sample.plugged_in,
            percent: self.last_sample.percent,
            paused: self.paused,
            snoozed: self.is_snoozed(),
            snoozed_until: self.snoozed_until,
        }
    }
}
