//! Monitor service: the owned instance wiring the state machine to its
//! collaborators.
//!
//! One `MonitorService` is constructed at process start and driven by the
//! scheduler. Every user mutation funnels through it so write-through
//! persistence happens in exactly one place, and so a failed battery
//! sample degrades to the safe default before it reaches the state
//! machine.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use chargemon_core::{
    AlertSink, BatterySample, ChargeMonitor, ConfigStore, IconState, IconSurface, MonitorConfig,
    MonitorStatus, PowerSource,
};

/// Default icon surface: records transitions in the log.
///
/// A tray frontend replaces this with a real icon slot.
#[derive(Debug, Default)]
pub struct LoggingIcon;

impl IconSurface for LoggingIcon {
    fn set_icon(&mut self, state: IconState) {
        info!(state = ?state, "Icon updated");
    }
}

/// The monitor service.
pub struct MonitorService {
    monitor: ChargeMonitor,
    power: Box<dyn PowerSource>,
    alerts: Box<dyn AlertSink>,
    icon: Box<dyn IconSurface>,
    store: Box<dyn ConfigStore>,
    last_icon: Option<IconState>,
}

impl MonitorService {
    /// Wires the state machine to its collaborators.
    pub fn new(
        monitor: ChargeMonitor,
        power: Box<dyn PowerSource>,
        alerts: Box<dyn AlertSink>,
        icon: Box<dyn IconSurface>,
        store: Box<dyn ConfigStore>,
    ) -> Self {
        Self {
            monitor,
            power,
            alerts,
            icon,
            store,
            last_icon: None,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MonitorConfig {
        self.monitor.config()
    }

    /// Returns a snapshot of the monitor state.
    pub fn status(&self) -> MonitorStatus {
        self.monitor.status()
    }

    /// One evaluate tick: sample the battery and run the state machine.
    ///
    /// While paused no sample is taken at all.
    pub fn run_evaluation(&mut self) {
        if self.monitor.is_paused() {
            debug!("Monitor paused, skipping evaluation");
            return;
        }

        let sample = self.sample_power();
        match self.monitor.evaluate(sample, self.alerts.as_mut()) {
            Some(event) => info!(
                event = ?event,
                plugged_in = sample.plugged_in,
                percent = sample.percent,
                "Threshold event fired"
            ),
            None => debug!(
                plugged_in = sample.plugged_in,
                percent = sample.percent,
                "No threshold crossing"
            ),
        }
    }

    /// One presentation tick: recompute the icon and push it on change.
    pub fn refresh_icon(&mut self) {
        let sample = self.sample_power();
        let state = self.monitor.icon_state(sample.plugged_in);
        if self.last_icon != Some(state) {
            debug!(from = ?self.last_icon, to = ?state, "Icon state changed");
            self.icon.set_icon(state);
            self.last_icon = Some(state);
        }
    }

    fn sample_power(&mut self) -> BatterySample {
        self.power.sample().unwrap_or_else(|e| {
            warn!(error = %e, "Battery sample failed, using safe defaults");
            BatterySample::default()
        })
    }

    /// Starts (or restarts) the snooze window.
    pub fn start_snooze(&mut self) {
        self.monitor.start_snooze();
    }

    /// Ends the snooze and refreshes the icon so the snooze badge clears
    /// without waiting for the next presentation tick.
    pub fn stop_snooze(&mut self) {
        self.monitor.stop_snooze();
        self.refresh_icon();
    }

    /// The snooze deadline, if one is set.
    pub fn snooze_deadline(&self) -> Option<DateTime<Utc>> {
        self.monitor.snoozed_until()
    }

    /// Time left until the snooze deadline, if one is set.
    pub fn snooze_remaining(&self) -> Option<Duration> {
        self.monitor
            .snoozed_until()
            .map(|until| (until - Utc::now()).to_std().unwrap_or(Duration::ZERO))
    }

    /// Flips the pause flag.
    pub fn toggle_pause(&mut self) {
        let paused = self.monitor.toggle_pause();
        info!(paused = paused, "Monitoring pause toggled");
    }

    /// Flips the alert toggle and persists.
    pub fn toggle_alert(&mut self) {
        let enabled = self.monitor.toggle_alert();
        info!(enabled = enabled, "Alert channel toggled");
        self.persist();
    }

    /// Flips the notification toggle and persists.
    pub fn toggle_notification(&mut self) {
        let enabled = self.monitor.toggle_notification();
        info!(enabled = enabled, "Notification channel toggled");
        self.persist();
    }

    /// Updates the plug-in threshold and persists on success.
    pub fn set_plug_percent(&mut self, percent: u8) {
        match self.monitor.set_plug_percent(percent) {
            Ok(()) => {
                info!(percent = percent, "Plug-in threshold updated");
                self.persist();
            }
            Err(e) => warn!(error = %e, "Rejected plug-in threshold"),
        }
    }

    /// Updates the unplug threshold and persists on success.
    pub fn set_unplug_percent(&mut self, percent: u8) {
        match self.monitor.set_unplug_percent(percent) {
            Ok(()) => {
                info!(percent = percent, "Unplug threshold updated");
                self.persist();
            }
            Err(e) => warn!(error = %e, "Rejected unplug threshold"),
        }
    }

    /// Re-reads the persisted config, keeping runtime state.
    pub fn reload_config(&mut self) {
        let config = self.store.load();
        info!(?config, "Config reloaded from storage");
        self.monitor.set_config(config);
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(self.monitor.config()) {
            warn!(error = %e, "Failed to persist config, in-memory state kept");
        }
    }
}
