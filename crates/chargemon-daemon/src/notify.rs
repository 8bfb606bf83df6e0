//! Desktop alert delivery via `notify-rust`.
//!
//! Two channels:
//! - `confirm`: a critical, non-expiring notification carrying a snooze
//!   action button, waited on synchronously. The wait blocks the monitor
//!   loop until the user reacts, which is exactly the blocking-dialog
//!   contract the monitor expects.
//! - `notify`: a plain fire-and-forget notification.
//!
//! Delivery failures are logged and swallowed; a broken notification
//! daemon must not take the monitor down.

use std::time::Duration;

use notify_rust::Notification;
#[cfg(target_os = "linux")]
use notify_rust::{Timeout, Urgency};
use tracing::{debug, error, info};

use chargemon_core::{AlertSink, ConfirmChoice};

/// Identifier of the snooze action on a confirm notification.
#[cfg(target_os = "linux")]
const SNOOZE_ACTION: &str = "snooze";

/// Desktop implementation of [`AlertSink`].
pub struct DesktopAlerts {
    app_name: String,
    timeout_secs: u32,
    icon_path: Option<String>,
}

impl Default for DesktopAlerts {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopAlerts {
    /// Creates an alert sink with default settings.
    pub fn new() -> Self {
        Self {
            app_name: "chargemon".to_string(),
            timeout_secs: 10,
            icon_path: None,
        }
    }

    /// Builder: set the application name shown by the notification daemon.
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Builder: set the passive-notification timeout.
    pub fn with_timeout(mut self, secs: u32) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Builder: set a custom notification icon path.
    pub fn with_icon_path(mut self, path: impl Into<String>) -> Self {
        self.icon_path = Some(path.into());
        self
    }

    fn base(&self, title: &str, body: &str) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(title)
            .body(body);
        if let Some(ref icon) = self.icon_path {
            notification.icon(icon);
        }
        notification
    }
}

impl AlertSink for DesktopAlerts {
    #[cfg(target_os = "linux")]
    fn confirm(
        &mut self,
        title: &str,
        message: &str,
        affirmative_label: &str,
        dismiss_label: &str,
    ) -> ConfirmChoice {
        let mut notification = self.base(title, message);
        notification
            .action("default", affirmative_label)
            .action(SNOOZE_ACTION, dismiss_label)
            .urgency(Urgency::Critical)
            .timeout(Timeout::Never);

        debug!(title = %title, "Showing confirm alert");

        match notification.show() {
            Ok(handle) => {
                let mut choice = ConfirmChoice::Acknowledged;
                handle.wait_for_action(|action| {
                    if action == SNOOZE_ACTION {
                        choice = ConfirmChoice::Snoozed;
                    }
                });
                info!(title = %title, choice = ?choice, "Confirm alert dismissed");
                choice
            }
            Err(e) => {
                error!(error = %e, title = %title, "Failed to show confirm alert");
                ConfirmChoice::Acknowledged
            }
        }
    }

    /// Platforms without notification actions get a plain notification
    /// and never report a snooze choice.
    #[cfg(not(target_os = "linux"))]
    fn confirm(
        &mut self,
        title: &str,
        message: &str,
        _affirmative_label: &str,
        _dismiss_label: &str,
    ) -> ConfirmChoice {
        if let Err(e) = self.base(title, message).show() {
            error!(error = %e, title = %title, "Failed to show confirm alert");
        }
        ConfirmChoice::Acknowledged
    }

    fn notify(&mut self, title: &str, subtitle: &str, message: &str) {
        let body = notification_body(subtitle, message);
        let mut notification = self.base(title, &body);
        notification.timeout(Duration::from_secs(self.timeout_secs as u64));
        #[cfg(target_os = "linux")]
        notification.urgency(Urgency::Normal);

        match notification.show() {
            Ok(_) => info!(title = %title, "Notification sent"),
            Err(e) => error!(error = %e, title = %title, "Failed to send notification"),
        }
    }
}

/// Folds an optional subtitle into the notification body.
fn notification_body(subtitle: &str, message: &str) -> String {
    if subtitle.is_empty() {
        message.to_string()
    } else {
        format!("{}\n{}", subtitle, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_without_subtitle() {
        assert_eq!(
            notification_body("", "Battery 80 percent charged."),
            "Battery 80 percent charged."
        );
    }

    #[test]
    fn body_with_subtitle() {
        assert_eq!(
            notification_body("ChargeMon", "Battery 80 percent charged."),
            "ChargeMon\nBattery 80 percent charged."
        );
    }

    #[test]
    fn builder_methods() {
        let alerts = DesktopAlerts::new()
            .with_app_name("testmon")
            .with_timeout(30)
            .with_icon_path("/usr/share/icons/battery.png");

        assert_eq!(alerts.app_name, "testmon");
        assert_eq!(alerts.timeout_secs, 30);
        assert_eq!(
            alerts.icon_path,
            Some("/usr/share/icons/battery.png".to_string())
        );
    }
}
