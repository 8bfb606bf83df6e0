//! Background scheduler driving the monitor.
//!
//! One cooperative loop multiplexes:
//! - the evaluate tick (slow; samples the battery and runs the state
//!   machine),
//! - the presentation tick (fast; keeps the icon current),
//! - a one-shot snooze-expiry timer derived from the monitor's deadline,
//! - a command channel for the frontend (pause, snooze, thresholds, ...).
//!
//! The expiry timer is armed once per deadline: arming schedules exactly
//! one future invocation at the deadline and nothing at arm time, a
//! restarted snooze re-arms it, and a cancelled snooze leaves the branch
//! disabled.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};
use tracing::{debug, info};

use crate::service::MonitorService;

/// Placeholder delay used while no snooze deadline is armed; the guard on
/// the select branch keeps it from ever firing.
const IDLE_ARM: Duration = Duration::from_secs(3600);

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Period of the evaluate tick.
    pub evaluate_interval: Duration,
    /// Period of the presentation (icon) tick.
    pub icon_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            evaluate_interval: Duration::from_secs(180),
            icon_interval: Duration::from_secs(10),
        }
    }
}

impl SchedulerConfig {
    /// Builder: set the evaluate period.
    pub fn with_evaluate_interval(mut self, interval: Duration) -> Self {
        self.evaluate_interval = interval;
        self
    }

    /// Builder: set the presentation period.
    pub fn with_icon_interval(mut self, interval: Duration) -> Self {
        self.icon_interval = interval;
        self
    }
}

/// Commands a frontend can send to the running scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    /// Run an evaluate tick immediately.
    EvaluateNow,
    /// Flip the pause flag.
    TogglePause,
    /// Start (or restart) the snooze window.
    Snooze,
    /// Cancel a running snooze.
    CancelSnooze,
    /// Flip the alert channel.
    ToggleAlert,
    /// Flip the notification channel.
    ToggleNotification,
    /// Select a plug-in threshold.
    SetPlugPercent(u8),
    /// Select an unplug threshold.
    SetUnplugPercent(u8),
    /// Re-read the persisted config.
    ReloadConfig,
    /// Stop the scheduler.
    Stop,
}

/// The monitor scheduler.
pub struct MonitorScheduler {
    config: SchedulerConfig,
    command_tx: mpsc::Sender<MonitorCommand>,
    command_rx: Option<mpsc::Receiver<MonitorCommand>>,
}

impl MonitorScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        Self {
            config,
            command_tx,
            command_rx: Some(command_rx),
        }
    }

    /// Returns a handle for sending commands to the scheduler.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            command_tx: self.command_tx.clone(),
        }
    }

    /// Runs the scheduler loop until `Stop` is received or `shutdown`
    /// completes.
    ///
    /// Both periodic drivers fire once immediately, so the monitor
    /// evaluates and paints its icon right at startup.
    pub async fn run<S>(mut self, mut service: MonitorService, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let mut command_rx = self.command_rx.take().expect("run called twice");

        let mut evaluate = interval(self.config.evaluate_interval);
        evaluate.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut icon = interval(self.config.icon_interval);
        icon.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        info!(
            evaluate_secs = self.config.evaluate_interval.as_secs(),
            icon_secs = self.config.icon_interval.as_secs(),
            "Monitor scheduler started"
        );

        // One-shot expiry timer: armed exactly once per deadline value,
        // re-armed only when a restarted snooze moves the deadline.
        let mut armed_deadline: Option<chrono::DateTime<chrono::Utc>> = None;
        let mut snooze_at = Instant::now() + IDLE_ARM;

        loop {
            let deadline = service.snooze_deadline();
            if deadline != armed_deadline {
                snooze_at = match service.snooze_remaining() {
                    Some(remaining) => Instant::now() + remaining,
                    None => Instant::now() + IDLE_ARM,
                };
                armed_deadline = deadline;
            }

            tokio::select! {
                _ = evaluate.tick() => {
                    service.run_evaluation();
                }
                _ = icon.tick() => {
                    service.refresh_icon();
                }
                _ = sleep_until(snooze_at), if armed_deadline.is_some() => {
                    debug!("Snooze deadline reached");
                    service.stop_snooze();
                }
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(MonitorCommand::EvaluateNow) => {
                            debug!("Received EvaluateNow command");
                            service.run_evaluation();
                        }
                        Some(MonitorCommand::TogglePause) => service.toggle_pause(),
                        Some(MonitorCommand::Snooze) => service.start_snooze(),
                        Some(MonitorCommand::CancelSnooze) => service.stop_snooze(),
                        Some(MonitorCommand::ToggleAlert) => service.toggle_alert(),
                        Some(MonitorCommand::ToggleNotification) => service.toggle_notification(),
                        Some(MonitorCommand::SetPlugPercent(percent)) => {
                            service.set_plug_percent(percent);
                        }
                        Some(MonitorCommand::SetUnplugPercent(percent)) => {
                            service.set_unplug_percent(percent);
                        }
                        Some(MonitorCommand::ReloadConfig) => service.reload_config(),
                        Some(MonitorCommand::Stop) | None => {
                            info!("Monitor scheduler stopping");
                            break;
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
    }
}

/// Handle for sending commands to a running scheduler.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    command_tx: mpsc::Sender<MonitorCommand>,
}

impl SchedulerHandle {
    /// Sends a command to the scheduler.
    pub async fn send(
        &self,
        command: MonitorCommand,
    ) -> Result<(), mpsc::error::SendError<MonitorCommand>> {
        self.command_tx.send(command).await
    }

    /// Runs an evaluate tick immediately.
    pub async fn evaluate_now(&self) -> Result<(), mpsc::error::SendError<MonitorCommand>> {
        self.send(MonitorCommand::EvaluateNow).await
    }

    /// Flips the pause flag.
    pub async fn toggle_pause(&self) -> Result<(), mpsc::error::SendError<MonitorCommand>> {
        self.send(MonitorCommand::TogglePause).await
    }

    /// Starts (or restarts) the snooze window.
    pub async fn snooze(&self) -> Result<(), mpsc::error::SendError<MonitorCommand>> {
        self.send(MonitorCommand::Snooze).await
    }

    /// Cancels a running snooze.
    pub async fn cancel_snooze(&self) -> Result<(), mpsc::error::SendError<MonitorCommand>> {
        self.send(MonitorCommand::CancelSnooze).await
    }

    /// Re-reads the persisted config.
    pub async fn reload_config(&self) -> Result<(), mpsc::error::SendError<MonitorCommand>> {
        self.send(MonitorCommand::ReloadConfig).await
    }

    /// Stops the scheduler.
    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<MonitorCommand>> {
        self.send(MonitorCommand::Stop).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;
    use chargemon_core::{BatterySample, ConfirmChoice};

    fn scheduler(evaluate_secs: u64, icon_secs: u64) -> MonitorScheduler {
        MonitorScheduler::new(
            SchedulerConfig::default()
                .with_evaluate_interval(Duration::from_secs(evaluate_secs))
                .with_icon_interval(Duration::from_secs(icon_secs)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn evaluate_ticks_on_interval() {
        let (service, h) = fixture(BatterySample::new(true, 50));
        let run = scheduler(60, 100_000).run(service, async {
            tokio::time::sleep(Duration::from_secs(185)).await;
        });
        run.await;

        // Evaluate samples at 0/60/120/180 plus one icon sample at 0.
        assert_eq!(*h.power_reads.borrow(), 5);
        assert!(h.alert_calls.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_command_stops_sampling() {
        let (service, h) = fixture(BatterySample::new(true, 50));
        let sched = scheduler(60, 100_000);
        let handle = sched.handle();

        let driver = async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.toggle_pause().await.unwrap();
            tokio::time::sleep(Duration::from_secs(600)).await;
            handle.stop().await.unwrap();
        };

        tokio::join!(sched.run(service, std::future::pending::<()>()), driver);

        // Only the startup ticks (evaluate + icon) sampled the battery.
        assert_eq!(*h.power_reads.borrow(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn snooze_suppresses_alerts_inside_the_window() {
        let (service, h) = fixture(BatterySample::new(true, 90));
        let sched = scheduler(60, 100_000);
        let handle = sched.handle();

        let driver = async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.snooze().await.unwrap();
            tokio::time::sleep(Duration::from_secs(600)).await;
            handle.stop().await.unwrap();
        };

        tokio::join!(sched.run(service, std::future::pending::<()>()), driver);

        // Only the startup evaluation alerted; every tick inside the
        // snooze window stayed silent.
        assert_eq!(h.alert_calls.borrow().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn snooze_expiry_resumes_alerts() {
        let (service, h) = fixture(BatterySample::new(true, 90));
        let sched = scheduler(60, 100_000);
        let handle = sched.handle();

        let driver = async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.snooze().await.unwrap();
            // Default snooze is 15 minutes; run well past it.
            tokio::time::sleep(Duration::from_secs(1201)).await;
            handle.stop().await.unwrap();
        };

        tokio::join!(sched.run(service, std::future::pending::<()>()), driver);

        // Startup alert, silence until the 900 s deadline, then alerts
        // resume at 960/1020/1080/1140/1200.
        assert_eq!(h.alert_calls.borrow().len(), 6);
        // The one-shot cleared the snooze badge; the plugged icon never
        // changed, so the startup push is the only one.
        assert_eq!(h.icon_states.borrow().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_snooze_disarms_the_deadline() {
        let (service, h) = fixture(BatterySample::new(true, 90));
        let sched = scheduler(60, 100_000);
        let handle = sched.handle();

        let driver = async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.snooze().await.unwrap();
            handle.cancel_snooze().await.unwrap();
            tokio::time::sleep(Duration::from_secs(120)).await;
            handle.stop().await.unwrap();
        };

        tokio::join!(sched.run(service, std::future::pending::<()>()), driver);

        // Startup alert plus the 60 s and 120 s ticks after cancellation.
        assert_eq!(h.alert_calls.borrow().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn commands_mutate_and_persist_config() {
        let (service, h) = fixture(BatterySample::new(true, 50));
        let sched = scheduler(100_000, 100_000);
        let handle = sched.handle();

        let driver = async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.send(MonitorCommand::ToggleNotification).await.unwrap();
            handle.send(MonitorCommand::SetPlugPercent(55)).await.unwrap();
            handle.send(MonitorCommand::SetPlugPercent(37)).await.unwrap();
            handle.evaluate_now().await.unwrap();
            handle.stop().await.unwrap();
        };

        tokio::join!(sched.run(service, std::future::pending::<()>()), driver);

        let saved = h.saved.borrow();
        assert_eq!(saved.len(), 2);
        assert!(saved[0].notification_enabled);
        assert_eq!(saved[1].plug_percent, 55);

        // Startup evaluate + icon, then the explicit EvaluateNow.
        assert_eq!(*h.power_reads.borrow(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_future_ends_the_loop() {
        let (service, h) = fixture(BatterySample::new(true, 90));
        *h.confirm_choice.borrow_mut() = ConfirmChoice::Snoozed;

        let run = scheduler(60, 100_000).run(service, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        tokio::time::timeout(Duration::from_secs(120), run)
            .await
            .expect("scheduler should stop on shutdown");

        assert_eq!(h.alert_calls.borrow().len(), 1);
    }
}
