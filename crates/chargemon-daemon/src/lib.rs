//! Daemon: battery probe, scheduler, alerts, persistence.
//!
//! This crate provides the chargemon monitor daemon:
//! - Battery sampling through the platform power interface
//! - A cooperative scheduler for the evaluate/presentation ticks and the
//!   snooze one-shot
//! - Desktop alert delivery (blocking confirm and passive notification)
//! - TOML config persistence with tolerant loading
//! - PID file and Unix signal handling

pub mod cli;
pub mod config_store;
pub mod error;
pub mod notify;
pub mod pidfile;
pub mod power;
pub mod scheduler;
pub mod service;
pub mod signals;

#[cfg(test)]
mod testing;

pub use cli::{Cli, Command, ConfigAction};
pub use config_store::FileConfigStore;
pub use error::{DaemonError, DaemonResult};
pub use notify::DesktopAlerts;
pub use pidfile::{PidFile, default_pid_path};
pub use power::BatteryProbe;
pub use scheduler::{MonitorCommand, MonitorScheduler, SchedulerConfig, SchedulerHandle};
pub use service::{LoggingIcon, MonitorService};
pub use signals::{ReloadSignal, ShutdownSignal, SignalHandler};
